use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::err;
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::{Read, Write as _};

use byteorder::{ReadBytesExt as _, WriteBytesExt as _};

/// The MIME type used for pictures that are a link rather than embedded data
pub const PICTURE_LINK_MIME_TYPE: &str = "-->";

// ID3v2.2 image format <-> MIME type
const IMAGE_FORMATS: &[(&[u8; 3], &str)] = &[
	(b"JPG", "image/jpeg"),
	(b"PNG", "image/png"),
	(b"GIF", "image/gif"),
	(b"BMP", "image/bmp"),
	(b"TIF", "image/tiff"),
	(b"-->", PICTURE_LINK_MIME_TYPE),
];

/// An `ID3v2` attached picture frame (`APIC`, `PIC` in ID3v2.2)
///
/// ID3v2.2 stores a 3 character image format in place of the MIME type. The format is
/// converted to a MIME type when read, and back when written, so the same frame can be
/// written to every version.
///
/// The image data itself is never inspected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedPictureFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The MIME type of the image (ex. `image/png`)
	pub mime_type: String,
	/// The picture type byte (ex. `3` for the front cover)
	pub picture_type: u8,
	/// A description of the picture
	pub description: String,
	/// The image data
	pub data: Vec<u8>,
}

impl AttachedPictureFrame {
	/// Create a new [`AttachedPictureFrame`] for a tag of `version`
	pub fn new(
		version: Id3v2Version,
		encoding: TextEncoding,
		mime_type: impl Into<String>,
		picture_type: u8,
		description: impl Into<String>,
		data: Vec<u8>,
	) -> Self {
		let header = FrameHeader::new(
			FrameId::versioned(version, "PIC", "APIC"),
			FrameFlags::default(),
		);
		Self {
			header,
			encoding,
			mime_type: mime_type.into(),
			picture_type,
			description: description.into(),
			data,
		}
	}

	/// Get an [`AttachedPictureFrame`] from ID3v2 A/PIC bytes:
	///
	/// NOTE: This expects *only* the frame content
	///
	/// # Errors
	///
	/// * There isn't enough data present
	/// * Unable to decode any of the text
	pub fn parse<R>(
		reader: &mut R,
		id: FrameId,
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Self>
	where
		R: Read,
	{
		let encoding = verify_encoding(reader.read_u8()?, version)?;

		let mime_type = if version == Id3v2Version::V2 {
			let mut format = [0; 3];
			reader.read_exact(&mut format)?;

			mime_type_from_format(format)
		} else {
			decode_text(
				reader,
				TextDecodeOptions::new()
					.encoding(TextEncoding::Latin1)
					.terminated(true),
			)?
			.content
		};

		let picture_type = reader.read_u8()?;

		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;

		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		let header = FrameHeader::new(id, frame_flags);
		Ok(Self {
			header,
			encoding,
			mime_type,
			picture_type,
			description,
			data,
		})
	}

	/// Convert an [`AttachedPictureFrame`] to a ID3v2 A/PIC byte Vec
	///
	/// NOTE: This does not include the frame header
	///
	/// # Errors
	///
	/// * Too much data was provided
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self
			.encoding
			.for_write(version, write_options.android_compatible);

		let mut data = vec![encoding as u8];

		if version == Id3v2Version::V2 {
			data.write_all(&format_from_mime_type(&self.mime_type))?;
		} else {
			data.write_all(&TextEncoding::Latin1.encode(
				&self.mime_type,
				true,
				write_options.lossy_text_encoding,
			)?)?;
		}

		data.write_u8(self.picture_type)?;
		data.write_all(&encoding.encode(
			&self.description,
			true,
			write_options.lossy_text_encoding,
		)?)?;
		data.write_all(&self.data)?;

		if data.len() as u64 > u64::from(u32::MAX) {
			err!(TooMuchData);
		}

		Ok(data)
	}
}

fn mime_type_from_format(format: [u8; 3]) -> String {
	if let Some((_, mime_type)) = IMAGE_FORMATS.iter().find(|(f, _)| **f == format) {
		return (*mime_type).to_owned();
	}

	log::warn!("ID3v2: Unknown picture format in PIC frame: {format:?}");
	format!(
		"image/{}",
		String::from_utf8_lossy(&format).to_ascii_lowercase()
	)
}

fn format_from_mime_type(mime_type: &str) -> [u8; 3] {
	let mime_type = match mime_type {
		"image/jpg" => "image/jpeg",
		other => other,
	};

	if let Some((format, _)) = IMAGE_FORMATS.iter().find(|(_, m)| m.eq_ignore_ascii_case(mime_type)) {
		return **format;
	}

	// Anything else gets the first 3 characters of its subtype
	let mut format = *b"   ";
	let subtype = mime_type.rsplit('/').next().unwrap_or_default();
	for (b, c) in format.iter_mut().zip(subtype.bytes()) {
		*b = c.to_ascii_uppercase();
	}

	format
}
