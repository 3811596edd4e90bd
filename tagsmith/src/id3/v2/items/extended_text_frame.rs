use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::err;
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text, utf16_decode_bytes};

use std::hash::{Hash, Hasher};
use std::io::Read;

use byteorder::ReadBytesExt;

/// An extended `ID3v2` text frame
///
/// This is used in the `TXXX` (`TXX` in ID3v2.2) frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedTextFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, Eq)]
pub struct ExtendedTextFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description and comment text
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl PartialEq for ExtendedTextFrame {
	fn eq(&self, other: &Self) -> bool {
		self.description == other.description
	}
}

impl Hash for ExtendedTextFrame {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.description.hash(state);
	}
}

impl ExtendedTextFrame {
	/// Create a new [`ExtendedTextFrame`] for a tag of `version`
	pub fn new(
		version: Id3v2Version,
		encoding: TextEncoding,
		description: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		let header = FrameHeader::new(
			FrameId::versioned(version, "TXX", "TXXX"),
			FrameFlags::default(),
		);
		Self {
			header,
			encoding,
			description: description.into(),
			content: content.into(),
		}
	}

	/// Read an [`ExtendedTextFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse<R>(
		reader: &mut R,
		id: FrameId,
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Ok(encoding_byte) = reader.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;
		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?;

		let header = FrameHeader::new(id, frame_flags);
		if encoding != TextEncoding::UTF16 {
			let frame_content =
				decode_text(reader, TextDecodeOptions::new().encoding(encoding))?.content;

			return Ok(Some(ExtendedTextFrame {
				header,
				encoding,
				description: description.content,
				content: frame_content,
			}));
		}

		// It's possible for the description to be the only string with a BOM
		let mut raw_text = Vec::new();
		reader.read_to_end(&mut raw_text)?;

		let mut bom = description.bom;
		if raw_text.starts_with(&[0xFF, 0xFE]) || raw_text.starts_with(&[0xFE, 0xFF]) {
			bom = [raw_text[0], raw_text[1]];
		}

		let frame_content = match bom {
			_ if raw_text.is_empty() => String::new(),
			[0xFF, 0xFE] => utf16_decode_bytes(&raw_text, u16::from_le_bytes)?,
			[0xFE, 0xFF] => utf16_decode_bytes(&raw_text, u16::from_be_bytes)?,
			_ => err!(TextDecode("UTF-16 string has no BOM")),
		};

		Ok(Some(ExtendedTextFrame {
			header,
			encoding,
			description: description.content,
			content: frame_content,
		}))
	}

	/// Convert an [`ExtendedTextFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self
			.encoding
			.for_write(version, write_options.android_compatible);

		let mut bytes = vec![encoding as u8];

		bytes.extend(encoding.encode(&self.description, true, write_options.lossy_text_encoding)?);
		bytes.extend(encoding.encode(&self.content, false, write_options.lossy_text_encoding)?);

		Ok(bytes)
	}
}
