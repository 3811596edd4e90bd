use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

/// An `ID3v2` key-value frame
///
/// This is used for the involved people list (`IPLS`/`IPL` before ID3v2.4, `TIPL` in ID3v2.4)
/// and the musician credits list (`TMCL`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeyValueFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The key value pairs. Keys can be specified multiple times
	pub key_value_pairs: Vec<(String, String)>,
}

impl KeyValueFrame {
	/// Create a new [`KeyValueFrame`]
	pub fn new(id: FrameId, encoding: TextEncoding, key_value_pairs: Vec<(String, String)>) -> Self {
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			encoding,
			key_value_pairs,
		}
	}

	/// Get all values stored under `key`, in order
	pub fn values_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.key_value_pairs
			.iter()
			.filter(move |(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// Read an [`KeyValueFrame`] from a slice
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

		let mut values = Vec::new();

		let mut text_decode_options = TextDecodeOptions::new().encoding(encoding).terminated(true);

		// We have to read the first key/value pair separately because it may be the only string with a BOM

		let first_key = decode_text(reader, text_decode_options)?;

		if first_key.bytes_read == 0 {
			return Ok(None);
		}

		if encoding == TextEncoding::UTF16 {
			text_decode_options = text_decode_options.bom(first_key.bom);
		}

		values.push((
			first_key.content,
			decode_text(reader, text_decode_options)?.content,
		));

		loop {
			let key = decode_text(reader, text_decode_options)?;
			let value = decode_text(reader, text_decode_options)?;
			if key.bytes_read == 0 || value.bytes_read == 0 {
				break;
			}

			values.push((key.content, value.content));
		}

		let header = FrameHeader::new(id, frame_flags);
		Ok(Some(Self {
			header,
			encoding,
			key_value_pairs: values,
		}))
	}

	/// Convert a [`KeyValueFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self
			.encoding
			.for_write(version, write_options.android_compatible);

		let mut content = vec![encoding as u8];

		for (key, value) in &self.key_value_pairs {
			content.append(&mut encoding.encode(key, true, write_options.lossy_text_encoding)?);
			content.append(&mut encoding.encode(value, true, write_options.lossy_text_encoding)?);
		}
		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use crate::config::WriteOptions;
	use crate::id3::v2::{FrameFlags, FrameId, Id3v2Version, KeyValueFrame};
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn pairs_keep_order_and_duplicates() {
		let frame = KeyValueFrame::new(
			FrameId::new("TIPL").unwrap(),
			TextEncoding::Latin1,
			vec![
				(String::from("producer"), String::from("Foo")),
				(String::from("engineer"), String::from("Bar")),
				(String::from("producer"), String::from("Baz")),
			],
		);

		let bytes = frame
			.as_bytes(Id3v2Version::V4, WriteOptions::default())
			.unwrap();
		let parsed = KeyValueFrame::parse(
			&mut &bytes[..],
			FrameId::new("TIPL").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V4,
		)
		.unwrap()
		.unwrap();

		assert_eq!(parsed.key_value_pairs, frame.key_value_pairs);
		assert_eq!(
			parsed.values_for("producer").collect::<Vec<_>>(),
			["Foo", "Baz"]
		);
	}
}
