use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use byteorder::ReadBytesExt;

use std::hash::Hash;
use std::io::Read;

/// The separator between multiple values in a text frame
pub const TEXT_VALUE_SEPARATOR: char = '\0';

/// An `ID3v2` text frame
///
/// A text frame can hold multiple values, separated by [`TEXT_VALUE_SEPARATOR`].
#[derive(Clone, Debug, Eq)]
pub struct TextInformationFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The text itself
	pub value: String,
}

impl PartialEq for TextInformationFrame {
	fn eq(&self, other: &Self) -> bool {
		self.header.id == other.header.id
	}
}

impl Hash for TextInformationFrame {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.header.id.hash(state);
	}
}

impl TextInformationFrame {
	/// Create a new [`TextInformationFrame`]
	pub fn new(id: FrameId, encoding: TextEncoding, value: impl Into<String>) -> Self {
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			encoding,
			value: value.into(),
		}
	}

	/// Iterate over the values of the frame
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::TextEncoding;
	/// use tagsmith::id3::v2::{FrameId, TextInformationFrame};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let frame = TextInformationFrame::new(FrameId::new("TPE2")?, TextEncoding::UTF8, "Foo\0Bar");
	/// assert_eq!(frame.values().collect::<Vec<_>>(), ["Foo", "Bar"]);
	/// # Ok(()) }
	/// ```
	pub fn values(&self) -> impl Iterator<Item = &str> {
		self.value.split(TEXT_VALUE_SEPARATOR)
	}

	/// Append a value to the frame
	pub fn push_value(&mut self, value: &str) {
		if !self.value.is_empty() {
			self.value.push(TEXT_VALUE_SEPARATOR);
		}

		self.value.push_str(value);
	}

	/// Read an [`TextInformationFrame`] from a slice
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
		let value = decode_text(reader, TextDecodeOptions::new().encoding(encoding))?.content;

		let header = FrameHeader::new(id, frame_flags);
		Ok(Some(TextInformationFrame {
			header,
			encoding,
			value: normalize_values(&value),
		}))
	}

	/// Convert an [`TextInformationFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		encode_with_value(self.encoding, &self.value, version, write_options)
	}
}

// Used for text frames whose value is rewritten at write time (genres)
pub(crate) fn encode_with_value(
	encoding: TextEncoding,
	value: &str,
	version: Id3v2Version,
	write_options: WriteOptions,
) -> Result<Vec<u8>> {
	let encoding = encoding.for_write(version, write_options.android_compatible);

	let mut content = encoding.encode(value, false, write_options.lossy_text_encoding)?;
	content.insert(0, encoding as u8);
	Ok(content)
}

// Trailing terminators are dropped, and each UTF-16 value may carry its own BOM
fn normalize_values(raw: &str) -> String {
	raw.trim_end_matches(TEXT_VALUE_SEPARATOR)
		.split(TEXT_VALUE_SEPARATOR)
		.map(|value| value.trim_start_matches('\u{FEFF}'))
		.collect::<Vec<_>>()
		.join("\0")
}

#[cfg(test)]
mod tests {
	use crate::config::WriteOptions;
	use crate::id3::v2::{FrameFlags, FrameId, Id3v2Version, TextInformationFrame};
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn multi_value_utf16_with_bom_per_value() {
		// BOM "a" NUL BOM "b" NUL
		let content = [
			1, 0xFF, 0xFE, b'a', 0, 0, 0, 0xFF, 0xFE, b'b', 0, 0, 0,
		];

		let frame = TextInformationFrame::parse(
			&mut &content[..],
			FrameId::new("TPE1").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V3,
		)
		.unwrap()
		.unwrap();

		assert_eq!(frame.values().collect::<Vec<_>>(), ["a", "b"]);
	}

	#[test_log::test]
	fn empty_frame_content() {
		let frame = TextInformationFrame::parse(
			&mut &[][..],
			FrameId::new("TIT2").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V4,
		)
		.unwrap();

		assert!(frame.is_none());
	}

	#[test_log::test]
	fn utf8_downgraded_for_v3() {
		let frame = TextInformationFrame::new(
			FrameId::new("TIT2").unwrap(),
			TextEncoding::UTF8,
			"Foo",
		);

		let bytes = frame
			.as_bytes(Id3v2Version::V3, WriteOptions::default())
			.unwrap();
		assert_eq!(bytes, [1, 0xFF, 0xFE, b'F', 0, b'o', 0, b'o', 0]);
	}
}
