use super::constants::{GENRES, ID3V1_TAG_MARKER};
use super::tag::Id3v1Tag;
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{decode_err, err};
use crate::util::text::latin1_decode;

impl Id3v1Tag {
	/// Parse a 128 byte ID3v1 tag, including its "TAG" marker
	///
	/// # Errors
	///
	/// * The marker is missing
	/// * The year contains non-digit characters, and `parse_mode` is [`ParsingMode::Strict`]
	pub(crate) fn parse(reader: [u8; 128], parse_mode: ParsingMode) -> Result<Self> {
		if reader[..3] != ID3V1_TAG_MARKER {
			decode_err!(@BAIL Id3v1, "Tag is missing its \"TAG\" marker");
		}

		let mut tag = Self::new();
		let reader = &reader[3..];

		tag.title = decode_text(&reader[..30]);
		tag.artist = decode_text(&reader[30..60]);
		tag.album = decode_text(&reader[60..90]);

		tag.year = try_parse_year(&reader[90..94], parse_mode)?;

		// The comment is 30 bytes in ID3v1, and 28 in ID3v1.1. A null byte 28 bytes in, followed by
		// a non-zero byte, marks a track number.
		let range = if reader[122] == 0 && reader[123] != 0 {
			tag.track_number = Some(reader[123]);

			94_usize..122
		} else {
			94..124
		};

		tag.comment = decode_text(&reader[range]);

		if (reader[124] as usize) < GENRES.len() {
			tag.genre = Some(reader[124]);
		}

		log::trace!("ID3v1: Parsed tag with {} fields", tag.len());
		Ok(tag)
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let mut first_null_pos = data.len();
	if let Some(null_pos) = data.iter().position(|&b| b == 0) {
		if null_pos == 0 {
			return None;
		}

		if data[null_pos..].iter().any(|b| *b != b'\0') {
			log::warn!("ID3v1: Text field contains trailing junk, skipping");
		}

		first_null_pos = null_pos;
	}

	let text = latin1_decode(&data[..first_null_pos]);
	let text = text.trim_end_matches(' ');
	if text.is_empty() {
		return None;
	}

	Some(text.to_owned())
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>> {
	let (num_digits, year) = input
		.iter()
		.take_while(|c| (**c).is_ascii_digit())
		.fold((0usize, 0u16), |(num_digits, year), c| {
			(num_digits + 1, year * 10 + u16::from(*c - b'0'))
		});

	if num_digits == 4 {
		return Ok(Some(year));
	}

	// Empty years are commonly written as "\0\0\0\0" rather than "0000"
	if input.iter().all(|b| *b == 0 || *b == b' ') {
		return Ok(None);
	}

	if parse_mode == ParsingMode::Strict {
		err!(TextDecode(
			"ID3v1 year field contains non-ASCII digit characters"
		));
	}

	log::warn!("ID3v1: Discarding invalid year");
	Ok(None)
}

#[cfg(test)]
mod tests {
	use crate::config::ParsingMode;
	use crate::id3::v1::Id3v1Tag;

	fn raw_tag() -> [u8; 128] {
		let mut tag = [0; 128];
		tag[..3].copy_from_slice(b"TAG");
		tag[3..12].copy_from_slice(b"Foo title");
		tag[33..43].copy_from_slice(b"Bar artist");
		tag[63..72].copy_from_slice(b"Baz album");
		tag[93..97].copy_from_slice(b"1984");
		tag[97..108].copy_from_slice(b"Qux comment");
		tag[127] = 255;
		tag
	}

	#[test_log::test]
	fn v1() {
		let tag = Id3v1Tag::parse(raw_tag(), ParsingMode::Strict).unwrap();
		assert_eq!(tag.title.as_deref(), Some("Foo title"));
		assert_eq!(tag.artist.as_deref(), Some("Bar artist"));
		assert_eq!(tag.album.as_deref(), Some("Baz album"));
		assert_eq!(tag.year, Some(1984));
		assert_eq!(tag.comment.as_deref(), Some("Qux comment"));
		assert_eq!(tag.track_number, None);
		assert_eq!(tag.genre, None);
	}

	#[test_log::test]
	fn v1_1_track_number() {
		let mut raw = raw_tag();
		raw[126] = 7;
		raw[127] = 17;

		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();
		assert_eq!(tag.track_number, Some(7));
		assert_eq!(tag.genre().as_deref(), Some("Rock"));
		assert_eq!(tag.comment.as_deref(), Some("Qux comment"));
	}

	#[test_log::test]
	fn space_padded_fields() {
		let mut raw = raw_tag();
		raw[12..33].fill(b' ');

		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();
		assert_eq!(tag.title.as_deref(), Some("Foo title"));
	}

	#[test_log::test]
	fn bad_year() {
		let mut raw = raw_tag();
		raw[93..97].copy_from_slice(b"19x4");

		assert!(Id3v1Tag::parse(raw, ParsingMode::Strict).is_err());

		let tag = Id3v1Tag::parse(raw, ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.year, None);
		assert_eq!(tag.title.as_deref(), Some("Foo title"));
	}

	#[test_log::test]
	fn missing_marker() {
		let mut raw = raw_tag();
		raw[..3].copy_from_slice(b"TAB");

		assert!(Id3v1Tag::parse(raw, ParsingMode::Relaxed).is_err());
	}
}
