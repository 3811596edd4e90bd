//! ID3v2 genre conventions
//!
//! Genre frames (`TCON`/`TCO`) may refer to the ID3v1 genre table instead of naming a genre.
//! Older versions wrap the index in parentheses (`"(17)"`), ID3v2.4 stores it bare (`"17"`).
//! Both are accepted when reading, along with the `RX` (Remix) and `CR` (Cover) shorthands.

use crate::id3::v1::constants::{GENRES, genre_index};
use crate::id3::v2::Id3v2Version;
use crate::id3::v2::items::TEXT_VALUE_SEPARATOR;

use std::borrow::Cow;

const REMIX: &str = "Remix";
const COVER: &str = "Cover";

/// Resolve every genre referenced by a genre frame value
///
/// Known references are replaced by their names, anything else is kept as free text.
///
/// # Examples
///
/// ```rust
/// use tagsmith::id3::v2::util::genres::parse_genres;
///
/// assert_eq!(parse_genres("(17)"), ["Rock"]);
/// assert_eq!(parse_genres("17\0Jazz"), ["Rock", "Jazz"]);
/// assert_eq!(parse_genres("(0)(17)Garage"), ["Blues", "Rock", "Garage"]);
/// ```
pub fn parse_genres(value: &str) -> Vec<Cow<'_, str>> {
	let mut genres = Vec::new();
	for segment in value.split(TEXT_VALUE_SEPARATOR) {
		parse_segment(segment, &mut genres);
	}

	genres
}

fn parse_segment<'a>(segment: &'a str, genres: &mut Vec<Cow<'a, str>>) {
	match segment {
		"" => return,
		"RX" => {
			genres.push(Cow::Borrowed(REMIX));
			return;
		},
		"CR" => {
			genres.push(Cow::Borrowed(COVER));
			return;
		},
		_ => {},
	}

	if let Some(name) = reference(segment) {
		genres.push(Cow::Borrowed(name));
		return;
	}

	// ID3v2.3 style "(17)(18)Refinement"
	let mut rest = segment;
	let mut last_reference = None;
	while rest.starts_with('(') && !rest.starts_with("((") {
		let Some(end) = rest.find(')') else {
			break;
		};

		let Some(name) = reference(&rest[1..end]) else {
			break;
		};

		genres.push(Cow::Borrowed(name));
		last_reference = Some(name);
		rest = &rest[end + 1..];
	}

	// "((" escapes a refinement that starts with a parenthesis
	let rest = match rest.strip_prefix('(') {
		Some(escaped) if escaped.starts_with('(') => escaped,
		_ => rest,
	};

	if rest.is_empty() {
		return;
	}

	if last_reference.is_some_and(|name| name.eq_ignore_ascii_case(rest)) {
		return;
	}

	genres.push(Cow::Borrowed(rest));
}

fn reference(text: &str) -> Option<&'static str> {
	match text {
		"RX" => return Some(REMIX),
		"CR" => return Some(COVER),
		_ => {},
	}

	if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	let index = text.parse::<usize>().ok()?;
	GENRES.get(index).copied()
}

/// Rewrite a genre frame value so that known genres are stored as references
///
/// ID3v2.2 and ID3v2.3 use `"(17)"`, ID3v2.4 uses `"17"`. Genres outside of the ID3v1 table are
/// kept as text.
pub(crate) fn encode_numeric(value: &str, version: Id3v2Version) -> String {
	let legacy = version != Id3v2Version::V4;

	let mut encoded = Vec::new();
	for genre in value.split(TEXT_VALUE_SEPARATOR) {
		let reference = if genre.eq_ignore_ascii_case(REMIX) {
			Some(String::from("RX"))
		} else if genre.eq_ignore_ascii_case(COVER) {
			Some(String::from("CR"))
		} else {
			genre_index(genre).map(|index| index.to_string())
		};

		encoded.push(match reference {
			Some(reference) if legacy => format!("({reference})"),
			Some(reference) => reference,
			None if legacy && genre.starts_with('(') => format!("({genre}"),
			None => genre.to_owned(),
		});
	}

	encoded.join("\0")
}

/// Whether a frame ID is the genre frame of any version
pub(crate) fn is_genre_frame(id: &str) -> bool {
	id == "TCON" || id == "TCO"
}

#[cfg(test)]
mod tests {
	use super::{encode_numeric, parse_genres};
	use crate::id3::v2::Id3v2Version;

	#[test_log::test]
	fn references() {
		assert_eq!(parse_genres("(17)"), ["Rock"]);
		assert_eq!(parse_genres("17"), ["Rock"]);
		assert_eq!(parse_genres("(17)Rock"), ["Rock"]);
		assert_eq!(parse_genres("(17)Garage"), ["Rock", "Garage"]);
		assert_eq!(parse_genres("RX"), ["Remix"]);
		assert_eq!(parse_genres("(CR)"), ["Cover"]);
	}

	#[test_log::test]
	fn free_text() {
		assert_eq!(parse_genres("Shoegaze\0Dream Pop"), ["Shoegaze", "Dream Pop"]);
		assert_eq!(parse_genres("((Not a reference)"), ["(Not a reference)"]);
		assert_eq!(parse_genres("(999)"), ["(999)"]);
		assert_eq!(parse_genres("(17"), ["(17"]);
		assert!(parse_genres("").is_empty());
	}

	#[test_log::test]
	fn numeric_encoding() {
		assert_eq!(encode_numeric("Rock", Id3v2Version::V3), "(17)");
		assert_eq!(encode_numeric("rock", Id3v2Version::V2), "(17)");
		assert_eq!(encode_numeric("Rock", Id3v2Version::V4), "17");
		assert_eq!(encode_numeric("Remix\0Jazz", Id3v2Version::V3), "(RX)\0(8)");
		assert_eq!(encode_numeric("Dream Pop", Id3v2Version::V3), "Dream Pop");
		assert_eq!(encode_numeric("(Odd)", Id3v2Version::V3), "((Odd)");
	}

	#[test_log::test]
	fn numeric_encoding_is_read_back() {
		for version in Id3v2Version::ALL {
			let encoded = encode_numeric("Rock\0(Odd)\0Cover", version);
			assert_eq!(parse_genres(&encoded), ["Rock", "(Odd)", "Cover"]);
		}
	}
}
