use super::{FieldKey, FieldMapping, INVOLVED_PEOPLE_ROLES, NumberPairPart, PAIR_VALUE_SEPARATOR};
use crate::error::Result;
use crate::id3::v2::items::{
	CommentFrame, DEFAULT_LANGUAGE, ExtendedTextFrame, ExtendedUrlFrame, KeyValueFrame,
	PopularimeterFrame, TEXT_VALUE_SEPARATOR, TextInformationFrame, UniqueFileIdentifierFrame,
	UnsynchronizedTextFrame, UrlLinkFrame,
};
use crate::id3::v2::util::genres::parse_genres;
use crate::id3::v2::{Frame, FrameId, Id3v2Tag, Id3v2Version};
use crate::macros::id3v2_err;
use crate::util::text::TextEncoding;

use std::borrow::Cow;

const NUMBER_PAIR_SEPARATOR: char = '/';

/// ## Field access
///
/// Fields are read and written through the [`FieldMapping`] of the tag's version, so the same
/// [`FieldKey`] works for every version.
impl Id3v2Tag {
	/// Get the first value of a field
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::fields::FieldKey;
	/// use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	/// tag.set_field(FieldKey::Genre, "Rock")?;
	/// tag.set_field(FieldKey::TrackTotal, "12")?;
	///
	/// assert_eq!(tag.get_first(FieldKey::Genre).as_deref(), Some("Rock"));
	/// assert_eq!(tag.get_first(FieldKey::TrackTotal).as_deref(), Some("12"));
	/// assert_eq!(tag.get_first(FieldKey::Track), None);
	/// # Ok(()) }
	/// ```
	pub fn get_first(&self, key: FieldKey) -> Option<Cow<'_, str>> {
		self.get_fields(key).into_iter().next()
	}

	/// Get every value of a field, in order
	///
	/// * Multi-value text frames are split
	/// * Genre references (ex. `"(17)"`) are resolved to their names
	/// * Key/value pair fields are formatted as `role:name` (see [`PAIR_VALUE_SEPARATOR`]),
	///   except for keys that name the role themselves (ex. [`FieldKey::Producer`])
	pub fn get_fields(&self, key: FieldKey) -> Vec<Cow<'_, str>> {
		let version = self.version();
		let mapping = key.mapping(version);

		let mut values = Vec::new();
		for frame in self.frames.iter().filter(|f| frame_matches(f, mapping, version)) {
			match (mapping, frame) {
				(FieldMapping::Genre, Frame::Text(text)) => values.extend(parse_genres(&text.value)),
				(FieldMapping::NumberPair(_, part), Frame::Text(text)) => {
					let (number, total) = split_number_pair(&text.value);
					let value = match part {
						NumberPairPart::Number => number,
						NumberPairPart::Total => total,
					};

					values.extend(value.map(|v| Cow::Owned(v.to_string())));
				},
				(_, Frame::Text(text)) => {
					values.extend(text.values().filter(|v| !v.is_empty()).map(Cow::Borrowed))
				},
				(_, Frame::UserText(text)) => values.extend(
					text.content
						.split(TEXT_VALUE_SEPARATOR)
						.filter(|v| !v.is_empty())
						.map(Cow::Borrowed),
				),
				(_, Frame::Comment(comment)) => values.push(Cow::Borrowed(&*comment.content)),
				(_, Frame::UnsynchronizedText(lyrics)) => {
					values.push(Cow::Borrowed(&*lyrics.content))
				},
				(_, Frame::Url(url)) => values.push(Cow::Borrowed(url.url())),
				(_, Frame::UserUrl(url)) => values.push(Cow::Borrowed(&*url.content)),
				(FieldMapping::InvolvedPeopleRole(role), Frame::KeyValue(pairs)) => {
					values.extend(pairs.values_for(role).map(Cow::Borrowed))
				},
				(_, Frame::KeyValue(pairs)) => values.extend(
					pairs
						.key_value_pairs
						.iter()
						.filter(|(role, _)| pair_matches(mapping, version, role))
						.map(|(role, name)| Cow::Owned(format!("{role}{PAIR_VALUE_SEPARATOR}{name}"))),
				),
				(_, Frame::UniqueFileIdentifier(ufid)) => {
					values.push(String::from_utf8_lossy(&ufid.identifier))
				},
				(_, Frame::Popularimeter(popm)) => values.push(Cow::Owned(popm.rating.to_string())),
				_ => {},
			}
		}

		values
	}

	/// Replace every value of a field
	///
	/// Key/value pair fields (ex. [`FieldKey::Producer`]) are shared with other fields, so the value
	/// is appended to the pair list instead, unless the exact pair already exists.
	///
	/// # Errors
	///
	/// * A number pair field (ex. [`FieldKey::Track`]) is given something other than a number
	/// * [`FieldKey::Rating`] is given something other than a number in `0..=255`
	/// * A pair list field is given a value without a role (see [`PAIR_VALUE_SEPARATOR`])
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::fields::FieldKey;
	/// use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	///
	/// // ID3v2.3 has no mood frame, a `TXXX` frame is used instead
	/// tag.set_field(FieldKey::Mood, "Calm")?;
	/// assert_eq!(tag.get_user_text("MOOD"), Some("Calm"));
	///
	/// tag.set_field(FieldKey::Mood, "Tense")?;
	/// assert_eq!(tag.get_fields(FieldKey::Mood), ["Tense"]);
	/// # Ok(()) }
	/// ```
	pub fn set_field(&mut self, key: FieldKey, value: &str) -> Result<()> {
		let version = self.version();
		let mapping = key.mapping(version);

		match mapping {
			FieldMapping::NumberPair(id, _) => {
				let number = parse_number(id, value)?;
				self.set_number_pair_part(mapping, Some(number));
			},
			FieldMapping::Popularimeter => {
				let rating = parse_rating(value)?;
				match self.frames.iter_mut().find_map(|f| match f {
					Frame::Popularimeter(popm) => Some(popm),
					_ => None,
				}) {
					Some(popm) => popm.rating = rating,
					None => self.push(Frame::Popularimeter(PopularimeterFrame::new(
						version, "", rating, 0,
					))),
				}
			},
			_ if mapping.is_shared() => {
				let (role, name) = split_pair(mapping, value)?;
				self.push_pair(mapping, role, name);
			},
			_ => self.replace_text_field(key, value),
		}

		Ok(())
	}

	/// Add a value to a field, keeping the existing values
	///
	/// * Text fields append to the existing frame, as another NUL separated value
	/// * Comment, lyrics, URL, and unique file identifier fields add a new frame
	/// * Key/value pair fields append to the pair list
	/// * Number pairs and [`FieldKey::Rating`] hold a single value, and are replaced
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::set_field`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::fields::FieldKey;
	/// use tagsmith::id3::v2::Id3v2Tag;
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = Id3v2Tag::default();
	/// tag.add_field(FieldKey::AlbumArtist, "Foo")?;
	/// tag.add_field(FieldKey::AlbumArtist, "Bar")?;
	///
	/// assert_eq!(tag.get_fields(FieldKey::AlbumArtist), ["Foo", "Bar"]);
	/// assert_eq!(tag.len(), 1);
	/// # Ok(()) }
	/// ```
	pub fn add_field(&mut self, key: FieldKey, value: &str) -> Result<()> {
		let version = self.version();
		let mapping = key.mapping(version);

		match mapping {
			FieldMapping::Text(_) | FieldMapping::Genre | FieldMapping::UserText(_) => {
				let existing = self
					.frames
					.iter_mut()
					.find(|f| frame_matches(f, mapping, version));

				match existing {
					Some(Frame::Text(text)) => text.push_value(value),
					Some(Frame::UserText(text)) => {
						if !text.content.is_empty() {
							text.content.push(TEXT_VALUE_SEPARATOR);
						}
						text.content.push_str(value);
					},
					_ => self.push(new_field_frame(mapping, version, value)?),
				}
			},
			FieldMapping::Comment(_)
			| FieldMapping::Lyrics
			| FieldMapping::Url(_)
			| FieldMapping::UserUrl(_)
			| FieldMapping::UniqueFileIdentifier(_) => {
				self.push(new_field_frame(mapping, version, value)?);
			},
			FieldMapping::InvolvedPeopleRole(_)
			| FieldMapping::InvolvedPeople
			| FieldMapping::MusicianCredits => {
				let (role, name) = split_pair(mapping, value)?;
				self.push_pair(mapping, role, name);
			},
			FieldMapping::NumberPair(..) | FieldMapping::Popularimeter => {
				self.set_field(key, value)?;
			},
		}

		Ok(())
	}

	/// Remove every value of a field
	///
	/// Frames shared with other fields are only partially cleared. Removing
	/// [`FieldKey::TrackTotal`] keeps the track number, and removing [`FieldKey::Producer`] keeps
	/// the other involved people.
	pub fn delete_field(&mut self, key: FieldKey) {
		let version = self.version();
		let mapping = key.mapping(version);

		match mapping {
			FieldMapping::NumberPair(..) => self.set_number_pair_part(mapping, None),
			FieldMapping::InvolvedPeopleRole(_) | FieldMapping::MusicianCredits => {
				for frame in &mut self.frames {
					if let Frame::KeyValue(pairs) = frame {
						if frame_id_matches(pairs.id(), mapping, version) {
							pairs
								.key_value_pairs
								.retain(|(role, _)| !pair_matches(mapping, version, role));
						}
					}
				}

				self.frames.retain(|f| {
					!matches!(f, Frame::KeyValue(pairs) if pairs.key_value_pairs.is_empty())
				});
			},
			_ => self.frames.retain(|f| !frame_matches(f, mapping, version)),
		}
	}

	/// Create the frame holding a field, without adding it to the tag
	///
	/// The frame is created for the tag's version.
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::set_field`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::fields::FieldKey;
	/// use tagsmith::id3::v2::{Frame, Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let tag = Id3v2Tag::new(Id3v2Version::V2);
	///
	/// let frame = tag.create_field(FieldKey::Title, "Foo")?;
	/// assert_eq!(frame.id_str(), "TT2");
	/// assert!(tag.is_empty());
	/// # Ok(()) }
	/// ```
	pub fn create_field(&self, key: FieldKey, value: &str) -> Result<Frame> {
		new_field_frame(key.mapping(self.version()), self.version(), value)
	}

	// Infallible version of `set_field` for the convenience accessors, which only use keys
	// that map to plain text frames.
	pub(crate) fn replace_text_field(&mut self, key: FieldKey, value: &str) {
		let version = self.version();
		let mapping = key.mapping(version);

		self.delete_field(key);
		if value.is_empty() {
			return;
		}

		if let Ok(frame) = new_field_frame(mapping, version, value) {
			self.push(frame);
		}
	}

	pub(crate) fn set_number_pair_part(&mut self, mapping: FieldMapping, value: Option<u32>) {
		let FieldMapping::NumberPair(id, part) = mapping else {
			return;
		};

		let version = self.version();
		let existing = self
			.frames
			.iter()
			.position(|f| frame_matches(f, mapping, version));

		let (mut number, mut total) = match existing {
			Some(pos) => match &self.frames[pos] {
				Frame::Text(text) => split_number_pair(&text.value),
				_ => (None, None),
			},
			None => (None, None),
		};

		match part {
			NumberPairPart::Number => number = value,
			NumberPairPart::Total => total = value,
		}

		let Some(content) = format_number_pair(number, total) else {
			if let Some(pos) = existing {
				self.frames.remove(pos);
			}
			return;
		};

		match existing.map(|pos| &mut self.frames[pos]) {
			Some(Frame::Text(text)) => text.value = content,
			_ => self.push(Frame::Text(TextInformationFrame::new(
				FrameId::from_static(id),
				TextEncoding::Latin1,
				content,
			))),
		}
	}

	fn push_pair(&mut self, mapping: FieldMapping, role: &str, name: &str) {
		let version = self.version();
		let existing = self.frames.iter_mut().find_map(|f| match f {
			Frame::KeyValue(pairs) if frame_id_matches(pairs.id(), mapping, version) => Some(pairs),
			_ => None,
		});

		match existing {
			Some(pairs) => {
				if pairs.key_value_pairs.iter().any(|(r, n)| r == role && n == name) {
					return;
				}

				pairs
					.key_value_pairs
					.push((role.to_owned(), name.to_owned()));
			},
			None => {
				let encoding =
					TextEncoding::preferred_for(&format!("{role}{name}"), version);
				self.push(Frame::KeyValue(KeyValueFrame::new(
					mapping.frame_id(version),
					encoding,
					vec![(role.to_owned(), name.to_owned())],
				)));
			},
		}
	}
}

fn frame_id_matches(id: &FrameId, mapping: FieldMapping, version: Id3v2Version) -> bool {
	id.as_str() == mapping.raw_id(version)
}

// Whether `frame` holds (some of) the values of `mapping`
fn frame_matches(frame: &Frame, mapping: FieldMapping, version: Id3v2Version) -> bool {
	if !frame_id_matches(frame.id(), mapping, version) {
		return false;
	}

	match (mapping, frame) {
		(FieldMapping::UserText(description), Frame::UserText(text)) => {
			text.description == description
		},
		(FieldMapping::Comment(description), Frame::Comment(comment)) => {
			comment.description == description
		},
		(FieldMapping::UserUrl(description), Frame::UserUrl(url)) => url.description == description,
		(FieldMapping::UniqueFileIdentifier(owner), Frame::UniqueFileIdentifier(ufid)) => {
			ufid.owner == owner
		},
		(FieldMapping::InvolvedPeopleRole(role), Frame::KeyValue(pairs)) => {
			pairs.values_for(role).next().is_some()
		},
		(FieldMapping::MusicianCredits, Frame::KeyValue(pairs)) => pairs
			.key_value_pairs
			.iter()
			.any(|(role, _)| pair_matches(mapping, version, role)),
		(
			FieldMapping::UserText(_)
			| FieldMapping::Comment(_)
			| FieldMapping::UserUrl(_)
			| FieldMapping::UniqueFileIdentifier(_)
			| FieldMapping::InvolvedPeopleRole(_)
			| FieldMapping::MusicianCredits,
			_,
		) => false,
		_ => true,
	}
}

// Whether a pair of a key/value frame belongs to `mapping`
fn pair_matches(mapping: FieldMapping, version: Id3v2Version, role: &str) -> bool {
	match mapping {
		FieldMapping::InvolvedPeopleRole(expected) => role.eq_ignore_ascii_case(expected),
		// Musicians share the involved people list before ID3v2.4
		FieldMapping::MusicianCredits if version != Id3v2Version::V4 => !INVOLVED_PEOPLE_ROLES
			.iter()
			.any(|known| known.eq_ignore_ascii_case(role)),
		_ => true,
	}
}

fn split_pair(mapping: FieldMapping, value: &str) -> Result<(&str, &str)> {
	if let FieldMapping::InvolvedPeopleRole(role) = mapping {
		return Ok((role, value));
	}

	match value.split_once(PAIR_VALUE_SEPARATOR) {
		Some((role, name)) if !role.is_empty() => Ok((role, name)),
		_ => id3v2_err!(BadFrame(
			String::from(mapping.raw_id(Id3v2Version::V4)),
			"expected a `role:name` pair"
		)),
	}
}

fn parse_number(id: &str, value: &str) -> Result<u32> {
	match value.trim().parse::<u32>() {
		Ok(number) => Ok(number),
		Err(_) => id3v2_err!(BadFrame(id.to_owned(), "expected a number")),
	}
}

fn parse_rating(value: &str) -> Result<u8> {
	match value.trim().parse::<u8>() {
		Ok(rating) => Ok(rating),
		Err(_) => id3v2_err!(BadFrame(
			String::from("POPM"),
			"expected a rating between 0 and 255"
		)),
	}
}

// "3/12" -> (3, 12), a 0 on either side means the value is missing
pub(crate) fn split_number_pair(value: &str) -> (Option<u32>, Option<u32>) {
	let first = value.split(TEXT_VALUE_SEPARATOR).next().unwrap_or_default();
	let (number, total) = match first.split_once(NUMBER_PAIR_SEPARATOR) {
		Some((number, total)) => (number, Some(total)),
		None => (first, None),
	};

	let parse = |s: &str| s.trim().parse::<u32>().ok().filter(|n| *n != 0);
	(parse(number), total.and_then(parse))
}

pub(crate) fn format_number_pair(number: Option<u32>, total: Option<u32>) -> Option<String> {
	match (number, total) {
		(Some(number), Some(total)) => Some(format!("{number}{NUMBER_PAIR_SEPARATOR}{total}")),
		(Some(number), None) => Some(number.to_string()),
		(None, Some(total)) => Some(format!("0{NUMBER_PAIR_SEPARATOR}{total}")),
		(None, None) => None,
	}
}

pub(crate) fn new_field_frame(
	mapping: FieldMapping,
	version: Id3v2Version,
	value: &str,
) -> Result<Frame> {
	let encoding = TextEncoding::preferred_for(value, version);
	let id = mapping.frame_id(version);

	let frame = match mapping {
		FieldMapping::Text(_) | FieldMapping::Genre => {
			Frame::Text(TextInformationFrame::new(id, encoding, value))
		},
		FieldMapping::UserText(description) => Frame::UserText(ExtendedTextFrame::new(
			version,
			encoding,
			description,
			value,
		)),
		FieldMapping::Comment(description) => Frame::Comment(CommentFrame::new(
			version,
			encoding,
			DEFAULT_LANGUAGE,
			description,
			value,
		)),
		FieldMapping::Lyrics => Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
			version,
			encoding,
			DEFAULT_LANGUAGE,
			"",
			value,
		)),
		FieldMapping::Url(_) => Frame::Url(UrlLinkFrame::new(id, value)),
		FieldMapping::UserUrl(description) => Frame::UserUrl(ExtendedUrlFrame::new(
			version,
			TextEncoding::preferred_for(description, version),
			description,
			value,
		)),
		FieldMapping::InvolvedPeopleRole(_)
		| FieldMapping::InvolvedPeople
		| FieldMapping::MusicianCredits => {
			let (role, name) = split_pair(mapping, value)?;
			Frame::KeyValue(KeyValueFrame::new(
				id,
				encoding,
				vec![(role.to_owned(), name.to_owned())],
			))
		},
		FieldMapping::NumberPair(raw_id, part) => {
			let number = Some(parse_number(raw_id, value)?);
			let content = match part {
				NumberPairPart::Number => format_number_pair(number, None),
				NumberPairPart::Total => format_number_pair(None, number),
			};

			Frame::Text(TextInformationFrame::new(
				id,
				TextEncoding::Latin1,
				content.unwrap_or_default(),
			))
		},
		FieldMapping::UniqueFileIdentifier(owner) => Frame::UniqueFileIdentifier(
			UniqueFileIdentifierFrame::new(version, owner.to_owned(), value.as_bytes().to_vec()),
		),
		FieldMapping::Popularimeter => {
			Frame::Popularimeter(PopularimeterFrame::new(version, "", parse_rating(value)?, 0))
		},
	};

	Ok(frame)
}

#[cfg(test)]
mod tests {
	use super::{format_number_pair, split_number_pair};
	use crate::id3::v2::fields::FieldKey;
	use crate::id3::v2::items::{KeyValueFrame, TextInformationFrame};
	use crate::id3::v2::{Frame, FrameId, Id3v2Tag, Id3v2Version};
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn number_pairs() {
		assert_eq!(split_number_pair("3/12"), (Some(3), Some(12)));
		assert_eq!(split_number_pair("3"), (Some(3), None));
		assert_eq!(split_number_pair("0/12"), (None, Some(12)));
		assert_eq!(split_number_pair(" 03 / 12 "), (Some(3), Some(12)));
		assert_eq!(split_number_pair("foo"), (None, None));

		assert_eq!(format_number_pair(Some(3), Some(12)).as_deref(), Some("3/12"));
		assert_eq!(format_number_pair(None, Some(12)).as_deref(), Some("0/12"));
		assert_eq!(format_number_pair(None, None), None);
	}

	#[test_log::test]
	fn number_pair_fields_share_a_frame() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.set_field(FieldKey::TrackTotal, "12").unwrap();
		tag.set_field(FieldKey::Track, "3").unwrap();

		assert_eq!(tag.len(), 1);
		assert_eq!(tag.get_text(&FrameId::new("TRCK").unwrap()), Some("3/12"));

		tag.delete_field(FieldKey::Track);
		assert_eq!(tag.get_text(&FrameId::new("TRCK").unwrap()), Some("0/12"));
		assert_eq!(tag.get_first(FieldKey::Track), None);

		tag.delete_field(FieldKey::TrackTotal);
		assert!(tag.is_empty());

		assert!(tag.set_field(FieldKey::DiscNo, "one").is_err());
	}

	#[test_log::test]
	fn fallback_fields_per_version() {
		for version in Id3v2Version::ALL {
			let mut tag = Id3v2Tag::new(version);
			tag.set_field(FieldKey::MoodValence, "0.5").unwrap();
			tag.set_field(FieldKey::Mood, "Calm").unwrap();
			tag.set_field(FieldKey::Custom1, "Foo").unwrap();

			assert_eq!(tag.get_fields(FieldKey::MoodValence), ["0.5"]);
			assert_eq!(tag.get_fields(FieldKey::Mood), ["Calm"]);
			assert_eq!(tag.get_fields(FieldKey::Custom1), ["Foo"]);

			// Comments with reserved descriptions aren't plain comments
			assert!(tag.get_fields(FieldKey::Comment).is_empty());

			let expected_mood_id = match version {
				Id3v2Version::V2 => "TXX",
				Id3v2Version::V3 => "TXXX",
				Id3v2Version::V4 => "TMOO",
			};
			assert!(tag.frames().any(|f| f.id_str() == expected_mood_id));
		}
	}

	#[test_log::test]
	fn set_field_replaces() {
		let mut tag = Id3v2Tag::default();
		tag.add_field(FieldKey::Artist, "Foo").unwrap();
		tag.add_field(FieldKey::Artist, "Bar").unwrap();
		assert_eq!(tag.get_fields(FieldKey::Artist), ["Foo", "Bar"]);

		tag.set_field(FieldKey::Artist, "Baz").unwrap();
		assert_eq!(tag.get_fields(FieldKey::Artist), ["Baz"]);
		assert_eq!(tag.len(), 1);
	}

	#[test_log::test]
	fn involved_people_append() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.set_field(FieldKey::Producer, "Foo").unwrap();
		tag.set_field(FieldKey::Producer, "Bar").unwrap();
		tag.set_field(FieldKey::Producer, "Bar").unwrap();
		tag.set_field(FieldKey::Engineer, "Baz").unwrap();

		assert_eq!(tag.len(), 1);
		assert_eq!(tag.get_fields(FieldKey::Producer), ["Foo", "Bar"]);
		assert_eq!(tag.get_fields(FieldKey::Engineer), ["Baz"]);
		assert_eq!(
			tag.get_fields(FieldKey::InvolvedPerson),
			["producer:Foo", "producer:Bar", "engineer:Baz"]
		);

		tag.delete_field(FieldKey::Producer);
		assert_eq!(tag.get_fields(FieldKey::InvolvedPerson), ["engineer:Baz"]);

		assert!(tag.set_field(FieldKey::InvolvedPerson, "no role").is_err());
	}

	#[test_log::test]
	fn musicians_share_involved_people_before_v24() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.push(Frame::KeyValue(KeyValueFrame::new(
			FrameId::new("IPLS").unwrap(),
			TextEncoding::Latin1,
			vec![
				(String::from("producer"), String::from("Foo")),
				(String::from("guitar"), String::from("Bar")),
			],
		)));

		assert_eq!(tag.get_fields(FieldKey::Performer), ["guitar:Bar"]);
		assert_eq!(tag.get_fields(FieldKey::Producer), ["Foo"]);

		tag.delete_field(FieldKey::Performer);
		assert_eq!(tag.get_fields(FieldKey::InvolvedPerson), ["producer:Foo"]);

		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.set_field(FieldKey::Performer, "guitar:Bar").unwrap();
		assert_eq!(tag.frames().next().map(Frame::id_str), Some("TMCL"));
	}

	#[test_log::test]
	fn genre_references() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.push(Frame::Text(TextInformationFrame::new(
			FrameId::new("TCON").unwrap(),
			TextEncoding::Latin1,
			"(17)(8)Acid Jazz",
		)));

		assert_eq!(
			tag.get_fields(FieldKey::Genre),
			["Rock", "Jazz", "Acid Jazz"]
		);
		assert_eq!(tag.genre().as_deref(), Some("Rock"));
	}

	#[test_log::test]
	fn rating() {
		let mut tag = Id3v2Tag::default();
		tag.set_field(FieldKey::Rating, "196").unwrap();
		assert_eq!(tag.get_first(FieldKey::Rating).as_deref(), Some("196"));

		tag.set_field(FieldKey::Rating, "64").unwrap();
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.get_first(FieldKey::Rating).as_deref(), Some("64"));

		assert!(tag.set_field(FieldKey::Rating, "256").is_err());
	}

	#[test_log::test]
	fn musicbrainz_track_id() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V2);
		tag.set_field(
			FieldKey::MusicbrainzTrackId,
			"c5b6a4e7-4b0c-4b1a-9e3a-6b5e1e9f1d3a",
		)
		.unwrap();

		let frame = tag.frames().next().unwrap();
		assert_eq!(frame.id_str(), "UFI");
		assert_eq!(
			FieldKey::from_frame(frame, Id3v2Version::V2),
			Some(FieldKey::MusicbrainzTrackId)
		);
		assert_eq!(
			tag.get_first(FieldKey::MusicbrainzTrackId).as_deref(),
			Some("c5b6a4e7-4b0c-4b1a-9e3a-6b5e1e9f1d3a")
		);
	}

	#[test_log::test]
	fn urls() {
		let mut tag = Id3v2Tag::default();
		tag.add_field(FieldKey::UrlOfficialArtistSite, "https://example.com/a")
			.unwrap();
		tag.add_field(FieldKey::UrlOfficialArtistSite, "https://example.com/b")
			.unwrap();
		tag.set_field(FieldKey::UrlLyricsSite, "https://example.com/lyrics")
			.unwrap();

		assert_eq!(
			tag.get_fields(FieldKey::UrlOfficialArtistSite),
			["https://example.com/a", "https://example.com/b"]
		);
		assert_eq!(
			tag.get_first(FieldKey::UrlLyricsSite).as_deref(),
			Some("https://example.com/lyrics")
		);
		assert_eq!(tag.len(), 3);
	}

	#[test_log::test]
	fn create_field_does_not_insert() {
		let tag = Id3v2Tag::new(Id3v2Version::V3);

		let frame = tag.create_field(FieldKey::DiscTotal, "2").unwrap();
		let Frame::Text(text) = &frame else {
			panic!("expected a text frame, got {frame:?}");
		};
		assert_eq!(text.value, "0/2");
		assert!(tag.is_empty());

		let frame = tag.create_field(FieldKey::Arranger, "Foo").unwrap();
		assert_eq!(frame.id_str(), "IPLS");
	}
}
