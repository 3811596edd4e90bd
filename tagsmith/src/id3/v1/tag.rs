use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v1::constants::{GENRES, genre_index};

use std::borrow::Cow;
use std::io::Write;

macro_rules! impl_accessor {
	($($name:ident),+ $(,)?) => {
		paste::paste! {
			$(
				#[doc = "Returns the " $name]
				pub fn $name(&self) -> Option<Cow<'_, str>> {
					self.$name.as_deref().map(Cow::Borrowed)
				}

				#[doc = "Sets the " $name]
				///
				/// The value is cut to 30 bytes when written.
				pub fn [<set_ $name>](&mut self, value: String) {
					self.$name = Some(value)
				}

				#[doc = "Removes the " $name]
				pub fn [<remove_ $name>](&mut self) {
					self.$name = None
				}
			)+
		}
	}
}

/// An ID3v1 tag
///
/// ID3v1 is a severely limited format, with each field being incredibly small in size. All fields
/// have been commented with their maximum sizes and any other additional restrictions.
///
/// Attempting to write a field greater than the maximum size will **not** error, it will just be
/// shrunk.
///
/// The tag lives in the last 128 bytes of a file, and is saved independently of any ID3v2 tag.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year (max 9999)
	pub year: Option<u16>,
	/// A short comment
	///
	/// A V1 tag may have been read, which limits this field to 30 bytes.
	/// A V1.1 tag, however, only has 28 bytes available.
	///
	/// tagsmith will *always* write a V1.1 tag.
	pub comment: Option<String>,
	/// The track number, 1 byte max
	///
	/// The track number **cannot** be 0. Readers look for a null byte at the end of the comment
	/// followed by a non-zero byte to tell V1.1 apart from V1.
	pub track_number: Option<u8>,
	/// The track's genre, 1 byte max
	///
	/// ID3v1 has a predefined set of genres, see [`GENRES`]. This byte should be an index to a
	/// genre.
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	/// Create a new empty `Id3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v1::Id3v1Tag;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	impl_accessor!(title, artist, album);

	/// Returns the genre name, if the genre byte is a valid index into [`GENRES`]
	pub fn genre(&self) -> Option<Cow<'_, str>> {
		self.genre
			.and_then(|g| GENRES.get(g as usize))
			.map(|g| Cow::Borrowed(*g))
	}

	/// Sets the genre by name
	///
	/// Names outside of [`GENRES`] cannot be represented and are ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v1::Id3v1Tag;
	///
	/// let mut tag = Id3v1Tag::new();
	/// tag.set_genre(String::from("rock"));
	/// assert_eq!(tag.genre, Some(17));
	///
	/// tag.set_genre(String::from("Not a genre"));
	/// assert_eq!(tag.genre, Some(17));
	/// ```
	pub fn set_genre(&mut self, genre: String) {
		match genre_index(&genre) {
			Some(index) => self.genre = Some(index),
			None => log::warn!("ID3v1: \"{genre}\" is not a known genre, ignoring"),
		}
	}

	/// Removes the genre
	pub fn remove_genre(&mut self) {
		self.genre = None
	}

	/// Returns the comment
	pub fn comment(&self) -> Option<Cow<'_, str>> {
		self.comment.as_deref().map(Cow::Borrowed)
	}

	/// Sets the comment, cut to the 28 bytes available in a V1.1 tag
	pub fn set_comment(&mut self, value: String) {
		let mut resized = String::with_capacity(28);
		for c in value.chars() {
			if resized.len() + c.len_utf8() > 28 {
				break;
			}

			resized.push(c);
		}

		self.comment = Some(resized);
	}

	/// Removes the comment
	pub fn remove_comment(&mut self) {
		self.comment = None;
	}

	/// Returns the track number
	pub fn track(&self) -> Option<u32> {
		self.track_number.map(u32::from)
	}

	/// Sets the track number
	///
	/// Numbers that do not fit in a single non-zero byte remove the track number.
	pub fn set_track(&mut self, value: u32) {
		self.track_number = u8::try_from(value).ok().filter(|n| *n != 0);
	}

	/// Removes the track number
	pub fn remove_track(&mut self) {
		self.track_number = None;
	}

	/// The number of fields that hold a value
	pub fn len(&self) -> usize {
		usize::from(self.title.is_some())
			+ usize::from(self.artist.is_some())
			+ usize::from(self.album.is_some())
			+ usize::from(self.year.is_some())
			+ usize::from(self.comment.is_some())
			+ usize::from(self.track_number.is_some())
			+ usize::from(self.genre.is_some())
	}

	/// Whether every field is empty
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	/// Empties every field
	pub fn clear(&mut self) {
		*self = Self::default();
	}

	/// Dumps the 128 byte tag to a writer
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * A field cannot be encoded as ISO-8859-1, and
	///   [`WriteOptions::lossy_text_encoding`] is disabled
	pub fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let tag = super::write::encode(self, write_options)?;
		writer.write_all(&tag)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v1::Id3v1Tag;

	#[test_log::test]
	fn accessors() {
		let mut tag = Id3v1Tag::new();
		tag.set_title(String::from("Foo title"));
		tag.set_genre(String::from("Psybient"));
		tag.set_track(3);

		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert_eq!(tag.genre().as_deref(), Some("Psybient"));
		assert_eq!(tag.track(), Some(3));
		assert_eq!(tag.len(), 3);

		// Not representable
		tag.set_track(256);
		assert_eq!(tag.track(), None);
		tag.set_track(0);
		assert_eq!(tag.track(), None);

		tag.set_comment(String::from("A comment that does not fit in 28 bytes"));
		assert_eq!(tag.comment().as_deref(), Some("A comment that does not fit "));

		tag.clear();
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn dump_and_parse() {
		let tag = Id3v1Tag {
			title: Some(String::from("Foo title")),
			artist: Some(String::from("Bar artist")),
			album: Some(String::from("Baz album")),
			year: Some(1984),
			comment: Some(String::from("Qux comment")),
			track_number: Some(1),
			genre: Some(32),
		};

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default()).unwrap();
		assert_eq!(writer.len(), 128);

		let bytes: [u8; 128] = writer.try_into().unwrap();
		let parsed = Id3v1Tag::parse(bytes, ParsingMode::Strict).unwrap();
		assert_eq!(parsed, tag);
	}
}
