#[cfg(test)]
mod tests;

use super::fields::FieldKey;
use super::frame::Frame;
use super::header::{Id3v2TagFlags, Id3v2Version};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::FrameId;
use crate::id3::v2::items::{
	CommentFrame, ExtendedTextFrame, TextInformationFrame, UnsynchronizedTextFrame,
};
use crate::id3::v2::util::genres::parse_genres;
use crate::id3::v2::write;
use crate::util::text::TextEncoding;

use std::borrow::Cow;
use std::io::Write;

macro_rules! impl_accessor {
	($($name:ident => $key:ident;)+) => {
		paste::paste! {
			$(
				#[doc = concat!("Get the first value of [`FieldKey::", stringify!($key), "`]")]
				pub fn $name(&self) -> Option<Cow<'_, str>> {
					self.get_first(FieldKey::$key)
				}

				#[doc = concat!("Replace every value of [`FieldKey::", stringify!($key), "`]")]
				pub fn [<set_ $name>](&mut self, value: String) {
					self.replace_text_field(FieldKey::$key, &value);
				}

				#[doc = concat!("Remove every value of [`FieldKey::", stringify!($key), "`]")]
				pub fn [<remove_ $name>](&mut self) {
					self.delete_field(FieldKey::$key);
				}
			)+
		}
	}
}

macro_rules! impl_number_accessor {
	($($name:ident => $key:ident;)+) => {
		paste::paste! {
			$(
				#[doc = concat!("Get [`FieldKey::", stringify!($key), "`] as a number")]
				pub fn $name(&self) -> Option<u32> {
					self.get_first(FieldKey::$key)?.parse().ok()
				}

				#[doc = concat!("Set [`FieldKey::", stringify!($key), "`], keeping the other half of the pair")]
				pub fn [<set_ $name>](&mut self, value: u32) {
					self.set_number_pair_part(FieldKey::$key.mapping(self.version), Some(value));
				}

				#[doc = concat!("Remove [`FieldKey::", stringify!($key), "`], keeping the other half of the pair")]
				pub fn [<remove_ $name>](&mut self) {
					self.delete_field(FieldKey::$key);
				}
			)+
		}
	}
}

/// An `ID3v2` tag
///
/// A tag is an ordered list of [`Frame`]s for a single ID3v2 version. Frame IDs may repeat, and
/// frames keep the order they were read or added in.
///
/// Frames can be handled directly by ID (see [`Id3v2Tag::get`], [`Id3v2Tag::insert`],
/// [`Id3v2Tag::remove`]) or through format independent [`FieldKey`]s (see
/// [`Id3v2Tag::get_first`] and friends).
///
/// To move a tag to another version, see [`convert`](crate::id3::v2::convert::convert).
///
/// ## Special Frames
///
/// Frames without a dedicated representation (ex. `GEOB`, `SYLT`) are stored as
/// [`BinaryFrame`](crate::id3::v2::BinaryFrame)s and written back unchanged.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Id3v2Tag {
	version: Id3v2Version,
	flags: Id3v2TagFlags,
	pub(crate) frames: Vec<Frame>,
}

impl IntoIterator for Id3v2Tag {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a Id3v2Tag {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.iter()
	}
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self::new(Id3v2Version::V4)
	}
}

impl Id3v2Tag {
	/// Create a new empty tag of `version`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// let tag = Id3v2Tag::new(Id3v2Version::V3);
	/// assert!(tag.is_empty());
	/// assert_eq!(tag.version(), Id3v2Version::V3);
	/// ```
	pub fn new(version: Id3v2Version) -> Self {
		Self {
			version,
			flags: Id3v2TagFlags::default(),
			frames: Vec::new(),
		}
	}

	pub(crate) fn with_frames(
		version: Id3v2Version,
		flags: Id3v2TagFlags,
		frames: Vec<Frame>,
	) -> Self {
		Self {
			version,
			flags,
			frames,
		}
	}

	/// The version of the tag
	///
	/// Every frame in the tag is expected to use an ID of this version.
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// Returns the [`Id3v2TagFlags`]
	pub fn flags(&self) -> &Id3v2TagFlags {
		&self.flags
	}

	/// Set the tag's flags
	pub fn set_flags(&mut self, flags: Id3v2TagFlags) {
		self.flags = flags
	}

	/// The number of frames in the tag
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Remove every frame
	pub fn clear(&mut self) {
		self.frames.clear();
	}

	/// Iterate over every frame, in order
	pub fn frames(&self) -> impl Iterator<Item = &Frame> + Clone {
		self.frames.iter()
	}
}

impl Id3v2Tag {
	/// Gets the first [`Frame`] with an ID
	pub fn get(&self, id: &FrameId) -> Option<&Frame> {
		self.frames.iter().find(|f| f.id() == id)
	}

	/// Gets every [`Frame`] with an ID, in order
	pub fn get_frames<'a>(&'a self, id: &'a FrameId) -> impl Iterator<Item = &'a Frame> + 'a {
		self.frames.iter().filter(move |f| f.id() == id)
	}

	/// Gets the text for a frame
	///
	/// NOTE: There could be multiple values separated by null characters (`'\0'`).
	///       Use [`Id3v2Tag::get_texts`] to conveniently split all of the values.
	///
	/// NOTE: This will not work for `TXXX` frames, use [`Id3v2Tag::get_user_text`] for that.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::{FrameId, Id3v2Tag};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = Id3v2Tag::default();
	/// tag.set_title(String::from("Foo"));
	///
	/// assert_eq!(tag.get_text(&FrameId::new("TIT2")?), Some("Foo"));
	/// # Ok(()) }
	/// ```
	pub fn get_text(&self, id: &FrameId) -> Option<&str> {
		if let Some(Frame::Text(TextInformationFrame { value, .. })) = self.get(id) {
			return Some(value);
		}

		None
	}

	/// Gets all of the values for a text frame
	///
	/// NOTE: Multiple values are only supported in ID3v2.4, this will not be
	///       very useful for ID3v2.2/3 tags.
	pub fn get_texts(&self, id: &FrameId) -> Option<impl Iterator<Item = &str>> {
		if let Some(Frame::Text(frame)) = self.get(id) {
			return Some(frame.values());
		}

		None
	}

	/// Gets the text for a user-defined frame (`TXXX`/`TXX`)
	///
	/// NOTE: If the tag is [`Id3v2Version::V4`], there could be multiple values separated by null characters (`'\0'`).
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::Id3v2Tag;
	///
	/// let mut tag = Id3v2Tag::default();
	///
	/// // Add a new "TXXX" frame identified by "SOME_DESCRIPTION"
	/// let _ = tag.insert_user_text(String::from("SOME_DESCRIPTION"), String::from("Some value"));
	///
	/// // Now we can get the value back using `get_user_text`
	/// let value = tag.get_user_text("SOME_DESCRIPTION");
	/// assert_eq!(value, Some("Some value"));
	/// ```
	pub fn get_user_text(&self, description: &str) -> Option<&str> {
		self.frames.iter().find_map(|frame| match frame {
			Frame::UserText(ExtendedTextFrame {
				description: desc,
				content,
				..
			}) if desc == description => Some(content.as_str()),
			_ => None,
		})
	}

	/// Inserts a new user-defined text frame (`TXXX`/`TXX`)
	///
	/// This replaces any frame with the same description.
	pub fn insert_user_text(&mut self, description: String, content: String) -> Option<Frame> {
		let encoding = TextEncoding::preferred_for(&content, self.version);
		self.insert(Frame::UserText(ExtendedTextFrame::new(
			self.version,
			encoding,
			description,
			content,
		)))
	}

	/// Removes a user-defined text frame (`TXXX`/`TXX`) by its description
	///
	/// This will return the matching frame.
	pub fn remove_user_text(&mut self, description: &str) -> Option<Frame> {
		self.frames
			.iter()
			.position(|frame| {
				matches!(frame, Frame::UserText(ExtendedTextFrame {
					description: desc, ..
				}) if desc == description)
			})
			.map(|pos| self.frames.remove(pos))
	}

	/// Inserts a [`Frame`]
	///
	/// This will replace any frame of the same id (**or description!** See [`ExtendedTextFrame`]).
	/// Use [`Id3v2Tag::push`] to keep duplicates.
	pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
		// Some frames can only appear once in a tag, handle them separately
		const ONE_PER_TAG: [&str; 11] = [
			"MCDI", "ETCO", "MLLT", "SYTC", "RVRB", "PCNT", "RBUF", "POSS", "OWNE", "SEEK", "ASPI",
		];

		if ONE_PER_TAG.contains(&frame.id_str()) {
			let ret = self.remove(frame.id()).next();
			self.frames.push(frame);
			return ret;
		}

		let replaced = self
			.frames
			.iter()
			.position(|f| f == &frame)
			.map(|pos| self.frames.remove(pos));

		self.frames.push(frame);
		replaced
	}

	/// Appends a [`Frame`], keeping any existing frames with the same ID
	pub fn push(&mut self, frame: Frame) {
		self.frames.push(frame);
	}

	/// Removes a [`Frame`] by id
	///
	/// This will remove any frames with the same ID. To remove `TXXX` frames by their descriptions,
	/// see [`Id3v2Tag::remove_user_text`].
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::TextEncoding;
	/// use tagsmith::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mood_id = FrameId::new("TMOO")?;
	///
	/// let mut tag = Id3v2Tag::default();
	/// let tmoo_frame = Frame::Text(TextInformationFrame::new(
	/// 	mood_id.clone(),
	/// 	TextEncoding::Latin1,
	/// 	"Classical",
	/// ));
	///
	/// let _ = tag.insert(tmoo_frame.clone());
	/// assert!(!tag.is_empty());
	///
	/// // Now we can remove it by its ID
	/// let mut values = tag.remove(&mood_id);
	///
	/// // We got back exactly what we inserted
	/// assert_eq!(values.next(), Some(tmoo_frame));
	/// assert!(values.next().is_none());
	/// drop(values);
	///
	/// // The tag is now empty
	/// assert!(tag.is_empty());
	/// # Ok(()) }
	/// ```
	pub fn remove(&mut self, id: &FrameId) -> impl Iterator<Item = Frame> + '_ {
		// Moves the matching frames to the front, keeping the order of the rest
		let mut split_idx = 0_usize;

		for read_idx in 0..self.frames.len() {
			if self.frames[read_idx].id() == id {
				self.frames[split_idx..=read_idx].rotate_right(1);
				split_idx += 1;
			}
		}

		self.frames.drain(..split_idx)
	}

	/// Retains [`Frame`]s by evaluating the predicate
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(predicate)
	}

	/// Returns all `USLT`/`ULT` frames
	pub fn unsync_text(&self) -> impl Iterator<Item = &UnsynchronizedTextFrame> + Clone {
		self.frames.iter().filter_map(|f| match f {
			Frame::UnsynchronizedText(val) => Some(val),
			_ => None,
		})
	}

	/// Returns all `COMM`/`COM` frames with an empty content descriptor
	pub fn comments(&self) -> impl Iterator<Item = &CommentFrame> {
		self.frames.iter().filter_map(|frame| match frame {
			Frame::Comment(comment) if comment.description.is_empty() => Some(comment),
			_ => None,
		})
	}

	/// Returns all genres contained in the genre frame (`TCON`/`TCO`)
	///
	/// Numeric references (ex. `"(17)"`) are replaced by the genre they name.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::TextEncoding;
	/// use tagsmith::id3::v2::{Frame, FrameId, Id3v2Tag, Id3v2Version, TextInformationFrame};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	/// tag.insert(Frame::Text(TextInformationFrame::new(
	/// 	FrameId::new("TCON")?,
	/// 	TextEncoding::Latin1,
	/// 	"(17)(8)",
	/// )));
	///
	/// assert_eq!(tag.genres(), ["Rock", "Jazz"]);
	/// # Ok(()) }
	/// ```
	pub fn genres(&self) -> Vec<Cow<'_, str>> {
		let id = FrameId::versioned(self.version, "TCO", "TCON");
		match self.get(&id) {
			Some(Frame::Text(TextInformationFrame { value, .. })) => parse_genres(value),
			_ => Vec::new(),
		}
	}

	/// Dumps the tag to a writer
	///
	/// This writes the complete tag, including the header and padding.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * [`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData)
	/// * A frame ID isn't valid for the tag version
	pub fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let tag = write::create_tag(self, write_options)?;
		writer.write_all(&tag)?;
		Ok(())
	}
}

/// ## Convenience accessors
///
/// These read through [`Id3v2Tag::get_first`], so numeric genres are resolved and only the first
/// value of a multi-value frame is returned.
impl Id3v2Tag {
	impl_accessor!(
		title   => Title;
		artist  => Artist;
		album   => Album;
		genre   => Genre;
		comment => Comment;
	);

	impl_number_accessor!(
		track       => Track;
		track_total => TrackTotal;
		disk        => DiscNo;
		disk_total  => DiscTotal;
	);
}
