pub(super) mod parse;

use crate::error::Result;
use crate::id3::v2::{FrameFlags, Id3v2Version};
use crate::macros::id3v2_err;

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// An ID3v2 frame header
///
/// These are rarely constructed by hand. Usually they are created in the background
/// when making a new [`Frame`](crate::id3::v2::Frame).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct FrameHeader {
	pub(crate) id: FrameId,
	pub flags: FrameFlags,
}

impl FrameHeader {
	/// Create a new [`FrameHeader`]
	///
	/// NOTE: Once the header is created, the ID becomes immutable.
	pub const fn new(id: FrameId, flags: FrameFlags) -> Self {
		Self { id, flags }
	}

	/// Get the ID of the frame
	pub const fn id(&self) -> &FrameId {
		&self.id
	}
}

/// An ID3v2 frame ID
///
/// ID3v2.2 uses 3 character IDs, while ID3v2.3 and ID3v2.4 use 4 characters. Both are accepted
/// here, a tag will refuse to write an ID that doesn't match its version.
#[derive(PartialEq, Clone, Debug, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(Cow<'static, str>);

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is an invalid length (must be 3 or 4)
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::{FrameId, Id3v2Version};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let title = FrameId::new("TIT2")?;
	/// assert!(title.is_valid_for(Id3v2Version::V4));
	/// assert!(!title.is_valid_for(Id3v2Version::V2));
	///
	/// let v2_title = FrameId::new("TT2")?;
	/// assert!(v2_title.is_valid_for(Id3v2Version::V2));
	///
	/// assert!(FrameId::new("tit2").is_err());
	/// assert!(FrameId::new("TITLE").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<Cow<'static, str>>,
	{
		Self::new_cow(id.into())
	}

	// Split from generic, public method to avoid code bloat by monomorphization.
	fn new_cow(id: Cow<'static, str>) -> Result<Self> {
		if !matches!(id.len(), 3 | 4)
			|| !id
				.bytes()
				.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
		{
			id3v2_err!(BadFrameId(id.into_owned().into_bytes()));
		}

		Ok(Self(id))
	}

	/// Used for IDs known at compile time, has no correctness checks
	pub(crate) const fn from_static(id: &'static str) -> Self {
		Self(Cow::Borrowed(id))
	}

	/// Pick between the ID3v2.2 and ID3v2.3/4 ID of a frame
	pub(crate) fn versioned(version: Id3v2Version, v22: &'static str, v23: &'static str) -> Self {
		match version {
			Id3v2Version::V2 => Self::from_static(v22),
			_ => Self::from_static(v23),
		}
	}

	/// Whether the ID has the right length for `version`
	pub fn is_valid_for(&self, version: Id3v2Version) -> bool {
		self.0.len() == version.frame_id_len()
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the [`FrameId`], returning the inner value
	pub fn into_inner(self) -> Cow<'static, str> {
		self.0
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl PartialEq<str> for FrameId {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

impl PartialEq<&str> for FrameId {
	fn eq(&self, other: &&str) -> bool {
		self.as_str() == *other
	}
}

impl From<FrameId> for Cow<'static, str> {
	fn from(value: FrameId) -> Self {
		value.into_inner()
	}
}
