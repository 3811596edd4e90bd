use crate::id3::v2::Id3v2Version;

/// Options to control how tagsmith writes to a file
///
/// This is an immutable value handed to every save. Build one per application (or per batch of
/// files) and pass it along.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) id3v2_version: Id3v2Version,
	pub(crate) genres_as_text: bool,
	pub(crate) android_compatible: bool,
	pub(crate) respect_read_only: bool,
	pub(crate) minimum_file_size: u64,
	pub(crate) lossy_text_encoding: bool,
	pub(crate) write_id3v1: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Default minimum size of a file that can be saved
	pub const DEFAULT_MINIMUM_FILE_SIZE: u64 = 150;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			id3v2_version: Id3v2Version::V4,
			genres_as_text: true,
			android_compatible: false,
			respect_read_only: true,
			minimum_file_size: Self::DEFAULT_MINIMUM_FILE_SIZE,
			lossy_text_encoding: true,
			write_id3v1: true,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// This many bytes of zeroes are appended to every ID3v2 tag. The audio is always relocated
	/// to sit directly after the tag and its padding, so a tag serializes to the same size no
	/// matter which file it is saved into.
	///
	/// NOTE: Padding is never written after a tag that has a footer.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// The ID3v2 version to use for newly created tags
	///
	/// Existing tags keep their version, see [`convert`](crate::id3::v2::convert) to change it.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	/// use tagsmith::id3::v2::Id3v2Version;
	///
	/// // Some older players only understand ID3v2.3
	/// let options = WriteOptions::new().id3v2_version(Id3v2Version::V3);
	/// ```
	pub fn id3v2_version(mut self, id3v2_version: Id3v2Version) -> Self {
		self.id3v2_version = id3v2_version;
		self
	}

	/// Whether to write genres as text rather than their numeric ID3v1 codes
	///
	/// When disabled, genres found in the ID3v1 genre list are written as `"(17)"` in ID3v2.2 and
	/// ID3v2.3 tags, and as `"17"` in ID3v2.4 tags. Genres outside of the list are always written as
	/// text. Reading accepts both forms regardless of this setting.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// let options = WriteOptions::new().genres_as_text(false);
	/// ```
	pub fn genres_as_text(mut self, genres_as_text: bool) -> Self {
		self.genres_as_text = genres_as_text;
		self
	}

	/// Whether to force ISO-8859-1 text for compatibility with Android's media scanner
	///
	/// Characters that cannot be represented are replaced according to
	/// [`WriteOptions::lossy_text_encoding`].
	pub fn android_compatible(mut self, android_compatible: bool) -> Self {
		self.android_compatible = android_compatible;
		self
	}

	/// Whether to check that the file is writable before saving
	///
	/// When enabled, saving a read only file fails with
	/// [`ErrorKind::ReadOnlyFile`](crate::error::ErrorKind::ReadOnlyFile) before any byte is
	/// touched.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// // Let the operating system decide
	/// let options = WriteOptions::new().respect_read_only(false);
	/// ```
	pub fn respect_read_only(mut self, respect_read_only: bool) -> Self {
		self.respect_read_only = respect_read_only;
		self
	}

	/// The size a file must exceed in order to be saved
	///
	/// Anything smaller is assumed to be truncated or corrupt.
	pub fn minimum_file_size(mut self, minimum_file_size: u64) -> Self {
		self.minimum_file_size = minimum_file_size;
		self
	}

	/// Whether to replace unencodable characters with `?` rather than fail
	///
	/// This only applies to text written in ISO-8859-1 (frame descriptions that require it, ID3v1
	/// fields, and text forced by [`WriteOptions::android_compatible`]).
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}

	/// Whether to write an ID3v1 tag when the file holds one
	///
	/// When disabled, any existing ID3v1 trailer is left untouched.
	pub fn write_id3v1(mut self, write_id3v1: bool) -> Self {
		self.write_id3v1 = write_id3v1;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 1024,
	///     id3v2_version: Id3v2Version::V4,
	///     genres_as_text: true,
	///     android_compatible: false,
	///     respect_read_only: true,
	///     minimum_file_size: 150,
	///     lossy_text_encoding: true,
	///     write_id3v1: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
