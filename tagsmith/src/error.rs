//! Contains the errors that can arise within tagsmith
//!
//! The primary error is [`TagsmithError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.
//!
//! The absence of a tag is never an error. Readers return `Option`s for tags, and only malformed
//! data, I/O failures, and failed write preconditions are reported here.

use crate::file::FileRegion;
use crate::id3::v2::FrameId;
pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, TagsmithError>`
pub type Result<T> = std::result::Result<T, TagsmithError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// File data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,
	/// No plausible MPEG audio frame could be found
	///
	/// Callers may choose to treat the whole stream as headerless when this occurs.
	InvalidAudioFrame,
	/// Errors that occur while decoding a file
	FileDecoding(FileDecodingError),
	/// Errors that occur while encoding a file
	FileEncoding(FileEncodingError),

	// Write preconditions
	/// The file to be saved does not exist
	FileNotFound,
	/// The file to be saved is read only
	///
	/// See [`WriteOptions::respect_read_only`](crate::config::WriteOptions::respect_read_only)
	ReadOnlyFile,
	/// The file to be saved is too small to be a sane MPEG file
	FileTooSmall {
		/// The size of the file
		size: u64,
		/// The configured minimum size
		minimum: u64,
	},

	// Tag related errors
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),
	/// Errors that arise while reading/writing ID3v2 tags
	Id3v2(Id3v2Error),

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Unable to convert bytes to a str
	StrFromUtf8(std::str::Utf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// The types of errors that can occur while interacting with ID3v2 tags
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	// Header
	/// Arises when an invalid ID3v2 version is found
	BadId3v2Version(u8, u8),
	/// Arises when a size field that must be synchsafe has its high bit set
	BadSynchsafeInteger([u8; 4]),
	/// Arises when a compressed ID3v2.2 tag is encountered
	///
	/// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
	/// As such, it is recommended to ignore the tag entirely.
	V2Compression,
	/// Arises when an extended header has an invalid size (must be >= 6 bytes and less than the total tag size)
	BadExtendedHeaderSize,

	// Frame
	/// Arises when a frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or if the ID is too short/long.
	BadFrameId(Vec<u8>),
	/// Arises when a frame ID is well formed, but does not fit the version of the tag it is placed in
	///
	/// ID3v2.2 frame IDs are 3 characters, while ID3v2.3 and ID3v2.4 frame IDs are 4.
	FrameIdVersionMismatch(FrameId),
	/// Arises when a frame doesn't have enough data
	BadFrameLength,
	/// Arises when reading/writing a compressed or encrypted frame with no data length indicator
	MissingDataLengthIndicator,
	/// Arises when a frame or tag has its unsynchronisation flag set, but the content is not actually synchsafe
	///
	/// See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation) for an explanation.
	InvalidUnsynchronisation,
	/// Arises when a text encoding other than Latin-1 or UTF-16 appear in an ID3v2.2 tag
	V2InvalidTextEncoding,
	/// Arises when decoding a [`UniqueFileIdentifierFrame`](crate::id3::v2::UniqueFileIdentifierFrame) with no owner
	MissingUfidOwner,

	// Compression
	#[cfg(feature = "id3v2_compression_support")]
	/// Arises when a compressed frame is unable to be decompressed
	Decompression(flate2::DecompressError),
	#[cfg(not(feature = "id3v2_compression_support"))]
	/// Arises when a compressed frame is encountered, but support is disabled
	CompressedFrameEncountered,

	// Writing
	/// Arises when attempting to write an encrypted frame with an invalid encryption method symbol (must be >= 0x80)
	InvalidEncryptionMethodSymbol(u8),
	/// Arises when attempting to write an invalid Frame (Bad `FrameId`/frame content pairing)
	BadFrame(String, &'static str),
	/// Arises when attempting to write a [`CommentFrame`](crate::id3::v2::CommentFrame) or [`UnsynchronizedTextFrame`](crate::id3::v2::UnsynchronizedTextFrame) with an invalid language
	InvalidLanguage([u8; 3]),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			// Header
			Self::BadId3v2Version(major, minor) => write!(
				f,
				"Found an invalid version (v{major}.{minor}), expected any major revision in: (2, \
				 3, 4)"
			),
			Self::BadSynchsafeInteger(bytes) => {
				write!(f, "Found a size that isn't synchsafe: {bytes:02x?}")
			},
			Self::V2Compression => write!(f, "Encountered a compressed ID3v2.2 tag"),
			Self::BadExtendedHeaderSize => {
				write!(f, "Found an extended header with an invalid size")
			},

			// Frame
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::FrameIdVersionMismatch(id) => {
				write!(f, "Frame ID `{id}` is not valid for the version of the tag")
			},
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to extract the necessary information"
			),
			Self::MissingDataLengthIndicator => write!(
				f,
				"Encountered an encrypted frame without a data length indicator"
			),
			Self::InvalidUnsynchronisation => write!(f, "Encountered an invalid unsynchronisation"),
			Self::V2InvalidTextEncoding => {
				write!(f, "ID3v2.2 only supports Latin-1 and UTF-16 encodings")
			},
			Self::MissingUfidOwner => write!(f, "Missing owner in UFID frame"),

			// Compression
			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Failed to decompress frame: {err}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => write!(
				f,
				"Encountered a compressed ID3v2 frame, support is disabled"
			),

			// Writing
			Self::InvalidEncryptionMethodSymbol(symbol) => write!(
				f,
				"Attempted to write an encrypted frame with an invalid method symbol ({symbol})"
			),
			Self::BadFrame(frame_id, frame_value) => write!(
				f,
				"Attempted to write an invalid frame. ID: \"{frame_id}\", Value: \"{frame_value}\"",
			),
			Self::InvalidLanguage(lang) => write!(
				f,
				"Invalid frame language found: {lang:?} (expected 3 ascii characters)"
			),
		}
	}
}

/// An error that arises while interacting with an ID3v2 tag
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Create a new `Id3v2Error` from an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`Id3v2ErrorKind`]
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {:?}", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// An error that arises while decoding a file
pub struct FileDecodingError {
	region: Option<FileRegion>,
	description: &'static str,
}

impl FileDecodingError {
	/// Create a `FileDecodingError` from a [`FileRegion`] and description
	#[must_use]
	pub const fn new(region: FileRegion, description: &'static str) -> Self {
		Self {
			region: Some(region),
			description,
		}
	}

	/// Create a `FileDecodingError` without binding it to a [`FileRegion`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			region: None,
			description,
		}
	}

	/// Returns the associated [`FileRegion`], if one exists
	pub fn region(&self) -> Option<FileRegion> {
		self.region
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(region) = self.region {
			write!(f, "{:?}: {:?}", region, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(region) = self.region {
			write!(f, "{:?}: {}", region, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// An error that arises while encoding a file
pub struct FileEncodingError {
	region: Option<FileRegion>,
	description: &'static str,
}

impl FileEncodingError {
	/// Create a `FileEncodingError` from a [`FileRegion`] and description
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::FileEncodingError;
	/// use tagsmith::file::FileRegion;
	///
	/// // This error is bound to `FileRegion::Id3v2`, which will be displayed when the error is formatted
	/// let id3v2_error = FileEncodingError::new(FileRegion::Id3v2, "Something went wrong in the tag!");
	/// ```
	#[must_use]
	pub const fn new(region: FileRegion, description: &'static str) -> Self {
		Self {
			region: Some(region),
			description,
		}
	}

	/// Create a `FileEncodingError` without binding it to a [`FileRegion`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			region: None,
			description,
		}
	}

	/// Returns the associated [`FileRegion`], if one exists
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::FileEncodingError;
	/// use tagsmith::file::FileRegion;
	///
	/// let error = FileEncodingError::new(FileRegion::Audio, "Something went wrong in the audio!");
	///
	/// assert_eq!(error.region(), Some(FileRegion::Audio));
	/// ```
	pub fn region(&self) -> Option<FileRegion> {
		self.region
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileEncodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(region) = self.region {
			write!(f, "{:?}: {:?}", region, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for FileEncodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(region) = self.region {
			write!(f, "{:?}: {}", region, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// Errors that could occur within tagsmith
pub struct TagsmithError {
	pub(crate) kind: ErrorKind,
}

impl TagsmithError {
	/// Create a `TagsmithError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::{ErrorKind, TagsmithError};
	///
	/// let no_audio = TagsmithError::new(ErrorKind::InvalidAudioFrame);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::{ErrorKind, TagsmithError};
	///
	/// let no_audio = TagsmithError::new(ErrorKind::InvalidAudioFrame);
	/// if let ErrorKind::InvalidAudioFrame = no_audio.kind() {
	/// 	println!("Treating the stream as headerless");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether this error describes malformed tag or frame data
	///
	/// This covers bad headers, bad frames, bad synchsafe integers, and unsupported version bytes.
	/// I/O failures and write precondition failures are not format errors.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::{Id3v2Error, Id3v2ErrorKind, TagsmithError};
	///
	/// let err: TagsmithError = Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(5, 0)).into();
	/// assert!(err.is_format_error());
	/// ```
	pub fn is_format_error(&self) -> bool {
		matches!(
			self.kind,
			ErrorKind::Id3v2(_)
				| ErrorKind::FileDecoding(_)
				| ErrorKind::SizeMismatch
				| ErrorKind::TextDecode(_)
				| ErrorKind::StringFromUtf8(_)
				| ErrorKind::StrFromUtf8(_)
		)
	}
}

impl std::error::Error for TagsmithError {}

impl Debug for TagsmithError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<Id3v2Error> for TagsmithError {
	fn from(input: Id3v2Error) -> Self {
		Self {
			kind: ErrorKind::Id3v2(input),
		}
	}
}

impl From<FileDecodingError> for TagsmithError {
	fn from(input: FileDecodingError) -> Self {
		Self {
			kind: ErrorKind::FileDecoding(input),
		}
	}
}

impl From<FileEncodingError> for TagsmithError {
	fn from(input: FileEncodingError) -> Self {
		Self {
			kind: ErrorKind::FileEncoding(input),
		}
	}
}

impl From<TextEncodingError> for TagsmithError {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<std::io::Error> for TagsmithError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for TagsmithError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::str::Utf8Error> for TagsmithError {
	fn from(input: std::str::Utf8Error) -> Self {
		Self {
			kind: ErrorKind::StrFromUtf8(input),
		}
	}
}

impl From<std::collections::TryReserveError> for TagsmithError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for TagsmithError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for TagsmithError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::StrFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),
			ErrorKind::Id3v2(ref id3v2_err) => write!(f, "{id3v2_err}"),

			// Files
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
			ErrorKind::InvalidAudioFrame => {
				write!(f, "MPEG: No valid audio frame could be found")
			},
			ErrorKind::FileDecoding(ref file_decode_err) => write!(f, "{file_decode_err}"),
			ErrorKind::FileEncoding(ref file_encode_err) => write!(f, "{file_encode_err}"),
			ErrorKind::FileNotFound => write!(f, "Saving: The file does not exist"),
			ErrorKind::ReadOnlyFile => write!(f, "Saving: The file is read only"),
			ErrorKind::FileTooSmall { size, minimum } => write!(
				f,
				"Saving: The file is too small ({size} bytes, expected more than {minimum})"
			),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}
