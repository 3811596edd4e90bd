use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::id3v2_err;
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::hash::{Hash, Hasher};
use std::io::Read;

use byteorder::ReadBytesExt;

/// The language given to newly created comment and lyrics frames
pub const DEFAULT_LANGUAGE: [u8; 3] = *b"eng";

// Generic struct for a text frame that has a language
//
// This exists to deduplicate some code between `CommentFrame` and `UnsynchronizedTextFrame`
struct LanguageFrame {
	header: FrameHeader,
	encoding: TextEncoding,
	language: [u8; 3],
	description: String,
	content: String,
}

impl LanguageFrame {
	fn parse<R>(
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

		let mut language = [0; 3];
		reader.read_exact(&mut language)?;

		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?;

		let mut content_options = TextDecodeOptions::new().encoding(encoding);
		if encoding == TextEncoding::UTF16 && description.bom != [0, 0] {
			content_options = content_options.bom(description.bom);
		}

		let content = decode_text(reader, content_options)?.content;

		Ok(Some(Self {
			header: FrameHeader::new(id, frame_flags),
			encoding,
			language,
			description: description.content,
			content,
		}))
	}

	fn create_bytes(
		encoding: TextEncoding,
		language: [u8; 3],
		description: &str,
		content: &str,
		version: Id3v2Version,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		let encoding = encoding.for_write(version, write_options.android_compatible);
		let mut bytes = vec![encoding as u8];

		if language.iter().any(|c| !c.is_ascii_alphabetic()) {
			id3v2_err!(InvalidLanguage(language));
		}

		bytes.extend(language);
		bytes.extend(encoding.encode(description, true, write_options.lossy_text_encoding)?);
		bytes.extend(encoding.encode(content, false, write_options.lossy_text_encoding)?);

		Ok(bytes)
	}
}

macro_rules! impl_language_frame {
	($($(#[$meta:meta])* $name:ident => ($v22:literal, $v23:literal)),+ $(,)?) => {
		$(
			$(#[$meta])*
			#[derive(Clone, Debug, Eq)]
			pub struct $name {
				pub(crate) header: FrameHeader,
				/// The encoding of the description and content text
				pub encoding: TextEncoding,
				/// ISO-639-2 language code (3 bytes)
				pub language: [u8; 3],
				/// Unique content description
				pub description: String,
				/// The actual frame content
				pub content: String,
			}

			impl PartialEq for $name {
				fn eq(&self, other: &Self) -> bool {
					self.language == other.language && self.description == other.description
				}
			}

			impl Hash for $name {
				fn hash<H: Hasher>(&self, state: &mut H) {
					self.language.hash(state);
					self.description.hash(state);
				}
			}

			impl From<LanguageFrame> for $name {
				fn from(value: LanguageFrame) -> Self {
					Self {
						header: value.header,
						encoding: value.encoding,
						language: value.language,
						description: value.description,
						content: value.content,
					}
				}
			}

			impl $name {
				#[doc = concat!("Create a new [`", stringify!($name), "`] for a tag of `version`")]
				pub fn new(
					version: Id3v2Version,
					encoding: TextEncoding,
					language: [u8; 3],
					description: impl Into<String>,
					content: impl Into<String>,
				) -> Self {
					Self {
						header: FrameHeader::new(
							FrameId::versioned(version, $v22, $v23),
							FrameFlags::default(),
						),
						encoding,
						language,
						description: description.into(),
						content: content.into(),
					}
				}

				#[doc = concat!("Read a [`", stringify!($name), "`] from a slice")]
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
					Ok(LanguageFrame::parse(reader, id, frame_flags, version)?.map(Into::into))
				}

				#[doc = concat!("Convert a [`", stringify!($name), "`] to a byte vec")]
				///
				/// NOTE: This does not include a frame header
				///
				/// # Errors
				///
				/// * `language` contains invalid characters (Only `'a'..='z'` and `'A'..='Z'` allowed)
				/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
				pub fn as_bytes(
					&self,
					version: Id3v2Version,
					write_options: WriteOptions,
				) -> Result<Vec<u8>> {
					LanguageFrame::create_bytes(
						self.encoding,
						self.language,
						&self.description,
						&self.content,
						version,
						write_options,
					)
				}
			}
		)+
	};
}

impl_language_frame! {
	/// An `ID3v2` comment frame
	///
	/// Similar to `TXXX` and `WXXX` frames, comments are told apart by their descriptions.
	CommentFrame => ("COM", "COMM"),
	/// An `ID3v2` unsynchronized lyrics/text frame
	///
	/// Similar to `TXXX` and `WXXX` frames, USLT frames are told apart by their descriptions.
	UnsynchronizedTextFrame => ("ULT", "USLT"),
}
