use crate::config::ParsingMode;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::{id3v2_err, parse_mode_choice};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::hash::{Hash, Hasher};
use std::io::Read;

// Longest identifier a reader has to accept
const MAX_IDENTIFIER_LEN: usize = 64;

/// A unique file identifier frame (`UFID`, `UFI` in ID3v2.2)
///
/// Links the file to an entry in some database, named by `owner`. MusicBrainz for example stores
/// its recording IDs under the owner `http://musicbrainz.org`.
///
/// A tag holds at most one identifier per owner, so frames with the same owner compare equal.
#[derive(Clone, Debug, Eq)]
pub struct UniqueFileIdentifierFrame {
	pub(crate) header: FrameHeader,
	/// The database the identifier belongs to, never empty in a valid frame
	pub owner: String,
	/// The identifier itself, up to 64 bytes
	pub identifier: Vec<u8>,
}

impl PartialEq for UniqueFileIdentifierFrame {
	fn eq(&self, other: &Self) -> bool {
		self.owner == other.owner
	}
}

impl Hash for UniqueFileIdentifierFrame {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.owner.hash(state);
	}
}

impl UniqueFileIdentifierFrame {
	/// Create a new [`UniqueFileIdentifierFrame`], with the ID used by `version`
	pub fn new(version: Id3v2Version, owner: String, identifier: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(
				FrameId::versioned(version, "UFI", "UFID"),
				FrameFlags::default(),
			),
			owner,
			identifier,
		}
	}

	/// Read a `UFID` frame's content
	///
	/// # Errors
	///
	/// * The owner is empty, and `parse_mode` is [`ParsingMode::Strict`]
	/// * `reader` fails
	pub fn parse<R>(
		reader: &mut R,
		id: FrameId,
		frame_flags: FrameFlags,
		parse_mode: ParsingMode,
	) -> Result<Option<Self>>
	where
		R: Read,
	{
		let owner = decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?
		.content;

		if owner.is_empty() {
			parse_mode_choice!(
				parse_mode,
				STRICT: id3v2_err!(MissingUfidOwner),
				DEFAULT: log::warn!("ID3v2: UFID frame has no owner")
			);
		}

		let mut identifier = Vec::new();
		reader.read_to_end(&mut identifier)?;

		if identifier.len() > MAX_IDENTIFIER_LEN {
			log::warn!(
				"ID3v2: UFID identifier for \"{}\" is {} bytes long, expected at most {}",
				owner,
				identifier.len(),
				MAX_IDENTIFIER_LEN
			);
		}

		Ok(Some(Self {
			header: FrameHeader::new(id, frame_flags),
			owner,
			identifier,
		}))
	}

	/// Encode the owner and identifier
	pub fn as_bytes(&self) -> Vec<u8> {
		let mut content = TextEncoding::Latin1
			.encode(&self.owner, true, true)
			.unwrap_or_else(|_| vec![0]);
		content.extend_from_slice(&self.identifier);

		content
	}
}
