//! MP3 file handling
//!
//! An [`Mp3File`] holds everything tagsmith knows about a file: its ID3v2 tag, its ID3v1 tag, and
//! where the audio starts. Once read, the tags are plain values with no tie to the file, the file
//! is only touched again when saving.

mod mp3_file;

pub use mp3_file::Mp3File;

use crate::config::{ParseOptions, ParsingMode};
use crate::error::{ErrorKind, Result};
use crate::id3::find_id3v1_offset;
use crate::id3::v2::Id3v2Header;
use crate::mpeg::resolve::resolve_audio_start;
use crate::util::io::FileOperator;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The different regions of a file
///
/// This is used to describe where an error occurred.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileRegion {
	/// The ID3v1 trailer
	Id3v1,
	/// The ID3v2 tag, including its header
	Id3v2,
	/// The MPEG audio stream
	Audio,
}

/// Copy the raw bytes of a file's ID3v2 tag
///
/// The bytes run from the start of the file up to the start of the audio, as found by the same
/// search used when opening an [`Mp3File`]. This means that any padding, or junk between a
/// mis-sized tag and the audio, is included.
///
/// Returns `None` if the file does not start with an ID3v2 tag.
///
/// # Errors
///
/// * `path` does not exist, or can't be read
/// * The ID3v2 header is invalid
/// * No audio frame can be found ([`ErrorKind::InvalidAudioFrame`]), and
///   [`ParsingMode::Strict`] is in use. Otherwise, the declared tag size is trusted.
///
/// # Examples
///
/// ```rust,no_run
/// use tagsmith::config::ParseOptions;
/// use tagsmith::file::extract_raw_tag_bytes;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// if let Some(bytes) = extract_raw_tag_bytes("test.mp3", ParseOptions::new())? {
/// 	assert_eq!(&bytes[..3], b"ID3");
/// }
/// # Ok(()) }
/// ```
pub fn extract_raw_tag_bytes<P>(path: P, parse_options: ParseOptions) -> Result<Option<Vec<u8>>>
where
	P: AsRef<Path>,
{
	let mut reader = FileOperator::new(BufReader::new(File::open(path)?))?;

	let Some(header) = Id3v2Header::parse(reader.get_mut())? else {
		log::debug!("No ID3v2 tag found, nothing to extract");
		return Ok(None);
	};

	let audio_end = find_id3v1_offset(reader.get_mut())?.unwrap_or(reader.len());

	let expected_start = u64::from(header.full_tag_size());
	let tag_end = match resolve_audio_start(&mut reader, expected_start, audio_end) {
		Ok(audio_header) => audio_header.mp3_start_byte(),
		Err(e)
			if matches!(e.kind(), ErrorKind::InvalidAudioFrame)
				&& parse_options.parsing_mode != ParsingMode::Strict =>
		{
			log::warn!("No audio found, using the declared tag size");
			std::cmp::min(expected_start, reader.len())
		},
		Err(e) => return Err(e),
	};

	reader.read_at(0, tag_end).map(Some)
}
