//! ID3 specific items
//!
//! ID3v2 tags sit at the start of a file, ahead of the audio. ID3v1 tags are a fixed 128 byte
//! trailer at the very end. The two are read and written independently of each other.
//! Check the other modules for important notes and/or warnings.

pub mod v1;
pub mod v2;

use crate::config::ParsingMode;
use crate::error::Result;
use crate::util::io::SeekStreamLen;
use v1::constants::ID3V1_TAG_MARKER;

use std::io::{Read, Seek, SeekFrom};

/// The offset of an ID3v1 tag, if the last 128 bytes of `data` hold one
pub(crate) fn find_id3v1_offset<R>(data: &mut R) -> Result<Option<u64>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v1 tag");

	let len = data.stream_len_hack()?;

	// Reader is too small to contain an ID3v1 tag
	let Some(offset) = len.checked_sub(128) else {
		return Ok(None);
	};

	data.seek(SeekFrom::Start(offset))?;

	let mut id3v1_header = [0; 3];
	data.read_exact(&mut id3v1_header)?;

	if id3v1_header != ID3V1_TAG_MARKER {
		return Ok(None);
	}

	Ok(Some(offset))
}

/// Read the ID3v1 tag from the end of `data`
///
/// A missing tag is not an error.
pub(crate) fn find_id3v1<R>(data: &mut R, parse_mode: ParsingMode) -> Result<Option<v1::Id3v1Tag>>
where
	R: Read + Seek,
{
	let Some(offset) = find_id3v1_offset(data)? else {
		return Ok(None);
	};

	log::debug!("Found an ID3v1 tag at offset {offset}, parsing");

	let mut id3v1_tag = [0; 128];
	data.seek(SeekFrom::Start(offset))?;
	data.read_exact(&mut id3v1_tag)?;

	Ok(Some(v1::Id3v1Tag::parse(id3v1_tag, parse_mode)?))
}
