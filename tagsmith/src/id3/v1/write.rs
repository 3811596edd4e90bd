use super::constants::ID3V1_TAG_MARKER;
use super::tag::Id3v1Tag;
use crate::config::WriteOptions;
use crate::error::{Result, TagsmithError};
use crate::id3::find_id3v1_offset;
use crate::util::io::{FileLike, Length, Truncate};
use crate::util::text::latin1_encode;

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::WriteBytesExt;

/// Write, replace, or strip the ID3v1 trailer of `file`
///
/// `None` (or an empty tag) strips an existing trailer. The rest of the file is never touched.
pub(crate) fn write_id3v1<F>(
	file: &mut F,
	tag: Option<&Id3v1Tag>,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagsmithError: From<<F as Truncate>::Error>,
	TagsmithError: From<<F as Length>::Error>,
{
	let existing = find_id3v1_offset(file)?;
	let tag = tag.filter(|tag| !tag.is_empty());

	let Some(tag) = tag else {
		if let Some(offset) = existing {
			log::debug!("ID3v1: Stripping tag at offset {offset}");

			// An ID3v1 tag occupies the last 128 bytes of the file, so we can just
			// shrink it down.
			file.truncate(offset)?;
		}

		return Ok(());
	};

	let tag = encode(tag, write_options)?;

	match existing {
		Some(offset) => {
			log::debug!("ID3v1: Replacing tag at offset {offset}");
			file.seek(SeekFrom::Start(offset))?;
		},
		None => {
			log::debug!("ID3v1: Appending tag");
			file.seek(SeekFrom::End(0))?;
		},
	}

	file.write_all(&tag)?;
	Ok(())
}

pub(super) fn encode(tag: &Id3v1Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	fn resize_string(
		value: Option<&str>,
		size: usize,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		let mut cursor = Cursor::new(vec![0; size]);
		cursor.rewind()?;

		if let Some(val) = value {
			for b in latin1_encode(val, write_options.lossy_text_encoding).take(size) {
				cursor.write_u8(b?)?;
			}
		}

		Ok(cursor.into_inner())
	}

	let mut writer = Vec::with_capacity(128);

	writer.write_all(&ID3V1_TAG_MARKER)?;

	let title = resize_string(tag.title.as_deref(), 30, write_options)?;
	writer.write_all(&title)?;

	let artist = resize_string(tag.artist.as_deref(), 30, write_options)?;
	writer.write_all(&artist)?;

	let album = resize_string(tag.album.as_deref(), 30, write_options)?;
	writer.write_all(&album)?;

	let mut year = [0; 4];
	if let Some(year_num) = tag.year {
		let mut year_num = std::cmp::min(year_num, 9999);

		for digit in year.iter_mut().rev() {
			*digit = b'0' + (year_num % 10) as u8;
			year_num /= 10;
		}
	}

	writer.write_all(&year)?;

	let comment = resize_string(tag.comment.as_deref(), 28, write_options)?;
	writer.write_all(&comment)?;

	writer.write_u8(0)?;

	writer.write_u8(tag.track_number.unwrap_or(0))?;
	writer.write_u8(tag.genre.unwrap_or(255))?;

	Ok(writer)
}

#[cfg(test)]
mod tests {
	use super::write_id3v1;
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v1::Id3v1Tag;
	use crate::id3::find_id3v1;

	use std::io::Cursor;

	fn tag() -> Id3v1Tag {
		let mut tag = Id3v1Tag::new();
		tag.set_title(String::from("Foo title"));
		tag.year = Some(2004);
		tag
	}

	#[test_log::test]
	fn append_replace_strip() {
		let audio = vec![1_u8; 500];
		let mut file = Cursor::new(audio.clone());

		write_id3v1(&mut file, Some(&tag()), WriteOptions::default()).unwrap();
		assert_eq!(file.get_ref().len(), 628);
		assert_eq!(&file.get_ref()[500..503], b"TAG");

		let mut replacement = tag();
		replacement.set_title(String::from("Bar title"));
		write_id3v1(&mut file, Some(&replacement), WriteOptions::default()).unwrap();
		assert_eq!(file.get_ref().len(), 628);

		let read = find_id3v1(&mut file, ParsingMode::Strict).unwrap().unwrap();
		assert_eq!(read.title.as_deref(), Some("Bar title"));
		assert_eq!(read.year, Some(2004));

		write_id3v1(&mut file, None, WriteOptions::default()).unwrap();
		assert_eq!(file.get_ref(), &audio);

		// Nothing to strip
		write_id3v1(&mut file, Some(&Id3v1Tag::new()), WriteOptions::default()).unwrap();
		assert_eq!(file.get_ref(), &audio);
	}

	#[test_log::test]
	fn lossy_text() {
		let mut tag = tag();
		tag.set_artist(String::from("Fōō"));

		assert!(super::encode(&tag, WriteOptions::new().lossy_text_encoding(false)).is_err());

		let bytes = super::encode(&tag, WriteOptions::default()).unwrap();
		assert_eq!(&bytes[33..37], b"F??\0");
	}
}
