mod frame;

use super::Id3v2TagFlags;
use crate::config::WriteOptions;
use crate::error::{Result, TagsmithError};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::{Id3v2Tag, Id3v2Version};
use crate::macros::try_vec;
use crate::util::io::{FileLike, Length, Truncate, shift_left, shift_right};

use std::cmp::Ordering;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::ops::Not;
use std::sync::OnceLock;

use byteorder::{BigEndian, WriteBytesExt};

// In the very rare chance someone wants to write a CRC in their extended header
fn crc_32_table() -> &'static [u32; 256] {
	static INSTANCE: OnceLock<[u32; 256]> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		let mut crc32_table = [0; 256];

		for n in 0..256 {
			crc32_table[n as usize] = (0..8).fold(n as u32, |acc, _| match acc & 1 {
				1 => 0xEDB8_8320 ^ (acc >> 1),
				_ => acc >> 1,
			});
		}

		crc32_table
	})
}

/// Replace everything in front of `audio_start` with `tag`, returning the new audio start
///
/// The tag is serialized in full before the file is touched. The audio is then moved to sit
/// directly after it: towards the end of the file (copying backwards) when the tag grows, towards
/// the start (copying forwards, then truncating) when it shrinks. `None` or an empty tag strips the
/// region entirely.
///
/// An I/O error while moving the audio leaves the file in an undefined state.
pub(crate) fn write_id3v2<F>(
	file: &mut F,
	tag: Option<&Id3v2Tag>,
	audio_start: u64,
	write_options: WriteOptions,
) -> Result<u64>
where
	F: FileLike,
	TagsmithError: From<<F as Truncate>::Error>,
	TagsmithError: From<<F as Length>::Error>,
{
	let id3v2 = match tag {
		Some(tag) => create_tag(tag, write_options)?,
		None => Vec::new(),
	};

	let new_audio_start = id3v2.len() as u64;
	match new_audio_start.cmp(&audio_start) {
		Ordering::Equal => {
			log::debug!("ID3v2: Tag size unchanged, overwriting in place");
		},
		Ordering::Greater => {
			let delta = new_audio_start - audio_start;
			log::debug!("ID3v2: Tag grew by {delta} bytes, moving audio");
			shift_right(file, audio_start, delta)?;
		},
		Ordering::Less => {
			let delta = audio_start - new_audio_start;
			log::debug!("ID3v2: Tag shrank by {delta} bytes, moving audio");
			shift_left(file, audio_start, delta)?;
		},
	}

	file.rewind()?;
	file.write_all(&id3v2)?;

	Ok(new_audio_start)
}

/// Serialize a complete tag, including the header, padding, and footer
///
/// An empty tag serializes to nothing, which strips the tag when saved.
pub(crate) fn create_tag(tag: &Id3v2Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	// We are stripping the tag
	if tag.is_empty() {
		return Ok(Vec::new());
	}

	let version = tag.version();
	log::debug!("ID3v2: Creating {version} tag with {} frames", tag.len());

	// The footer and CRC only exist in ID3v2.4
	let flags = *tag.flags();
	let has_footer = flags.footer && version == Id3v2Version::V4;
	let needs_crc = flags.crc && version == Id3v2Version::V4;

	let (mut id3v2, extended_header_len) = create_tag_header(flags, version)?;
	let header_len = id3v2.get_ref().len();

	// Write the items
	frame::create_items(&mut id3v2, tag, write_options)?;

	let mut len = id3v2.get_ref().len() - header_len;

	// https://mutagen-specs.readthedocs.io/en/latest/id3/id3v2.4.0-structure.html#padding:
	//
	// "[A tag] MUST NOT have any padding when a tag footer is added to the tag"
	let padding_len = write_options.preferred_padding.unwrap_or(0) as usize;
	if !has_footer {
		len += padding_len;
	}

	// Go back to the start and write the final size
	id3v2.seek(SeekFrom::Start(6))?;
	id3v2.write_u32::<BigEndian>((extended_header_len + len as u32).synch()?)?;

	if needs_crc {
		// The CRC is calculated on all the data between the header and footer, past the CRC
		let content_start_idx = 22;

		// Skip 16 bytes
		//
		// Normal ID3v2 header (10)
		// Extended header (6)
		id3v2.seek(SeekFrom::Start(16))?;

		let tag_contents = &id3v2.get_ref()[content_start_idx..];
		let mut encoded_crc = calculate_crc(tag_contents).to_vec();

		// The padding is part of the CRC as well
		if !has_footer && padding_len > 0 {
			encoded_crc = calculate_crc_with_padding(tag_contents, padding_len).to_vec();
		}

		id3v2.write_u8(5)?;
		id3v2.write_all(&encoded_crc)?;
	}

	if has_footer {
		log::trace!("ID3v2: Footer requested, not padding tag");

		id3v2.seek(SeekFrom::Start(3))?;

		let mut header_without_identifier = [0; 7];
		id3v2.read_exact(&mut header_without_identifier)?;
		id3v2.seek(SeekFrom::End(0))?;

		// The footer is the same as the header, but with the identifier reversed
		id3v2.write_all(b"3DI")?;
		id3v2.write_all(&header_without_identifier)?;

		return Ok(id3v2.into_inner());
	}

	if padding_len == 0 {
		log::trace!("ID3v2: No padding requested, writing tag as-is");
		return Ok(id3v2.into_inner());
	}

	log::trace!("ID3v2: Padding tag with {} bytes", padding_len);

	id3v2.seek(SeekFrom::End(0))?;
	id3v2.write_all(&try_vec![0; padding_len])?;

	Ok(id3v2.into_inner())
}

fn create_tag_header(
	flags: Id3v2TagFlags,
	version: Id3v2Version,
) -> Result<(Cursor<Vec<u8>>, u32)> {
	let mut header = Cursor::new(Vec::new());

	header.write_all(b"ID3")?;

	// Major version, revision 0
	header.write_all(&[version.major(), 0])?;

	let extended_header = flags.crc && version == Id3v2Version::V4;

	header.write_u8(flags.as_byte(version))?;
	header.write_u32::<BigEndian>(0)?;

	let mut extended_header_size = 0;
	if extended_header {
		// Structure of extended header:
		//
		// Size (4)
		// Number of flag bytes (1) (As of ID3v2.4, this will *always* be 1)
		// Flags (1)
		// Followed by any extra data (crc)

		// Start with a zeroed header
		header.write_all(&[0; 6])?;

		extended_header_size = 6_u32;
		let mut ext_flags = 0_u8;

		if flags.crc {
			ext_flags |= 0x20;
			extended_header_size += 6;

			header.write_all(&[0; 6])?;
		}

		header.seek(SeekFrom::Start(10))?;

		// Seek back and write the actual values
		header.write_u32::<BigEndian>(extended_header_size.synch()?)?;
		header.write_u8(1)?;
		header.write_u8(ext_flags)?;

		header.seek(SeekFrom::End(0))?;
	}

	Ok((header, extended_header_size))
}

fn crc_32(content: impl Iterator<Item = u8>) -> u32 {
	content
		.fold(!0, |crc, octet| {
			(crc >> 8) ^ crc_32_table()[(((crc & 0xFF) ^ u32::from(octet)) & 0xFF) as usize]
		})
		.not()
}

// https://github.com/rstemmer/id3edit/blob/0246f3dc1a7a80a64461eeeb7b9ee88379003eb1/encoding/crc.c#L6:6
fn calculate_crc(content: &[u8]) -> [u8; 5] {
	encode_crc(crc_32(content.iter().copied()))
}

fn calculate_crc_with_padding(content: &[u8], padding_len: usize) -> [u8; 5] {
	encode_crc(crc_32(
		content
			.iter()
			.copied()
			.chain(std::iter::repeat_n(0, padding_len)),
	))
}

// The CRC-32 is stored as an 35 bit synchsafe integer, leaving the upper
// four bits always zeroed.
fn encode_crc(crc: u32) -> [u8; 5] {
	let mut encoded_crc = [0; 5];
	let mut b;

	#[allow(clippy::needless_range_loop)]
	for i in 0..5 {
		b = (u64::from(crc) >> ((4 - i) * 7)) as u8;
		b &= 0x7F;
		encoded_crc[i] = b;
	}

	encoded_crc
}

#[cfg(test)]
mod tests {
	use super::{create_tag, write_id3v2};
	use crate::config::WriteOptions;
	use crate::id3::v2::{Id3v2Tag, Id3v2TagFlags, Id3v2Version};

	use std::io::Cursor;

	#[test_log::test]
	fn id3v2_write_crc32() {
		let mut tag = Id3v2Tag::default();
		tag.set_artist(String::from("Foo artist"));

		let flags = Id3v2TagFlags {
			crc: true,
			..Id3v2TagFlags::default()
		};
		tag.set_flags(flags);

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default().preferred_padding(0))
			.unwrap();

		let crc_content = &writer[16..22];
		assert_eq!(crc_content, &[5, 0x0F, 0x7A, 0x60, 0x31, 0x15]);

		// Get rid of the size byte
		let crc_content = &crc_content[1..];
		let mut unsynch_crc = 0;

		#[allow(clippy::needless_range_loop)]
		for i in 0..5 {
			let mut b = crc_content[i];
			b &= 0x7F;
			unsynch_crc |= u32::from(b) << ((4 - i) * 7);
		}

		assert_eq!(unsynch_crc, 0xFF58_1895);
	}

	#[test_log::test]
	fn padding() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.set_title(String::from("Foo"));

		let bytes = create_tag(&tag, WriteOptions::new().preferred_padding(100)).unwrap();
		// Header + TIT2 (10 + 4) + padding
		assert_eq!(bytes.len(), 10 + 14 + 100);
		assert_eq!(&bytes[..10], b"ID3\x03\x00\x00\x00\x00\x00\x72");
		assert!(bytes[24..].iter().all(|b| *b == 0));
	}

	#[test_log::test]
	fn footer() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.set_title(String::from("Foo"));
		tag.set_flags(Id3v2TagFlags {
			footer: true,
			..Id3v2TagFlags::default()
		});

		let bytes = create_tag(&tag, WriteOptions::default()).unwrap();

		// No padding with a footer
		assert_eq!(bytes.len(), 10 + 14 + 10);
		assert_eq!(&bytes[..3], b"ID3");
		assert_eq!(&bytes[bytes.len() - 10..bytes.len() - 7], b"3DI");
		assert_eq!(bytes[3..10], bytes[bytes.len() - 7..]);
	}

	#[test_log::test]
	fn empty_tag_is_stripped() {
		let tag = Id3v2Tag::default();
		assert!(create_tag(&tag, WriteOptions::default()).unwrap().is_empty());
	}

	#[test_log::test]
	fn audio_is_moved() {
		let audio = (0..5000_u32).map(|i| (i % 251) as u8).collect::<Vec<_>>();

		let mut file = vec![0; 200];
		file.extend(&audio);
		let mut file = Cursor::new(file);

		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.set_title(String::from("Foo title"));
		let write_options = WriteOptions::new().preferred_padding(500);

		// Grow
		let audio_start = write_id3v2(&mut file, Some(&tag), 200, write_options).unwrap();
		assert_eq!(audio_start, 10 + 20 + 500);
		assert_eq!(&file.get_ref()[..3], b"ID3");
		assert_eq!(&file.get_ref()[audio_start as usize..], &audio[..]);

		// Shrink
		let write_options = WriteOptions::new().preferred_padding(0);
		let audio_start = write_id3v2(&mut file, Some(&tag), audio_start, write_options).unwrap();
		assert_eq!(audio_start, 30);
		assert_eq!(file.get_ref().len(), 30 + audio.len());
		assert_eq!(&file.get_ref()[30..], &audio[..]);

		// Same size
		tag.set_title(String::from("Bar title"));
		let audio_start = write_id3v2(&mut file, Some(&tag), audio_start, write_options).unwrap();
		assert_eq!(audio_start, 30);
		assert_eq!(&file.get_ref()[30..], &audio[..]);

		// Strip
		let audio_start = write_id3v2(&mut file, None, audio_start, write_options).unwrap();
		assert_eq!(audio_start, 0);
		assert_eq!(file.get_ref(), &audio);
	}
}
