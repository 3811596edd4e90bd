//! Locating the start of the audio when the tag size cannot be trusted

use super::AudioHeader;
use super::read::read_audio_header;
use crate::error::{ErrorKind, Result, TagsmithError};
use crate::util::io::FileOperator;

use std::io::{Read, Seek};

/// Find where the audio really begins, given where the ID3v2 tag says it begins
///
/// Other tools often write tags with a wrong size. When the first frame after `expected_start`
/// is not at `expected_start`, the file is searched again from the start and the two candidates
/// are weighed against each other:
///
/// 1. Both searches agree: the first frame after the tag is kept.
/// 2. Both candidates report the same frame count: the earlier candidate is the real start.
/// 3. Only zeroes sit between `expected_start` and the first frame after it: the gap is padding,
///    the first frame after the tag is kept.
/// 4. The frame following the earlier candidate is read. If it is the first frame after the tag,
///    that frame is kept. If it reports the same frame count as the earlier candidate, the earlier
///    candidate is kept. Otherwise the first frame after the tag is kept.
///
/// This is a heuristic. Ties go to the candidate least likely to have tag bytes written over audio.
///
/// # Errors
///
/// * No audio frame can be found after `expected_start` ([`ErrorKind::InvalidAudioFrame`])
/// * The reader fails
pub(crate) fn resolve_audio_start<R>(
	reader: &mut FileOperator<R>,
	expected_start: u64,
	audio_end: u64,
) -> Result<AudioHeader>
where
	R: Read + Seek,
{
	let Some(first_after_tag) = read_audio_header(reader.get_mut(), expected_start, audio_end)?
	else {
		return Err(TagsmithError::new(ErrorKind::InvalidAudioFrame));
	};

	if first_after_tag.mp3_start_byte == expected_start {
		return Ok(first_after_tag);
	}

	log::warn!(
		"MPEG: Tag size suggests the audio starts at {expected_start:#X}, but the first frame \
		 after it is at {:#X}",
		first_after_tag.mp3_start_byte
	);

	// Anything found after the tag would also be found from the start, so this cannot be `None`
	let Some(header_one) = read_audio_header(reader.get_mut(), 0, audio_end)? else {
		return Ok(first_after_tag);
	};

	if header_one.mp3_start_byte == first_after_tag.mp3_start_byte {
		log::debug!(
			"MPEG: Audio start confirmed at {:#X}",
			first_after_tag.mp3_start_byte
		);
		return Ok(first_after_tag);
	}

	log::debug!(
		"MPEG: Possible audio start at {:#X}",
		header_one.mp3_start_byte
	);

	if header_one.number_of_frames == first_after_tag.number_of_frames {
		log::warn!(
			"MPEG: Audio start recalculated as {:#X}, frame counts agree",
			header_one.mp3_start_byte
		);
		return Ok(header_one);
	}

	if reader.is_range_null(expected_start, first_after_tag.mp3_start_byte)? {
		log::debug!("MPEG: Only padding precedes the first frame after the tag");
		return Ok(first_after_tag);
	}

	let header_two_start = header_one.mp3_start_byte + u64::from(header_one.frame_length());
	let header_two = read_audio_header(reader.get_mut(), header_two_start, audio_end)?;

	match header_two {
		Some(header_two) if header_two.mp3_start_byte == first_after_tag.mp3_start_byte => {
			log::warn!(
				"MPEG: Audio start confirmed at {:#X}, the earlier frame was a false match",
				first_after_tag.mp3_start_byte
			);
			Ok(first_after_tag)
		},
		Some(header_two) if header_two.number_of_frames == header_one.number_of_frames => {
			log::warn!(
				"MPEG: Audio start recalculated as {:#X}, the following frame agrees",
				header_one.mp3_start_byte
			);
			Ok(header_one)
		},
		_ => {
			log::warn!(
				"MPEG: Unable to confirm an earlier audio start, keeping {:#X}",
				first_after_tag.mp3_start_byte
			);
			Ok(first_after_tag)
		},
	}
}

#[cfg(test)]
mod tests {
	use super::resolve_audio_start;
	use crate::error::ErrorKind;
	use crate::util::io::FileOperator;

	use std::io::Cursor;

	// MPEG-1 Layer 3, 44.1 kHz, joint stereo
	const FRAME_128K: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64]; // 417 bytes
	const FRAME_32K: [u8; 4] = [0xFF, 0xFB, 0x10, 0x64]; // 104 bytes

	// An ID3v2.3 header declaring `size` bytes of content
	fn tag_header(size: u32) -> Vec<u8> {
		assert!(size < 0x4000);
		vec![
			b'I',
			b'D',
			b'3',
			3,
			0,
			0,
			0,
			0,
			(size >> 7) as u8,
			(size & 0x7F) as u8,
		]
	}

	fn put(file: &mut Vec<u8>, offset: usize, bytes: &[u8]) {
		if file.len() < offset + bytes.len() {
			file.resize(offset + bytes.len(), 0);
		}
		file[offset..offset + bytes.len()].copy_from_slice(bytes);
	}

	// An "Info" header declaring `frames`, placed in the frame at `frame_start`
	fn put_info(file: &mut Vec<u8>, frame_start: usize, frames: u32) {
		let mut info = b"Info".to_vec();
		info.extend([0, 0, 0, 3]);
		info.extend(frames.to_be_bytes());
		info.extend(10_000_u32.to_be_bytes());
		put(file, frame_start + 36, &info);
	}

	fn resolve(file: Vec<u8>, expected_start: u64) -> crate::error::Result<u64> {
		let len = file.len() as u64;
		let mut reader = FileOperator::new(Cursor::new(file))?;
		resolve_audio_start(&mut reader, expected_start, len).map(|h| h.mp3_start_byte())
	}

	#[test_log::test]
	fn correct_tag_size() {
		let mut file = tag_header(1024);
		for i in 0..3 {
			put(&mut file, 1034 + i * 417, &FRAME_128K);
		}
		file.resize(1034 + 3 * 417, 0);

		assert_eq!(resolve(file, 1034).unwrap(), 1034);
	}

	#[test_log::test]
	fn tag_size_short_by_padding() {
		let mut file = tag_header(100);
		put(&mut file, 114, &FRAME_128K);
		put(&mut file, 531, &FRAME_128K);
		file.resize(948, 0);

		// Both searches find the frame at 114
		assert_eq!(resolve(file, 110).unwrap(), 114);
	}

	#[test_log::test]
	fn earlier_frame_with_same_frame_count() {
		let mut file = tag_header(100);
		put(&mut file, 100, &FRAME_128K);
		put(&mut file, 517, &FRAME_32K);
		file.resize(621, 0);

		// 521 / 417 == 104 / 104
		assert_eq!(resolve(file, 110).unwrap(), 100);
	}

	#[test_log::test]
	fn null_gap_keeps_frame_after_tag() {
		let mut file = tag_header(100);
		// A false match inside the tag, confirmed by bytes inside the real first frame
		put(&mut file, 20, &FRAME_32K);
		put(&mut file, 114, &FRAME_32K);
		put(&mut file, 124, &FRAME_32K);
		put(&mut file, 218, &FRAME_32K);
		file.resize(332, 0);

		assert_eq!(resolve(file, 110).unwrap(), 114);
	}

	#[test_log::test]
	fn second_frame_confirms_frame_after_tag() {
		let mut file = tag_header(100);
		put(&mut file, 30, &FRAME_32K);
		put(&mut file, 120, &[0x01]);
		put(&mut file, 134, &FRAME_32K);
		put(&mut file, 238, &FRAME_32K);
		file.resize(342, 0);

		assert_eq!(resolve(file, 110).unwrap(), 134);
	}

	#[test_log::test]
	fn second_frame_confirms_earlier_frame() {
		let mut file = tag_header(490);
		put(&mut file, 30, &FRAME_128K);
		put_info(&mut file, 30, 5);
		put(&mut file, 447, &FRAME_128K);
		put_info(&mut file, 447, 5);
		put(&mut file, 600, &[0x01]);
		put(&mut file, 864, &FRAME_128K);
		file.resize(1281, 0);

		assert_eq!(resolve(file, 500).unwrap(), 30);
	}

	#[test_log::test]
	fn disagreement_keeps_frame_after_tag() {
		let mut file = tag_header(490);
		put(&mut file, 30, &FRAME_128K);
		put_info(&mut file, 30, 5);
		put(&mut file, 447, &FRAME_128K);
		put_info(&mut file, 447, 6);
		put(&mut file, 600, &[0x01]);
		put(&mut file, 864, &FRAME_128K);
		file.resize(1281, 0);

		assert_eq!(resolve(file, 500).unwrap(), 864);
	}

	#[test_log::test]
	fn no_audio() {
		let mut file = tag_header(100);
		file.resize(500, 0);

		let err = resolve(file, 110).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::InvalidAudioFrame));
	}
}
