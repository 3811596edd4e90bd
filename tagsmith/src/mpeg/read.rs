use super::AudioHeader;
use super::header::{FrameHeader, HEADER_MASK, search_for_frame_sync};
use crate::error::Result;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

/// Find the first plausible audio frame at or after `start`
///
/// A frame sync only counts when its header decodes, and the header found right after the frame
/// (if it is still before `audio_end`) agrees on the version, layer, and sample rate. This skips
/// over stray sync bytes in tag data or junk.
///
/// Returns the header and its offset.
///
/// # Errors
///
/// * The reader fails
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use tagsmith::mpeg::find_audio_frame;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
/// frame.resize(417, 0);
///
/// let mut file = vec![0; 20];
/// file.extend(&frame);
/// file.extend(&frame);
///
/// let len = file.len() as u64;
/// let (header, offset) = find_audio_frame(&mut Cursor::new(file), 0, len)?.expect("frame should be found");
/// assert_eq!(offset, 20);
/// assert_eq!(header.bitrate(), 128);
/// # Ok(()) }
/// ```
pub fn find_audio_frame<R>(
	reader: &mut R,
	start: u64,
	audio_end: u64,
) -> Result<Option<(FrameHeader, u64)>>
where
	R: Read + Seek,
{
	let mut pos = start;

	while pos + 4 <= audio_end {
		reader.seek(SeekFrom::Start(pos))?;

		let mut search_window = reader.by_ref().take(audio_end - pos);
		let Some(relative_offset) = search_for_frame_sync(&mut search_window)? else {
			break;
		};

		let frame_start = pos + relative_offset;
		if frame_start + 4 > audio_end {
			break;
		}

		reader.seek(SeekFrom::Start(frame_start))?;
		let header_data = reader.read_u32::<BigEndian>()?;

		if let Some(header) = FrameHeader::read(header_data) {
			let next_frame_start = frame_start + u64::from(header.len);

			// The stream ends with this frame, nothing to compare against
			if next_frame_start + 4 > audio_end {
				return Ok(Some((header, frame_start)));
			}

			reader.seek(SeekFrom::Start(next_frame_start))?;
			let next_header_data = reader.read_u32::<BigEndian>()?;

			if header_data & HEADER_MASK == next_header_data & HEADER_MASK {
				return Ok(Some((header, frame_start)));
			}

			log::trace!("MPEG: Skipping frame sync at {frame_start}, the next frame does not match");
		}

		pos = frame_start + 1;
	}

	Ok(None)
}

/// Find the first audio frame at or after `start`, and describe the stream from there
pub(crate) fn read_audio_header<R>(
	reader: &mut R,
	start: u64,
	audio_end: u64,
) -> Result<Option<AudioHeader>>
where
	R: Read + Seek,
{
	let Some((first_frame, frame_start)) = find_audio_frame(reader, start, audio_end)? else {
		return Ok(None);
	};

	AudioHeader::read(reader, first_frame, frame_start, audio_end).map(Some)
}

#[cfg(test)]
mod tests {
	use super::{find_audio_frame, read_audio_header};

	use std::io::Cursor;

	const FRAME_128K: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

	fn frame(header: [u8; 4], len: usize) -> Vec<u8> {
		let mut frame = header.to_vec();
		frame.resize(len, 0);
		frame
	}

	#[test_log::test]
	fn stray_sync_is_skipped() {
		let mut file = vec![0; 10];
		// A valid header, but the "next frame" is garbage
		file.extend(frame(FRAME_128K, 40));
		file.extend(frame(FRAME_128K, 417));
		file.extend(frame(FRAME_128K, 417));
		let len = file.len() as u64;

		let mut reader = Cursor::new(file);
		let (_, offset) = find_audio_frame(&mut reader, 0, len).unwrap().unwrap();
		assert_eq!(offset, 50);

		// Searching past the first frame
		let (_, offset) = find_audio_frame(&mut reader, 51, len).unwrap().unwrap();
		assert_eq!(offset, 467);
	}

	#[test_log::test]
	fn no_frames() {
		let file = vec![0xFF; 3];
		assert!(
			find_audio_frame(&mut Cursor::new(file), 0, 3)
				.unwrap()
				.is_none()
		);

		let file = vec![0; 1000];
		assert!(
			find_audio_frame(&mut Cursor::new(file), 0, 1000)
				.unwrap()
				.is_none()
		);
	}

	#[test_log::test]
	fn frame_count() {
		let mut file = Vec::new();
		for _ in 0..5 {
			file.extend(frame(FRAME_128K, 417));
		}
		let len = file.len() as u64;

		let header = read_audio_header(&mut Cursor::new(file.clone()), 0, len)
			.unwrap()
			.unwrap();
		assert_eq!(header.mp3_start_byte(), 0);
		assert_eq!(header.number_of_frames(), 5);
		assert_eq!(header.bitrate(), 128);
		assert!(!header.is_vbr());

		// A Xing header takes precedence over the estimate
		file[36..40].copy_from_slice(b"Xing");
		file[43] = 3;
		file[44..48].copy_from_slice(&100_u32.to_be_bytes());
		file[48..52].copy_from_slice(&100_000_u32.to_be_bytes());

		let header = read_audio_header(&mut Cursor::new(file), 0, len)
			.unwrap()
			.unwrap();
		assert_eq!(header.number_of_frames(), 100);
		assert!(header.is_vbr());
		// 100 frames of 1152 samples at 44.1 kHz
		assert_eq!(header.duration().as_millis(), 2612);
		assert_eq!(header.bitrate(), 306);
	}
}
