use tagsmith::config::WriteOptions;
use tagsmith::id3::v1::Id3v1Tag;
use tagsmith::id3::v2::Id3v2Tag;

use std::io::Write as _;

use tempfile::NamedTempFile;

/// The length of every frame produced by [`audio`]
pub const FRAME_LEN: usize = 417;

/// Create `frames` MPEG-1 Layer 3 frames (128 kbps, 44.1 kHz, joint stereo)
///
/// The frame payloads never contain `0xFF`, so there are no stray frame syncs, and each frame's
/// payload is different so moved audio can be compared byte for byte.
pub fn audio(frames: usize) -> Vec<u8> {
	let mut audio = Vec::with_capacity(frames * FRAME_LEN);
	for i in 0..frames {
		audio.extend([0xFF, 0xFB, 0x90, 0x64]);
		audio.extend((4..FRAME_LEN).map(|j| ((i * 7 + j) % 251) as u8));
	}

	audio
}

/// Serialize `tag` with `padding` bytes of padding
pub fn tag_bytes(tag: &Id3v2Tag, padding: u32) -> Vec<u8> {
	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::new().preferred_padding(padding))
		.unwrap();
	bytes
}

/// Serialize an ID3v1 tag
pub fn id3v1_bytes(tag: &Id3v1Tag) -> Vec<u8> {
	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::new()).unwrap();
	bytes
}

/// Create a new temporary file holding `content`
pub fn temp_file(content: &[u8]) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(content).unwrap();
	file.flush().unwrap();

	file
}
