use super::constants::{BITRATES, PADDING_SIZES, SAMPLE_RATES, SAMPLES, SIDE_INFORMATION_SIZES};
use crate::error::Result;
use crate::macros::decode_err;

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

pub(crate) fn verify_frame_sync(frame_sync: [u8; 2]) -> bool {
	frame_sync[0] == 0xFF && frame_sync[1] >> 5 == 0b111
}

// Searches for a frame sync (11 set bits) in the reader.
// The search starts at the beginning of the reader and returns the index relative to this beginning.
// This will return the first match, if one is found.
//
// Note that the search searches in 8 bit steps, i.e. the first 8 bits need to be byte aligned.
pub(crate) fn search_for_frame_sync<R>(input: &mut R) -> std::io::Result<Option<u64>>
where
	R: Read,
{
	let mut iterator = input.bytes();
	let mut buffer = [0u8; 2];
	// Read the first byte, as each iteration expects that buffer 0 was set from a previous iteration.
	// This is not the case in the first iteration, which is therefore a special case.
	if let Some(byte) = iterator.next() {
		buffer[0] = byte?;
	}
	// Create a stream of overlapping 2 byte pairs
	//
	// Example:
	// [0x01, 0x02, 0x03, 0x04] should be analyzed as
	// [0x01, 0x02], [0x02, 0x03], [0x03, 0x04]
	for (index, byte) in iterator.enumerate() {
		buffer[1] = byte?;
		// Check the two bytes in the buffer
		if verify_frame_sync(buffer) {
			return Ok(Some(index as u64));
		}
		// If they do not match, copy the last byte in the buffer to the front for the next iteration
		buffer[0] = buffer[1];
	}
	Ok(None)
}

// Used to compare the versions, layers, and sample rates of two frame headers.
// If they aren't equal, something is broken.
pub(super) const HEADER_MASK: u32 = 0xFFFE_0C00;

/// MPEG Audio version
#[derive(Default, PartialEq, Eq, Copy, Clone, Debug)]
#[allow(missing_docs)]
pub enum MpegVersion {
	#[default]
	V1,
	V2,
	V2_5,
}

/// MPEG layer
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Layer {
	Layer1 = 1,
	Layer2 = 2,
	#[default]
	Layer3 = 3,
}

/// Channel mode
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum ChannelMode {
	#[default]
	Stereo = 0,
	JointStereo = 1,
	/// Two independent mono channels
	DualChannel = 2,
	SingleChannel = 3,
}

/// A decoded MPEG audio frame header
///
/// The four header bytes hold everything needed to find the next frame. Nothing past the header is
/// decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
	pub(crate) version: MpegVersion,
	pub(crate) layer: Layer,
	pub(crate) bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) padding: bool,
	pub(crate) channel_mode: ChannelMode,
	pub(crate) len: u32,
	pub(crate) samples: u16,
	pub(crate) data_start: u32,
}

impl FrameHeader {
	/// Decode a frame header from its four bytes
	///
	/// Returns `None` if the bytes do not hold a usable header (missing sync, reserved version or
	/// layer, free or bad bitrate, or a reserved sample rate).
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::mpeg::{ChannelMode, FrameHeader, Layer, MpegVersion};
	///
	/// let header = FrameHeader::read(0xFFFB_9064).expect("header should be valid");
	///
	/// assert_eq!(header.version(), MpegVersion::V1);
	/// assert_eq!(header.layer(), Layer::Layer3);
	/// assert_eq!(header.bitrate(), 128);
	/// assert_eq!(header.sample_rate(), 44100);
	/// assert_eq!(header.channel_mode(), ChannelMode::JointStereo);
	/// assert_eq!(header.frame_length(), 417);
	///
	/// assert!(FrameHeader::read(0xFFFF_FFFF).is_none());
	/// ```
	pub fn read(data: u32) -> Option<Self> {
		if !verify_frame_sync([(data >> 24) as u8, (data >> 16) as u8]) {
			return None;
		}

		let version = match (data >> 19) & 0b11 {
			0b00 => MpegVersion::V2_5,
			0b10 => MpegVersion::V2,
			0b11 => MpegVersion::V1,
			_ => return None,
		};

		let version_index = if version == MpegVersion::V1 { 0 } else { 1 };

		let layer = match (data >> 17) & 0b11 {
			0b01 => Layer::Layer3,
			0b10 => Layer::Layer2,
			0b11 => Layer::Layer1,
			_ => {
				log::trace!("MPEG: Frame header uses a reserved layer");
				return None;
			},
		};

		let layer_index = (layer as usize).saturating_sub(1);

		let bitrate_index = (data >> 12) & 0xF;
		let bitrate = BITRATES[version_index][layer_index][bitrate_index as usize];
		if bitrate == 0 {
			return None;
		}

		let sample_rate_index = (data >> 10) & 0b11;
		let sample_rate = match sample_rate_index {
			// This is invalid
			0b11 => return None,
			_ => SAMPLE_RATES[version as usize][sample_rate_index as usize],
		};

		let padding = ((data >> 9) & 1) == 1;

		let channel_mode = match (data >> 6) & 0b11 {
			0b00 => ChannelMode::Stereo,
			0b01 => ChannelMode::JointStereo,
			0b10 => ChannelMode::DualChannel,
			_ => ChannelMode::SingleChannel,
		};

		let data_start = SIDE_INFORMATION_SIZES[version_index][channel_mode as usize] + 4;
		let samples = SAMPLES[layer_index][version_index];

		let mut len = u32::from(samples) * bitrate * 125 / sample_rate;
		if padding {
			len += u32::from(PADDING_SIZES[layer_index]);
		}

		Some(Self {
			version,
			layer,
			bitrate,
			sample_rate,
			padding,
			channel_mode,
			len,
			samples,
			data_start,
		})
	}

	/// MPEG version
	pub fn version(&self) -> MpegVersion {
		self.version
	}

	/// MPEG layer
	pub fn layer(&self) -> Layer {
		self.layer
	}

	/// Bitrate (kbps)
	pub fn bitrate(&self) -> u32 {
		self.bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Whether the frame carries a padding slot
	pub fn padding(&self) -> bool {
		self.padding
	}

	/// Channel mode
	pub fn channel_mode(&self) -> ChannelMode {
		self.channel_mode
	}

	/// The length of the whole frame in bytes, including the header
	pub fn frame_length(&self) -> u32 {
		self.len
	}

	/// The number of samples in each frame
	pub fn samples_per_frame(&self) -> u16 {
		self.samples
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum VbrHeaderType {
	Xing,
	Info,
	Vbri,
}

#[derive(Copy, Clone, Debug)]
pub(super) struct VbrHeader {
	pub ty: VbrHeaderType,
	pub frames: u32,
	pub size: u32,
}

impl VbrHeader {
	pub(super) fn read(reader: &mut &[u8]) -> Result<Option<Self>> {
		let reader_len = reader.len();
		if reader_len < 4 {
			return Ok(None);
		}

		let mut header = [0; 4];
		reader.read_exact(&mut header)?;

		match &header {
			b"Xing" | b"Info" => {
				if reader_len < 16 {
					decode_err!(@BAIL Audio, "Xing header has an invalid size (< 16)");
				}

				let mut flags = [0; 4];
				reader.read_exact(&mut flags)?;

				if flags[3] & 0x03 != 0x03 {
					log::debug!(
						"MPEG: Xing header doesn't have required flags set (0x0001 and 0x0002)"
					);
					return Ok(None);
				}

				let frames = reader.read_u32::<BigEndian>()?;
				let size = reader.read_u32::<BigEndian>()?;

				let ty = if &header == b"Xing" {
					VbrHeaderType::Xing
				} else {
					VbrHeaderType::Info
				};

				Ok(Some(Self { ty, frames, size }))
			},
			b"VBRI" => {
				if reader_len < 32 {
					decode_err!(@BAIL Audio, "VBRI header has an invalid size (< 32)");
				}

				// Skip 6 bytes
				// Version ID (2)
				// Delay float (2)
				// Quality indicator (2)
				let _info = reader.read_uint::<BigEndian>(6)?;

				let size = reader.read_u32::<BigEndian>()?;
				let frames = reader.read_u32::<BigEndian>()?;

				Ok(Some(Self {
					ty: VbrHeaderType::Vbri,
					frames,
					size,
				}))
			},
			_ => Ok(None),
		}
	}

	pub(super) fn is_valid(&self) -> bool {
		self.frames > 0 && self.size > 0
	}
}

#[cfg(test)]
mod tests {
	use super::{ChannelMode, FrameHeader, Layer, MpegVersion, VbrHeader, VbrHeaderType};

	#[test_log::test]
	fn search_for_frame_sync() {
		fn test(data: &[u8], expected_result: Option<u64>) {
			use super::search_for_frame_sync;
			assert_eq!(search_for_frame_sync(&mut &*data).unwrap(), expected_result);
		}

		test(&[0xFF, 0xFB, 0x00], Some(0));
		test(&[0x00, 0x00, 0x01, 0xFF, 0xFB], Some(3));
		test(&[0x01, 0xFF], None);
	}

	#[test_log::test]
	fn frame_headers() {
		// MPEG-1 Layer 3, 32 kbps, 44.1 kHz, padded, mono
		let header = FrameHeader::read(0xFFFB_12C0).unwrap();
		assert_eq!(header.bitrate(), 32);
		assert!(header.padding());
		assert_eq!(header.channel_mode(), ChannelMode::SingleChannel);
		assert_eq!(header.frame_length(), 105);
		assert_eq!(header.samples_per_frame(), 1152);
		assert_eq!(header.data_start, 21);

		// MPEG-2 Layer 3, 64 kbps, 22.05 kHz
		let header = FrameHeader::read(0xFFF3_8000).unwrap();
		assert_eq!(header.version(), MpegVersion::V2);
		assert_eq!(header.sample_rate(), 22050);
		assert_eq!(header.samples_per_frame(), 576);
		assert_eq!(header.frame_length(), 208);

		// MPEG-1 Layer 1, 32 kbps, 32 kHz, padded
		let header = FrameHeader::read(0xFFFF_1A00).unwrap();
		assert_eq!(header.layer(), Layer::Layer1);
		assert_eq!(header.frame_length(), 48 + 4);

		// Free bitrate
		assert!(FrameHeader::read(0xFFFB_0064).is_none());
		// Reserved sample rate
		assert!(FrameHeader::read(0xFFFB_9C64).is_none());
		// Reserved version
		assert!(FrameHeader::read(0xFFEB_9064).is_none());
		// No sync
		assert!(FrameHeader::read(0x4944_3303).is_none());
	}

	#[test_log::test]
	fn vbr_headers() {
		let mut xing = b"Info".to_vec();
		xing.extend([0, 0, 0, 3]);
		xing.extend(50_u32.to_be_bytes());
		xing.extend(20_000_u32.to_be_bytes());

		let header = VbrHeader::read(&mut &xing[..]).unwrap().unwrap();
		assert_eq!(header.ty, VbrHeaderType::Info);
		assert_eq!(header.frames, 50);
		assert!(header.is_valid());

		// Missing the frame count flag
		xing[7] = 2;
		assert!(VbrHeader::read(&mut &xing[..]).unwrap().is_none());

		// Truncated
		assert!(VbrHeader::read(&mut &xing[..8]).is_err());

		assert!(VbrHeader::read(&mut &[0_u8; 32][..]).unwrap().is_none());
	}
}
