use super::header::{ChannelMode, FrameHeader, Layer, MpegVersion, VbrHeader, VbrHeaderType};
use crate::error::Result;

use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

/// The audio side of an MP3 file
///
/// Everything here describes the first audio frame, found at [`AudioHeader::mp3_start_byte`].
/// The start byte is kept current when the file is saved and the audio moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct AudioHeader {
	pub(crate) mp3_start_byte: u64,
	pub(crate) first_frame: FrameHeader,
	pub(crate) number_of_frames: u64,
	pub(crate) bitrate: u32,
	pub(crate) vbr: bool,
}

impl AudioHeader {
	/// The offset of the first audio frame
	pub fn mp3_start_byte(&self) -> u64 {
		self.mp3_start_byte
	}

	/// The header of the first audio frame
	pub fn first_frame(&self) -> &FrameHeader {
		&self.first_frame
	}

	/// The length of the first audio frame in bytes
	pub fn frame_length(&self) -> u32 {
		self.first_frame.len
	}

	/// The number of audio frames
	///
	/// This comes from a Xing/Info or VBRI header when one is present, otherwise it is estimated
	/// from the length of the first frame.
	pub fn number_of_frames(&self) -> u64 {
		self.number_of_frames
	}

	/// Audio bitrate (kbps)
	///
	/// This is an average for variable bitrate streams.
	pub fn bitrate(&self) -> u32 {
		self.bitrate
	}

	/// Whether the stream declares itself as variable bitrate
	pub fn is_vbr(&self) -> bool {
		self.vbr
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.first_frame.sample_rate
	}

	/// MPEG version
	pub fn version(&self) -> MpegVersion {
		self.first_frame.version
	}

	/// MPEG layer
	pub fn layer(&self) -> Layer {
		self.first_frame.layer
	}

	/// MPEG channel mode
	pub fn channel_mode(&self) -> ChannelMode {
		self.first_frame.channel_mode
	}

	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		let samples = self.number_of_frames * u64::from(self.first_frame.samples);
		Duration::from_millis(samples * 1000 / u64::from(self.first_frame.sample_rate))
	}

	/// Build the header for the frame at `start`, reading a VBR header if one follows it
	pub(super) fn read<R>(
		reader: &mut R,
		first_frame: FrameHeader,
		start: u64,
		audio_end: u64,
	) -> Result<Self>
	where
		R: Read + Seek,
	{
		// The Xing/Info or VBRI header sits right after the side information
		let vbr_header_location = start + u64::from(first_frame.data_start);

		let mut vbr_bytes = [0; 32];
		let available = audio_end.saturating_sub(vbr_header_location).min(32) as usize;
		let mut vbr_header = None;
		if available > 0 {
			reader.seek(SeekFrom::Start(vbr_header_location))?;
			reader.read_exact(&mut vbr_bytes[..available])?;
			vbr_header = VbrHeader::read(&mut &vbr_bytes[..available])?;
		}

		let mut header = Self {
			mp3_start_byte: start,
			first_frame,
			number_of_frames: audio_end.saturating_sub(start) / u64::from(first_frame.len),
			bitrate: first_frame.bitrate,
			vbr: false,
		};

		let Some(vbr_header) = vbr_header.filter(VbrHeader::is_valid) else {
			return Ok(header);
		};

		log::trace!("MPEG: Frame count from {:?} header", vbr_header.ty);

		header.number_of_frames = u64::from(vbr_header.frames);
		header.vbr = vbr_header.ty != VbrHeaderType::Info;

		if header.vbr {
			let millis = header.duration().as_millis() as u64;
			if millis > 0 {
				header.bitrate = (u64::from(vbr_header.size) * 8 / millis) as u32;
			}
		}

		Ok(header)
	}
}
