use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};

use std::io::Read;

/// A frame kept as raw bytes
///
/// Every frame without a dedicated type ends up here (ex. `MCDI`, `RVA2`, `GEOB`), as does every
/// encrypted frame. The content is written back exactly as it was read.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BinaryFrame {
	pub(crate) header: FrameHeader,
	/// The frame content, without its header
	pub data: Vec<u8>,
}

impl BinaryFrame {
	/// Wrap `data` in a frame with the ID `id`
	pub fn new(id: FrameId, data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(id, FrameFlags::default()),
			data,
		}
	}

	/// Take the rest of `reader` as the frame content
	///
	/// # Errors
	///
	/// * `reader` fails
	pub fn parse<R>(reader: &mut R, id: FrameId, frame_flags: FrameFlags) -> Result<Self>
	where
		R: Read,
	{
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		Ok(Self {
			header: FrameHeader::new(id, frame_flags),
			data,
		})
	}

	/// The content as written, which is always [`Self::data`]
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::{BinaryFrame, FrameFlags, FrameId};

	#[test_log::test]
	fn content_is_untouched() {
		let content = [0x00, 0xFF, 0xFE, 0x00, 0x41];

		let flags = FrameFlags {
			grouping_identity: Some(3),
			..FrameFlags::default()
		};
		let frame =
			BinaryFrame::parse(&mut &content[..], FrameId::new("MCDI").unwrap(), flags).unwrap();

		assert_eq!(frame.as_bytes(), content);
		assert_eq!(frame.flags(), flags);
		assert_eq!(frame.id().as_str(), "MCDI");
	}
}
