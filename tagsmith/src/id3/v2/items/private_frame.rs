use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

const FRAME_ID: FrameId = FrameId::from_static("PRIV");

/// An `ID3v2` private frame (`PRIV`)
///
/// Data that only means something to the program that wrote it, tagged with an owner (usually an
/// email address or a URL). ID3v2.2 has no such frame.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PrivateFrame {
	pub(crate) header: FrameHeader,
	/// Who the data belongs to
	pub owner: String,
	/// The data, in whatever form the owner uses
	pub private_data: Vec<u8>,
}

impl PrivateFrame {
	/// Create a new [`PrivateFrame`]
	pub fn new(owner: impl Into<String>, private_data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			owner: owner.into(),
			private_data,
		}
	}

	/// Read a `PRIV` frame's content
	///
	/// An owner that can't be decoded makes the frame unreadable, and `None` is returned.
	///
	/// # Errors
	///
	/// * `reader` fails
	pub fn parse<R>(reader: &mut R, frame_flags: FrameFlags) -> Result<Option<Self>>
	where
		R: Read,
	{
		let owner = match decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		) {
			Ok(owner) => owner.content,
			Err(e) => {
				log::warn!("ID3v2: Unable to decode PRIV owner, discarding frame: {}", e);
				return Ok(None);
			},
		};

		let mut private_data = Vec::new();
		reader.read_to_end(&mut private_data)?;

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			owner,
			private_data,
		}))
	}

	/// Encode the owner and data
	///
	/// Characters in the owner outside of Latin-1 are replaced.
	pub fn as_bytes(&self) -> Vec<u8> {
		let mut content = TextEncoding::Latin1
			.encode(&self.owner, true, true)
			.unwrap_or_else(|_| vec![0]);
		content.extend_from_slice(&self.private_data);

		content
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::{FrameFlags, PrivateFrame};

	#[test_log::test]
	fn owner_and_data() {
		let content = b"https://example.com\0\x00\x01\x02";

		let frame = PrivateFrame::parse(&mut &content[..], FrameFlags::default())
			.unwrap()
			.unwrap();
		assert_eq!(frame.owner, "https://example.com");
		assert_eq!(frame.private_data, [0, 1, 2]);

		assert_eq!(frame.as_bytes(), content);
	}

	#[test_log::test]
	fn empty_data() {
		let frame = PrivateFrame::new("foo@bar.com", Vec::new());
		assert_eq!(frame.as_bytes(), b"foo@bar.com\0");
	}
}
