use crate::error::Result;
use crate::id3::v2::convert::upgrade_v22_id;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::{FrameFlags, FrameId, Id3v2Version};
use crate::macros::id3v2_err;

use std::borrow::Cow;
use std::io::Read;

pub(crate) fn parse_v2_header<R>(
	reader: &mut R,
	size: &mut u32,
) -> Result<Option<(FrameId, FrameFlags)>>
where
	R: Read,
{
	let mut header = [0; 6];
	if reader.read_exact(&mut header).is_err() {
		return Ok(None);
	}

	// Assume we just started reading padding
	if header[0] == 0 {
		return Ok(None);
	}

	*size = u32::from_be_bytes([0, header[3], header[4], header[5]]);

	let id = frame_id_from_bytes(&header[..3])?;

	// V2 doesn't store flags
	Ok(Some((id, FrameFlags::default())))
}

pub(crate) fn parse_header<R>(
	reader: &mut R,
	size: &mut u32,
	version: Id3v2Version,
) -> Result<Option<(FrameId, FrameFlags)>>
where
	R: Read,
{
	let mut header = [0; 10];
	if reader.read_exact(&mut header).is_err() {
		return Ok(None);
	}

	// Assume we just started reading padding
	if header[0] == 0 {
		return Ok(None);
	}

	let synchsafe = version == Id3v2Version::V4;

	*size = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
	if synchsafe {
		*size = size.unsynch();
	}

	// Some apps make v3 tags with v2 frame IDs, the frame header is still a v3 header
	let id = if header[3] == 0 && !synchsafe {
		let v2_id = frame_id_from_bytes(&header[..3])?;
		log::warn!("ID3v2: Found a v2 frame ID ({v2_id}) in a v3 tag, attempting to upgrade");

		match upgrade_v22_id(v2_id.as_str()) {
			Some(upgraded) => FrameId::from_static(upgraded),
			None => id3v2_err!(FrameIdVersionMismatch(v2_id)),
		}
	} else {
		frame_id_from_bytes(&header[..4])?
	};

	let flags = u16::from_be_bytes([header[8], header[9]]);
	let flags = if synchsafe {
		FrameFlags::parse_id3v24(flags)
	} else {
		FrameFlags::parse_id3v23(flags)
	};

	Ok(Some((id, flags)))
}

fn frame_id_from_bytes(id_bytes: &[u8]) -> Result<FrameId> {
	let Ok(id_str) = std::str::from_utf8(id_bytes) else {
		id3v2_err!(BadFrameId(id_bytes.to_vec()));
	};

	FrameId::new(Cow::Owned(id_str.to_owned()))
}
