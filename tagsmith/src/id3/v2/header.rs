use crate::error::Result;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, decode_synchsafe_size};
use crate::macros::id3v2_err;

use std::fmt::{Display, Formatter};
use std::io::{ErrorKind as IoErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt};

/// The size of an ID3v2 header (and footer)
pub const ID3V2_HEADER_SIZE: u32 = 10;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// All versions, oldest first
	pub const ALL: [Self; 3] = [Self::V2, Self::V3, Self::V4];

	/// The major version byte, as stored in the tag header
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// Get the version from a major version byte
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::Id3v2Version;
	///
	/// assert_eq!(Id3v2Version::from_major(3), Some(Id3v2Version::V3));
	/// assert_eq!(Id3v2Version::from_major(5), None);
	/// ```
	pub fn from_major(major: u8) -> Option<Self> {
		match major {
			2 => Some(Self::V2),
			3 => Some(Self::V3),
			4 => Some(Self::V4),
			_ => None,
		}
	}

	/// The length of a frame ID in this version (3 for ID3v2.2, 4 otherwise)
	pub fn frame_id_len(self) -> usize {
		match self {
			Self::V2 => 3,
			_ => 4,
		}
	}

	/// The size of a frame header in this version
	pub fn frame_header_len(self) -> usize {
		match self {
			Self::V2 => 6,
			_ => 10,
		}
	}
}

impl Display for Id3v2Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2.{}", self.major())
	}
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// Whether or not all frames are unsynchronised. See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation)
	///
	/// This is only respected when reading.
	pub unsynchronisation: bool,
	/// Whether the tag had an extended header
	///
	/// When writing, an extended header is only created for `crc`.
	pub extended_header: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer (**ID3v2.4 only**)
	///
	/// A footer will be created if the tag is written, and the tag will not be padded.
	pub footer: bool,
	/// Whether or not to include a CRC-32 in the extended header (**ID3v2.4 only**)
	///
	/// This is calculated if the tag is written
	pub crc: bool,
}

impl Id3v2TagFlags {
	/// Get the byte representation of the flags for `version`
	///
	/// NOTE: This does not include the extended header flags
	pub fn as_byte(&self, version: Id3v2Version) -> u8 {
		let mut byte = 0;

		match version {
			// Unsynchronisation is never written, and the only other ID3v2.2 flag is compression
			Id3v2Version::V2 => {},
			Id3v2Version::V3 => {
				if self.experimental {
					byte |= 0x20;
				}
			},
			Id3v2Version::V4 => {
				if self.crc {
					byte |= 0x40;
				}

				if self.experimental {
					byte |= 0x20;
				}

				if self.footer {
					byte |= 0x10;
				}
			},
		}

		byte
	}
}

/// A parsed ID3v2 tag header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Id3v2Header {
	/// The major version of the tag
	pub version: Id3v2Version,
	/// The revision byte, not interpreted
	pub revision: u8,
	/// The tag flags
	pub flags: Id3v2TagFlags,
	/// The size of the tag contents, including the extended header and padding
	///
	/// This **does not** include the header or footer.
	pub size: u32,
	/// The size of the extended header, if one was present
	pub extended_size: u32,
}

impl Id3v2Header {
	/// Parse an ID3v2 header
	///
	/// This will also skip over the extended header, if present.
	///
	/// # Errors
	///
	/// * The version is not 2, 3, or 4
	/// * The size bytes are not synchsafe
	/// * The tag is a compressed ID3v2.2 tag
	/// * The extended header is invalid
	///
	/// An absent header is **not** an error, `Ok(None)` is returned instead.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::{Id3v2Header, Id3v2Version};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let bytes = [b'I', b'D', b'3', 3, 0, 0, 0, 0, 0x08, 0x00];
	/// let header = Id3v2Header::parse(&mut &bytes[..])?.expect("header should be present");
	///
	/// assert_eq!(header.version, Id3v2Version::V3);
	/// assert_eq!(header.size, 1024);
	/// assert_eq!(header.full_tag_size(), 1034);
	///
	/// assert!(Id3v2Header::parse(&mut &b"not a tag!"[..])?.is_none());
	/// # Ok(()) }
	/// ```
	pub fn parse<R>(reader: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		let mut header = [0; 10];
		match reader.read_exact(&mut header) {
			Ok(()) => {},
			Err(e) if e.kind() == IoErrorKind::UnexpectedEof => return Ok(None),
			Err(e) => return Err(e.into()),
		}

		if &header[..3] != b"ID3" {
			return Ok(None);
		}

		log::debug!("ID3v2: Parsing header");

		// We don't care about minor revisions unless there's an error
		let Some(version) = Id3v2Version::from_major(header[3]) else {
			id3v2_err!(BadId3v2Version(header[3], header[4]));
		};
		let revision = header[4];

		let flags = header[5];

		// Compression was a flag only used in ID3v2.2 (bit 6).
		// No compression scheme was ever decided on, so the tag is unreadable.
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			id3v2_err!(V2Compression);
		}

		let size = decode_synchsafe_size([header[6], header[7], header[8], header[9]])?;

		let mut flags_parsed = Id3v2TagFlags {
			unsynchronisation: flags & 0x80 == 0x80,
			extended_header: version != Id3v2Version::V2 && flags & 0x40 == 0x40,
			experimental: version != Id3v2Version::V2 && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
			crc: false,
		};

		let mut extended_size = 0;
		match version {
			Id3v2Version::V3 if flags_parsed.extended_header => {
				// Size (4, not including itself)
				// Flags (2)
				// Padding size (4)
				// CRC (4, optional)
				let declared_size = reader.read_u32::<BigEndian>()?;
				if declared_size != 6 && declared_size != 10 {
					id3v2_err!(BadExtendedHeaderSize);
				}

				let extended_flags = reader.read_u16::<BigEndian>()?;
				let _padding_size = reader.read_u32::<BigEndian>()?;

				if extended_flags & 0x8000 == 0x8000 {
					flags_parsed.crc = true;
				}

				if declared_size == 10 {
					let _crc = reader.read_u32::<BigEndian>()?;
				}

				extended_size = declared_size + 4;
			},
			Id3v2Version::V4 if flags_parsed.extended_header => {
				// Size (4, synchsafe, including itself)
				// Number of flag bytes (1)
				// Flags (1)
				// Flag data
				extended_size = reader.read_u32::<BigEndian>()?.unsynch();
				if extended_size < 6 {
					id3v2_err!(BadExtendedHeaderSize);
				}

				let _num_flag_bytes = reader.read_u8()?;
				let extended_flags = reader.read_u8()?;
				if extended_flags & 0x20 == 0x20 {
					flags_parsed.crc = true;
				}

				// The flag data isn't needed, the CRC is recalculated on write
				let remaining = u64::from(extended_size - 6);
				let skipped =
					std::io::copy(&mut reader.by_ref().take(remaining), &mut std::io::sink())?;
				if skipped != remaining {
					id3v2_err!(BadExtendedHeaderSize);
				}
			},
			_ => {},
		}

		if extended_size > 0 && extended_size > size {
			id3v2_err!(BadExtendedHeaderSize);
		}

		Ok(Some(Id3v2Header {
			version,
			revision,
			flags: flags_parsed,
			size,
			extended_size,
		}))
	}

	/// The total size of the tag, including the header and footer
	pub fn full_tag_size(&self) -> u32 {
		ID3V2_HEADER_SIZE + self.size + if self.flags.footer { ID3V2_HEADER_SIZE } else { 0 }
	}

	/// The size of the frame region (and any padding), excluding the extended header
	pub(crate) fn content_size(&self) -> u32 {
		self.size.saturating_sub(self.extended_size)
	}
}
