//! Utilities for working with synchsafe integers and unsynchronized ID3v2 content
//!
//! See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation) for an explanation.

use crate::error::Result;
use crate::macros::{err, id3v2_err};

use std::io::Read;

/// A reader for unsynchronized content
///
/// Every `0x00` that directly follows a `0xFF` is dropped.
///
/// # Examples
///
/// ```rust
/// use std::io::{Cursor, Read};
/// use tagsmith::id3::v2::util::synchsafe::UnsynchronizedStream;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// // The content has two `0xFF 0x00` pairs, which will be removed
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x15];
///
/// let mut unsynchronized_reader = UnsynchronizedStream::new(Cursor::new(content));
///
/// let mut unsynchronized_content = Vec::new();
/// unsynchronized_reader.read_to_end(&mut unsynchronized_content)?;
///
/// assert_eq!(unsynchronized_content, [0xFF, 0x1A, 0xFF, 0x15]);
/// # Ok(()) }
/// ```
pub struct UnsynchronizedStream<R> {
	reader: R,
	// Same buffer size as `BufReader`
	buf: Box<[u8; 8 * 1024]>,
	bytes_available: usize,
	pos: usize,
	encountered_ff: bool,
}

impl<R> UnsynchronizedStream<R> {
	/// Create a new [`UnsynchronizedStream`]
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buf: Box::new([0; 8 * 1024]),
			bytes_available: 0,
			pos: 0,
			encountered_ff: false,
		}
	}

	/// Extract the reader, discarding the [`UnsynchronizedStream`]
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl<R: Read> Read for UnsynchronizedStream<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let mut written = 0;
		while written < buf.len() {
			if self.pos >= self.bytes_available {
				self.bytes_available = self.reader.read(&mut self.buf[..])?;
				self.pos = 0;

				// Exhausted the reader
				if self.bytes_available == 0 {
					break;
				}
			}

			let byte = self.buf[self.pos];
			self.pos += 1;

			// Only skip the byte if this is valid unsynchronisation
			if self.encountered_ff && byte == 0 {
				self.encountered_ff = false;
				continue;
			}

			self.encountered_ff = byte == 0xFF;
			buf[written] = byte;
			written += 1;
		}

		Ok(written)
	}
}

/// An integer that can be converted to and from its synchsafe form
pub trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in 7 bits per byte
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// // Maximum value we can represent in a synchsafe u32
	/// let synch_number = 0xFFF_FFFF_u32.synch()?;
	///
	/// // Each byte should have 7 set bits and an MSB of 0
	/// assert_eq!(synch_number, 0b01111111_01111111_01111111_01111111_u32);
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Decode a synchsafe integer
	///
	/// Any set high bits are ignored, see [`decode_synchsafe_size`] for a checked variant.
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		if self > 0x0FFF_FFFF {
			err!(TooMuchData);
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3) | ((self & 0x7F_0000) >> 2) | ((self & 0x7F00) >> 1) | (self & 0x7F)
	}
}

/// Decode a 4 byte big endian synchsafe size
///
/// # Errors
///
/// Any byte has its high bit set
///
/// # Examples
///
/// ```rust
/// use tagsmith::id3::v2::util::synchsafe::decode_synchsafe_size;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// assert_eq!(decode_synchsafe_size([0x00, 0x00, 0x08, 0x00])?, 1024);
/// assert!(decode_synchsafe_size([0x00, 0x00, 0x80, 0x00]).is_err());
/// # Ok(()) }
/// ```
pub fn decode_synchsafe_size(bytes: [u8; 4]) -> Result<u32> {
	if bytes.iter().any(|b| b & 0x80 != 0) {
		id3v2_err!(BadSynchsafeInteger(bytes));
	}

	Ok(u32::from_be_bytes(bytes).unsynch())
}
