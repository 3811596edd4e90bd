use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::alloc::VecFallibleCapacity;
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::hash::{Hash, Hasher};
use std::io::Read;

use byteorder::ReadBytesExt;

// The play counter is at least this wide, and grows a byte at a time past it
const MIN_COUNTER_LEN: usize = 4;

/// A popularimeter frame (`POPM`, `POP` in ID3v2.2)
///
/// A rating and play count for a single user, identified by email. A tag can hold one of these
/// per user, so frames with the same email compare equal.
///
/// This is where [`FieldKey::Rating`](crate::id3::v2::fields::FieldKey::Rating) is stored.
#[derive(Clone, Debug, Eq)]
pub struct PopularimeterFrame {
	pub(crate) header: FrameHeader,
	/// The user the rating belongs to, may be empty
	pub email: String,
	/// 1 (worst) to 255 (best), 0 meaning unrated
	pub rating: u8,
	/// How many times the user has played the file
	///
	/// The frame can store counters of any size, anything past [`u64::MAX`] is clamped.
	pub counter: u64,
}

impl PartialEq for PopularimeterFrame {
	fn eq(&self, other: &Self) -> bool {
		self.email == other.email
	}
}

impl Hash for PopularimeterFrame {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.email.hash(state);
	}
}

impl PopularimeterFrame {
	/// Create a new [`PopularimeterFrame`], with the ID used by `version`
	pub fn new(version: Id3v2Version, email: impl Into<String>, rating: u8, counter: u64) -> Self {
		Self {
			header: FrameHeader::new(
				FrameId::versioned(version, "POP", "POPM"),
				FrameFlags::default(),
			),
			email: email.into(),
			rating,
			counter,
		}
	}

	/// Read a `POPM` frame's content
	///
	/// The play counter is optional, a missing one reads as 0.
	///
	/// # Errors
	///
	/// * The rating is missing
	/// * `reader` fails
	pub fn parse<R>(reader: &mut R, id: FrameId, frame_flags: FrameFlags) -> Result<Self>
	where
		R: Read,
	{
		let email = decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?
		.content;
		let rating = reader.read_u8()?;

		let mut counter_bytes = Vec::new();
		reader.read_to_end(&mut counter_bytes)?;

		let counter = match counter_bytes.len() {
			0..=8 => counter_bytes
				.iter()
				.fold(0, |counter, b| (counter << 8) | u64::from(*b)),
			len => {
				log::warn!("ID3v2: POPM counter is {} bytes long, clamping", len);
				u64::MAX
			},
		};

		Ok(Self {
			header: FrameHeader::new(id, frame_flags),
			email,
			rating,
			counter,
		})
	}

	/// Encode the email, rating, and counter
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the email isn't Latin-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		let counter = self.counter.to_be_bytes();
		let leading_zeros = counter
			.iter()
			.take(counter.len() - MIN_COUNTER_LEN)
			.take_while(|b| **b == 0)
			.count();
		let counter = &counter[leading_zeros..];

		let mut content = Vec::try_with_capacity_stable(self.email.len() + 2 + counter.len())?;
		content.extend(TextEncoding::Latin1.encode(
			&self.email,
			true,
			write_options.lossy_text_encoding,
		)?);
		content.push(self.rating);
		content.extend_from_slice(counter);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use crate::config::WriteOptions;
	use crate::id3::v2::{FrameFlags, FrameId, Id3v2Version, PopularimeterFrame};

	fn counter_bytes(counter: u64) -> Vec<u8> {
		let frame = PopularimeterFrame::new(Id3v2Version::V4, "foo@bar.com", 196, counter);
		let content = frame.as_bytes(WriteOptions::default()).unwrap();

		assert_eq!(&content[..13], b"foo@bar.com\0\xC4");

		let parsed =
			PopularimeterFrame::parse(&mut &content[..], frame.id().clone(), FrameFlags::default())
				.unwrap();
		assert_eq!(parsed.rating, 196);
		assert_eq!(parsed.counter, counter);

		content[13..].to_vec()
	}

	#[test_log::test]
	fn counter_grows_past_four_bytes() {
		assert_eq!(counter_bytes(0), [0, 0, 0, 0]);
		assert_eq!(counter_bytes(u64::from(u32::MAX)), [0xFF; 4]);
		assert_eq!(
			counter_bytes(u64::from(u32::MAX) + 1),
			[0x01, 0x00, 0x00, 0x00, 0x00]
		);
		assert_eq!(counter_bytes(u64::MAX), [0xFF; 8]);
	}

	#[test_log::test]
	fn missing_and_oversized_counters() {
		let id = FrameId::new("POPM").unwrap();

		let frame =
			PopularimeterFrame::parse(&mut &b"\0\x80"[..], id.clone(), FrameFlags::default())
				.unwrap();
		assert!(frame.email.is_empty());
		assert_eq!(frame.rating, 128);
		assert_eq!(frame.counter, 0);

		let oversized = b"\0\x80\x01\0\0\0\0\0\0\0\0";
		let frame =
			PopularimeterFrame::parse(&mut &oversized[..], id, FrameFlags::default()).unwrap();
		assert_eq!(frame.counter, u64::MAX);
	}
}
