use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::FrameFlags;
use crate::id3::v2::items::encode_with_value;
use crate::id3::v2::util::genres::{encode_numeric, is_genre_frame};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::{Frame, Id3v2Tag, Id3v2Version};
use crate::macros::id3v2_err;

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

pub(in crate::id3::v2) fn create_items<W>(
	writer: &mut W,
	tag: &Id3v2Tag,
	write_options: WriteOptions,
) -> Result<()>
where
	W: Write,
{
	let version = tag.version();

	for frame in tag.frames() {
		if !frame.id().is_valid_for(version) {
			id3v2_err!(FrameIdVersionMismatch(frame.id().clone()));
		}

		verify_frame(frame, version)?;

		let value = match frame {
			// Genres are kept as text in memory, references are only created when writing
			Frame::Text(text) if !write_options.genres_as_text && is_genre_frame(frame.id_str()) => {
				encode_with_value(
					text.encoding,
					&encode_numeric(&text.value, version),
					version,
					write_options,
				)?
			},
			_ => frame.as_bytes(version, write_options)?,
		};

		write_frame(writer, frame.id_str(), frame.flags(), &value, version)?;
	}

	Ok(())
}

fn verify_frame(frame: &Frame, version: Id3v2Version) -> Result<()> {
	let valid = match (frame.id().as_str(), frame) {
		("APIC" | "PIC", Frame::Picture(_))
		| ("USLT" | "ULT", Frame::UnsynchronizedText(_))
		| ("COMM" | "COM", Frame::Comment(_))
		| ("TXXX" | "TXX", Frame::UserText(_))
		| ("WXXX" | "WXX", Frame::UserUrl(_))
		| ("UFID" | "UFI", Frame::UniqueFileIdentifier(_))
		| ("POPM" | "POP", Frame::Popularimeter(_))
		| ("PRIV", Frame::Private(_))
		| (_, Frame::Binary(_)) => true,
		("TIPL" | "TMCL", Frame::KeyValue(_)) => version == Id3v2Version::V4,
		("IPLS" | "IPL", Frame::KeyValue(_)) => version != Id3v2Version::V4,
		// iTunes extensions that don't follow the naming scheme
		("GRP1" | "MVNM" | "MVIN" | "GP1" | "MVN" | "MVI", Frame::Text(_)) => true,
		(id, Frame::Text(_)) => id.starts_with('T'),
		(id, Frame::Url(_)) => id.starts_with('W'),
		_ => false,
	};

	if !valid {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(
			frame.id_str().to_owned(),
			frame.name(),
		))
		.into());
	}

	Ok(())
}

fn write_frame<W>(
	writer: &mut W,
	name: &str,
	flags: FrameFlags,
	value: &[u8],
	version: Id3v2Version,
) -> Result<()>
where
	W: Write,
{
	if version == Id3v2Version::V2 {
		// ID3v2.2 frames have no flags, and a 3 byte size
		let len = value.len() as u32;
		if len > 0x00FF_FFFF {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
		}

		writer.write_all(name.as_bytes())?;
		writer.write_u24::<BigEndian>(len)?;
		writer.write_all(value)?;
		return Ok(());
	}

	// The content was re-encoded, only an encrypted frame's indicator still describes its data
	let flags = match flags.encryption {
		Some(_) => flags,
		None => FrameFlags {
			data_length_indicator: None,
			..flags
		},
	};

	if let Some(method_symbol) = flags.encryption {
		if method_symbol < 0x80 {
			id3v2_err!(InvalidEncryptionMethodSymbol(method_symbol));
		}

		if version == Id3v2Version::V4 && flags.data_length_indicator.is_none() {
			id3v2_err!(MissingDataLengthIndicator);
		}
	}

	// Flags that carry extra data, see `ParsedFrame::read`
	let mut len = value.len() as u32;
	if flags.grouping_identity.is_some() {
		len += 1;
	}
	if flags.encryption.is_some() {
		len += 1;
	}
	let data_length_indicator = match version {
		Id3v2Version::V4 => flags.data_length_indicator,
		_ => None,
	};
	if data_length_indicator.is_some() {
		len += 4;
	}

	write_frame_header(writer, name, len, flags, version)?;

	match version {
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity {
				writer.write_u8(group)?;
			}
			if let Some(method_symbol) = flags.encryption {
				writer.write_u8(method_symbol)?;
			}
			if let Some(data_length) = data_length_indicator {
				writer.write_u32::<BigEndian>(data_length.synch()?)?;
			}
		},
		_ => {
			if let Some(method_symbol) = flags.encryption {
				writer.write_u8(method_symbol)?;
			}
			if let Some(group) = flags.grouping_identity {
				writer.write_u8(group)?;
			}
		},
	}

	writer.write_all(value)?;

	Ok(())
}

fn write_frame_header<W>(
	writer: &mut W,
	name: &str,
	mut len: u32,
	flags: FrameFlags,
	version: Id3v2Version,
) -> Result<()>
where
	W: Write,
{
	let flags = match version {
		Id3v2Version::V4 => {
			len = len.synch()?;
			flags.as_id3v24_bytes()
		},
		_ => flags.as_id3v23_bytes(),
	};

	writer.write_all(name.as_bytes())?;
	writer.write_u32::<BigEndian>(len)?;
	writer.write_u16::<BigEndian>(flags)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::create_items;
	use crate::config::{ParseOptions, WriteOptions};
	use crate::id3::v2::frame::read::ParsedFrame;
	use crate::id3::v2::fields::FieldKey;
	use crate::id3::v2::{
		BinaryFrame, Frame, FrameFlags, FrameId, Id3v2Tag, Id3v2Version, UrlLinkFrame,
	};

	fn items(tag: &Id3v2Tag, write_options: WriteOptions) -> crate::error::Result<Vec<u8>> {
		let mut writer = Vec::new();
		create_items(&mut writer, tag, write_options)?;
		Ok(writer)
	}

	#[test_log::test]
	fn v22_frame_layout() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V2);
		tag.set_title(String::from("Foo"));

		let bytes = items(&tag, WriteOptions::default()).unwrap();
		assert_eq!(bytes, b"TT2\x00\x00\x04\x00Foo");
	}

	#[test_log::test]
	fn v24_synchsafe_size() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.set_title("a".repeat(200));

		let bytes = items(&tag, WriteOptions::default()).unwrap();
		// 201 = 0b1_1001001
		assert_eq!(&bytes[..10], b"TIT2\x00\x00\x01\x49\x00\x00");

		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.set_title("a".repeat(200));

		let bytes = items(&tag, WriteOptions::default()).unwrap();
		assert_eq!(&bytes[..10], b"TIT2\x00\x00\x00\xC9\x00\x00");
	}

	#[test_log::test]
	fn numeric_genres() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.set_field(FieldKey::Genre, "Rock").unwrap();

		let numeric = items(&tag, WriteOptions::new().genres_as_text(false)).unwrap();
		assert_eq!(&numeric[10..], b"\x00(17)");

		let text = items(&tag, WriteOptions::new().genres_as_text(true)).unwrap();
		assert_eq!(&text[10..], b"\x00Rock");
	}

	#[test_log::test]
	fn id_version_mismatch() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V2);
		tag.push(Frame::Url(UrlLinkFrame::new(
			FrameId::new("WOAR").unwrap(),
			"https://example.com",
		)));

		assert!(items(&tag, WriteOptions::default()).is_err());
	}

	#[test_log::test]
	fn frame_id_must_match_content() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.push(Frame::Url(UrlLinkFrame::new(
			FrameId::new("TIT2").unwrap(),
			"https://example.com",
		)));

		assert!(items(&tag, WriteOptions::default()).is_err());
	}

	#[test_log::test]
	fn encrypted_frame() {
		let mut frame = BinaryFrame::new(FrameId::new("TIT2").unwrap(), vec![1, 2, 3]);
		frame.set_flags(FrameFlags {
			encryption: Some(0x80),
			data_length_indicator: Some(10),
			..FrameFlags::default()
		});

		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.push(Frame::Binary(frame.clone()));

		let bytes = items(&tag, WriteOptions::default()).unwrap();
		assert_eq!(
			bytes,
			[
				b'T', b'I', b'T', b'2', 0, 0, 0, 8, 0x00, 0x05, // Header
				0x80, // Method symbol
				0, 0, 0, 10, // Data length indicator
				1, 2, 3
			]
		);

		frame.set_flags(FrameFlags {
			encryption: Some(0x01),
			data_length_indicator: Some(10),
			..FrameFlags::default()
		});
		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		tag.push(Frame::Binary(frame));

		assert!(items(&tag, WriteOptions::default()).is_err());
	}

	#[test_log::test]
	fn stale_data_length_indicator_is_dropped() {
		// TIT2, UTF-8 "Héllo", with a 7 byte data length indicator
		let mut content = vec![b'T', b'I', b'T', b'2', 0, 0, 0, 11, 0x00, 0x01, 0, 0, 0, 7];
		content.extend(b"\x03H\xC3\xA9llo");

		let mut tag = Id3v2Tag::new(Id3v2Version::V4);
		let ParsedFrame::Next(frame) = ParsedFrame::read(
			&mut &content[..],
			Id3v2Version::V4,
			ParseOptions::new(),
		)
		.unwrap() else {
			panic!("expected a frame");
		};
		assert_eq!(frame.flags().data_length_indicator, Some(7));
		tag.push(frame);

		let bytes = items(&tag, WriteOptions::new().android_compatible(true)).unwrap();
		assert_eq!(
			bytes,
			[
				b'T', b'I', b'T', b'2', 0, 0, 0, 6, 0x00, 0x00, // Header
				0x00, b'H', 0xE9, b'l', b'l', b'o',
			]
		);
	}
}
