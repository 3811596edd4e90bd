// Tests for converting tags between versions, both in memory and on disk

use tagsmith::config::{ParseOptions, WriteOptions};
use tagsmith::file::Mp3File;
use tagsmith::id3::v2::convert::{convert, convert_with_report};
use tagsmith::id3::v2::fields::FieldKey;
use tagsmith::id3::v2::{FrameId, Id3v2Tag, Id3v2Version};

use std::borrow::Cow;
use std::io::Cursor;

fn audio() -> Vec<u8> {
	let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
	frame.resize(417, 0x22);
	frame.repeat(3)
}

#[test_log::test]
fn every_field_survives_upgrade() {
	for from in [Id3v2Version::V2, Id3v2Version::V3] {
		let mut tag = Id3v2Tag::new(from);
		tag.set_field(FieldKey::Title, "Foo title").unwrap();
		tag.set_field(FieldKey::Artist, "Bar artist").unwrap();
		tag.set_field(FieldKey::Mood, "Calm").unwrap();
		tag.set_field(FieldKey::Track, "3").unwrap();
		tag.set_field(FieldKey::TrackTotal, "12").unwrap();

		let converted = convert(&tag, Id3v2Version::V4);
		assert_eq!(converted.version(), Id3v2Version::V4);

		for key in [
			FieldKey::Title,
			FieldKey::Artist,
			FieldKey::Mood,
			FieldKey::Track,
			FieldKey::TrackTotal,
		] {
			assert_eq!(
				converted.get_first(key),
				tag.get_first(key),
				"{key} differs after converting from {from}"
			);
		}

		// Converting again is a no-op
		assert_eq!(convert(&converted, Id3v2Version::V4), converted);
	}
}

#[test_log::test]
fn multiple_values_are_kept() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.add_field(FieldKey::AlbumArtist, "Foo").unwrap();
	tag.add_field(FieldKey::AlbumArtist, "Bar").unwrap();

	let (converted, dropped) = convert_with_report(&tag, Id3v2Version::V2);
	assert!(dropped.is_empty());
	assert_eq!(converted.get_fields(FieldKey::AlbumArtist), ["Foo", "Bar"]);
}

#[test_log::test]
fn convert_before_saving() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V2);
	tag.set_field(FieldKey::Title, "Foo title").unwrap();
	tag.set_field(FieldKey::Mood, "Calm").unwrap();

	let mut content = Vec::new();
	tag.dump_to(&mut content, WriteOptions::new()).unwrap();
	content.extend(audio());

	let mut file = Cursor::new(content);
	let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(mp3_file.id3v2().unwrap().version(), Id3v2Version::V2);

	let v24 = mp3_file.id3v2_as_v24().map(Cow::into_owned).unwrap();
	mp3_file.set_id3v2(v24);
	mp3_file.save_to(&mut file, WriteOptions::new()).unwrap();

	let mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
	let tag = mp3_file.id3v2().unwrap();
	assert_eq!(tag.version(), Id3v2Version::V4);
	assert_eq!(tag.get_text(&FrameId::new("TIT2").unwrap()), Some("Foo title"));
	assert_eq!(tag.get_text(&FrameId::new("TMOO").unwrap()), Some("Calm"));
	assert_eq!(&file.get_ref()[mp3_file.mp3_start_byte() as usize..], &audio()[..]);
}
