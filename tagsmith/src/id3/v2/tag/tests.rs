use crate::config::{ParseOptions, ParsingMode, WriteOptions};
use crate::id3::v2::fields::{FieldKey, FieldMapping};
use crate::id3::v2::header::Id3v2Header;
use crate::id3::v2::items::{CommentFrame, DEFAULT_LANGUAGE, TextInformationFrame};
use crate::id3::v2::{Frame, FrameId, Id3v2Tag, Id3v2TagFlags, Id3v2Version};
use crate::util::text::TextEncoding;

use std::io::Cursor;

fn read_tag(bytes: &[u8]) -> Id3v2Tag {
	let mut reader = Cursor::new(bytes);

	let header = Id3v2Header::parse(&mut reader).unwrap().unwrap();
	crate::id3::v2::read::parse_id3v2(
		&mut reader,
		header,
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
	)
	.unwrap()
}

fn dump_and_re_read(tag: &Id3v2Tag, write_options: WriteOptions) -> Id3v2Tag {
	let mut tag_bytes = Vec::new();
	tag.dump_to(&mut tag_bytes, write_options).unwrap();

	read_tag(&tag_bytes)
}

// A value every mapping kind accepts
fn sample_value(key: FieldKey, version: Id3v2Version) -> &'static str {
	match key.mapping(version) {
		FieldMapping::Genre => "Rock",
		FieldMapping::NumberPair(..) => "7",
		FieldMapping::Popularimeter => "128",
		FieldMapping::Url(_) | FieldMapping::UserUrl(_) => "https://example.com/foo",
		FieldMapping::InvolvedPeople => "producer:Foo producer",
		// Not one of the involved people roles, so ID3v2.2 and ID3v2.3 can tell them apart
		FieldMapping::MusicianCredits => "guitar:Foo guitarist",
		_ => "Foo value",
	}
}

#[test_log::test]
fn every_field_round_trips() {
	for version in Id3v2Version::ALL {
		let mut tag = Id3v2Tag::new(version);
		for key in FieldKey::ALL {
			tag.set_field(*key, sample_value(*key, version)).unwrap();
		}

		for key in FieldKey::ALL {
			assert!(
				!tag.get_fields(*key).is_empty(),
				"{key} has no value in {version}"
			);
		}

		let re_read = dump_and_re_read(&tag, WriteOptions::default());
		assert_eq!(re_read.version(), version);
		assert_eq!(re_read.len(), tag.len());

		for key in FieldKey::ALL {
			assert_eq!(
				re_read.get_fields(*key),
				tag.get_fields(*key),
				"{key} changed in {version}"
			);
		}
	}
}

#[test_log::test]
fn multi_value_fields_keep_order() {
	for version in Id3v2Version::ALL {
		let mut tag = Id3v2Tag::new(version);
		tag.add_field(FieldKey::AlbumArtist, "Foo artist").unwrap();
		tag.add_field(FieldKey::AlbumArtist, "Bar artist").unwrap();

		// Both values share one frame
		assert_eq!(tag.len(), 1);
		assert_eq!(
			tag.get_fields(FieldKey::AlbumArtist),
			["Foo artist", "Bar artist"]
		);

		let re_read = dump_and_re_read(&tag, WriteOptions::default());
		assert_eq!(
			re_read.get_fields(FieldKey::AlbumArtist),
			["Foo artist", "Bar artist"]
		);
		assert_eq!(re_read.get_first(FieldKey::AlbumArtist).as_deref(), Some("Foo artist"));
	}
}

#[test_log::test]
fn numeric_genres() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set_field(FieldKey::Genre, "Rock").unwrap();

	let re_read = dump_and_re_read(&tag, WriteOptions::new().genres_as_text(false));
	assert_eq!(
		re_read.get_text(&FrameId::new("TCON").unwrap()),
		Some("(17)")
	);
	assert_eq!(re_read.get_first(FieldKey::Genre).as_deref(), Some("Rock"));

	let re_read = dump_and_re_read(&tag, WriteOptions::new().genres_as_text(true));
	assert_eq!(re_read.get_text(&FrameId::new("TCON").unwrap()), Some("Rock"));
	assert_eq!(re_read.get_first(FieldKey::Genre).as_deref(), Some("Rock"));

	// Unknown genres are kept as text either way
	tag.set_field(FieldKey::Genre, "Foo genre").unwrap();
	let re_read = dump_and_re_read(&tag, WriteOptions::new().genres_as_text(false));
	assert_eq!(re_read.genre().as_deref(), Some("Foo genre"));
}

#[test_log::test]
fn crc_and_footer() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set_title(String::from("Foo title"));
	tag.set_artist(String::from("Bar artist"));
	tag.set_flags(Id3v2TagFlags {
		crc: true,
		footer: true,
		..Id3v2TagFlags::default()
	});

	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::default()).unwrap();

	let header = Id3v2Header::parse(&mut &bytes[..]).unwrap().unwrap();
	assert!(header.flags.footer);
	assert!(header.flags.crc);
	assert_eq!(header.full_tag_size() as usize, bytes.len());

	let re_read = read_tag(&bytes);
	assert_eq!(re_read.title().as_deref(), Some("Foo title"));
	assert_eq!(re_read.artist().as_deref(), Some("Bar artist"));
}

#[test_log::test]
fn older_versions_ignore_v24_flags() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set_title(String::from("Foo title"));
	tag.set_flags(Id3v2TagFlags {
		crc: true,
		footer: true,
		..Id3v2TagFlags::default()
	});

	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::new().preferred_padding(0))
		.unwrap();

	// Header + TIT2
	assert_eq!(bytes.len(), 10 + 10 + 10);
	assert_eq!(bytes[5], 0);
}

#[test_log::test]
fn insert_and_push() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	let title = |value: &str| {
		Frame::Text(TextInformationFrame::new(
			FrameId::new("TIT2").unwrap(),
			TextEncoding::Latin1,
			value,
		))
	};

	assert!(tag.insert(title("Foo")).is_none());
	let replaced = tag.insert(title("Bar")).unwrap();
	assert_eq!(replaced, title("Foo"));
	assert_eq!(tag.len(), 1);
	assert_eq!(tag.title().as_deref(), Some("Bar"));

	tag.push(title("Baz"));
	assert_eq!(tag.len(), 2);
	assert_eq!(tag.get_frames(&FrameId::new("TIT2").unwrap()).count(), 2);

	assert_eq!(tag.remove(&FrameId::new("TIT2").unwrap()).count(), 2);
	assert!(tag.is_empty());
}

#[test_log::test]
fn comments_with_descriptions() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.push(Frame::Comment(CommentFrame::new(
		Id3v2Version::V3,
		TextEncoding::Latin1,
		DEFAULT_LANGUAGE,
		"",
		"Qux comment",
	)));
	tag.push(Frame::Comment(CommentFrame::new(
		Id3v2Version::V3,
		TextEncoding::Latin1,
		DEFAULT_LANGUAGE,
		"Songs-DB_Custom1",
		"Quux",
	)));

	let re_read = dump_and_re_read(&tag, WriteOptions::default());
	assert_eq!(re_read.comments().count(), 1);
	assert_eq!(re_read.comment().as_deref(), Some("Qux comment"));
	assert_eq!(re_read.get_first(FieldKey::Custom1).as_deref(), Some("Quux"));
}

#[test_log::test]
fn user_text() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	assert!(
		tag.insert_user_text(String::from("FOO"), String::from("Bar"))
			.is_none()
	);
	assert!(
		tag.insert_user_text(String::from("FOO"), String::from("Baz"))
			.is_some()
	);
	assert_eq!(tag.get_user_text("FOO"), Some("Baz"));

	let re_read = dump_and_re_read(&tag, WriteOptions::default());
	assert_eq!(re_read.get_user_text("FOO"), Some("Baz"));

	assert!(tag.remove_user_text("FOO").is_some());
	assert!(tag.is_empty());
}

#[test_log::test]
fn number_accessors() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set_track(3);
	tag.set_track_total(12);
	tag.set_disk(1);

	assert_eq!(tag.get_text(&FrameId::new("TRCK").unwrap()), Some("3/12"));
	assert_eq!(tag.get_text(&FrameId::new("TPOS").unwrap()), Some("1"));

	tag.remove_track();
	assert_eq!(tag.get_text(&FrameId::new("TRCK").unwrap()), Some("0/12"));
	assert_eq!(tag.track(), None);
	assert_eq!(tag.track_total(), Some(12));

	let re_read = dump_and_re_read(&tag, WriteOptions::default());
	assert_eq!(re_read.track_total(), Some(12));
	assert_eq!(re_read.disk(), Some(1));
	assert_eq!(re_read.disk_total(), None);
}

#[test_log::test]
fn encodings_are_downgraded_when_written() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.push(Frame::Text(TextInformationFrame::new(
		FrameId::new("TIT2").unwrap(),
		TextEncoding::UTF8,
		"Fōō title",
	)));

	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::default()).unwrap();

	// Encoding byte of the first frame
	assert_eq!(bytes[20], TextEncoding::UTF16 as u8);

	let re_read = read_tag(&bytes);
	assert_eq!(re_read.title().as_deref(), Some("Fōō title"));
}

#[test_log::test]
fn android_compatible() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.push(Frame::Text(TextInformationFrame::new(
		FrameId::new("TIT2").unwrap(),
		TextEncoding::UTF16,
		"Foo title",
	)));

	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::new().android_compatible(true))
		.unwrap();

	assert_eq!(bytes[20], TextEncoding::Latin1 as u8);
	assert_eq!(&bytes[21..30], b"Foo title");
}
