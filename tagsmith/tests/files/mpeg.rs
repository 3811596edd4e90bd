use crate::util::{FRAME_LEN, audio, id3v1_bytes, tag_bytes, temp_file};
use tagsmith::config::{ParseOptions, WriteOptions};
use tagsmith::error::ErrorKind;
use tagsmith::file::Mp3File;
use tagsmith::id3::v1::Id3v1Tag;
use tagsmith::id3::v2::fields::FieldKey;
use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};

use std::io::Cursor;

fn sample_tag() -> Id3v2Tag {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.set_field(FieldKey::Title, "Foo title").unwrap();
	tag.set_field(FieldKey::Artist, "Bar artist").unwrap();
	tag.set_field(FieldKey::Album, "Baz album").unwrap();
	tag.set_field(FieldKey::Genre, "Rock").unwrap();
	tag
}

#[test_log::test]
fn read() {
	let tag = tag_bytes(&sample_tag(), 100);

	let mut id3v1 = Id3v1Tag::new();
	id3v1.artist = Some(String::from("Qux artist"));

	let mut content = tag.clone();
	content.extend(audio(10));
	content.extend(id3v1_bytes(&id3v1));

	let file = temp_file(&content);
	let mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();

	assert_eq!(mp3_file.path(), Some(file.path()));
	assert_eq!(mp3_file.mp3_start_byte(), tag.len() as u64);
	assert_eq!(mp3_file.audio_header().number_of_frames(), 10);
	assert_eq!(mp3_file.audio_header().bitrate(), 128);
	assert_eq!(mp3_file.audio_header().sample_rate(), 44100);

	let id3v2 = mp3_file.id3v2().unwrap();
	assert_eq!(id3v2.version(), Id3v2Version::V3);
	assert_eq!(id3v2.get_first(FieldKey::Title).as_deref(), Some("Foo title"));
	assert_eq!(id3v2.get_first(FieldKey::Genre).as_deref(), Some("Rock"));

	assert_eq!(
		mp3_file.id3v1().unwrap().artist.as_deref(),
		Some("Qux artist")
	);
}

#[test_log::test]
fn read_untagged() {
	let file = temp_file(&audio(3));
	let mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();

	assert!(!mp3_file.contains_tag());
	assert_eq!(mp3_file.mp3_start_byte(), 0);
	assert_eq!(mp3_file.audio_header().number_of_frames(), 3);
}

#[test_log::test]
fn read_tag_size_short_by_padding() {
	// The tag claims to end 4 bytes before the audio, and only zeroes sit in between
	let mut content = tag_bytes(&sample_tag(), 0);
	let declared_end = content.len();
	content.extend([0; 4]);
	content.extend(audio(4));

	let mp3_file = Mp3File::read_from(&mut Cursor::new(content), ParseOptions::new()).unwrap();
	assert_eq!(mp3_file.mp3_start_byte(), declared_end as u64 + 4);
	assert_eq!(
		mp3_file
			.id3v2()
			.unwrap()
			.get_first(FieldKey::Artist)
			.as_deref(),
		Some("Bar artist")
	);
}

#[test_log::test]
fn read_junk_between_tag_and_audio() {
	let mut content = tag_bytes(&sample_tag(), 0);
	let declared_end = content.len();
	content.extend([0x20; 4]);
	content.extend(audio(4));

	let mp3_file = Mp3File::read_from(&mut Cursor::new(content), ParseOptions::new()).unwrap();
	assert_eq!(mp3_file.mp3_start_byte(), declared_end as u64 + 4);
	assert_eq!(mp3_file.id3v2().unwrap().len(), 4);
}

#[test_log::test]
fn no_audio() {
	let mut content = tag_bytes(&sample_tag(), 100);
	content.extend([0; 1000]);

	let err = Mp3File::read_from(&mut Cursor::new(content), ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidAudioFrame));
}

#[test_log::test]
fn save_grows_and_shrinks_tag() {
	let original_tag = tag_bytes(&sample_tag(), 100);
	let audio = audio(20);

	let mut content = original_tag.clone();
	content.extend(&audio);

	let file = temp_file(&content);
	let mut mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	let original_start = mp3_file.mp3_start_byte();

	// 50 bytes larger
	mp3_file
		.save(WriteOptions::new().preferred_padding(150))
		.unwrap();
	assert_eq!(mp3_file.mp3_start_byte(), original_start + 50);

	let saved = std::fs::read(file.path()).unwrap();
	assert_eq!(saved.len(), content.len() + 50);
	assert_eq!(&saved[mp3_file.mp3_start_byte() as usize..], &audio[..]);

	// 30 bytes smaller than the original
	mp3_file
		.save(WriteOptions::new().preferred_padding(70))
		.unwrap();
	assert_eq!(mp3_file.mp3_start_byte(), original_start - 30);

	let saved = std::fs::read(file.path()).unwrap();
	assert_eq!(saved.len(), content.len() - 30);
	assert_eq!(&saved[mp3_file.mp3_start_byte() as usize..], &audio[..]);

	// Reading it back gives the same tag
	let reread = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	assert_eq!(reread.mp3_start_byte(), mp3_file.mp3_start_byte());
	assert_eq!(reread.id3v2(), mp3_file.id3v2());
}

#[test_log::test]
fn save_edited_tag() {
	let mut content = tag_bytes(&sample_tag(), 0);
	content.extend(audio(5));

	let file = temp_file(&content);
	let mut mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();

	let tag = mp3_file.id3v2_mut().unwrap();
	tag.set_field(FieldKey::Title, "A much longer title than before")
		.unwrap();
	tag.add_field(FieldKey::AlbumArtist, "Foo").unwrap();
	tag.add_field(FieldKey::AlbumArtist, "Bar").unwrap();
	tag.delete_field(FieldKey::Genre);

	mp3_file.save(WriteOptions::new()).unwrap();

	let reread = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	let tag = reread.id3v2().unwrap();
	assert_eq!(
		tag.get_first(FieldKey::Title).as_deref(),
		Some("A much longer title than before")
	);
	assert_eq!(tag.get_fields(FieldKey::AlbumArtist), ["Foo", "Bar"]);
	assert!(tag.get_first(FieldKey::Genre).is_none());
	assert_eq!(reread.audio_header().number_of_frames(), 5);
}

#[test_log::test]
fn save_strips_tags() {
	let audio = audio(5);

	let mut id3v1 = Id3v1Tag::new();
	id3v1.title = Some(String::from("Foo title"));

	let mut content = tag_bytes(&sample_tag(), 100);
	content.extend(&audio);
	content.extend(id3v1_bytes(&id3v1));

	let file = temp_file(&content);
	let mut mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	mp3_file.remove_id3v2();
	mp3_file.remove_id3v1();
	mp3_file.save(WriteOptions::new()).unwrap();

	assert_eq!(mp3_file.mp3_start_byte(), 0);
	assert_eq!(std::fs::read(file.path()).unwrap(), audio);
}

#[test_log::test]
fn save_new_tag_in_configured_version() {
	let file = temp_file(&audio(5));
	let mut mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();

	let write_options = WriteOptions::new()
		.id3v2_version(Id3v2Version::V3)
		.genres_as_text(false);
	mp3_file
		.id3v2_or_insert(write_options)
		.set_field(FieldKey::Genre, "Rock")
		.unwrap();
	mp3_file.save(write_options).unwrap();

	let saved = std::fs::read(file.path()).unwrap();
	assert_eq!(&saved[..4], b"ID3\x03");

	// The genre is written as a numeric reference
	let tcon = saved.windows(4).position(|w| w == b"TCON").unwrap();
	assert_eq!(&saved[tcon + 11..tcon + 15], b"(17)");

	let reread = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	assert_eq!(
		reread
			.id3v2()
			.unwrap()
			.get_first(FieldKey::Genre)
			.as_deref(),
		Some("Rock")
	);
}

#[test_log::test]
fn save_without_path() {
	let mut mp3_file =
		Mp3File::read_from(&mut Cursor::new(audio(2)), ParseOptions::new()).unwrap();

	let err = mp3_file.save(WriteOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileNotFound));
}

#[test_log::test]
fn save_to_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let mut mp3_file =
		Mp3File::read_from(&mut Cursor::new(audio(2)), ParseOptions::new()).unwrap();

	let err = mp3_file
		.save_to_path(dir.path().join("missing.mp3"), WriteOptions::new())
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileNotFound));
}

#[test_log::test]
fn save_to_read_only_file() {
	let content = audio(2);
	let file = temp_file(&content);
	let mut mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	mp3_file
		.id3v2_or_insert(WriteOptions::new())
		.set_field(FieldKey::Title, "Foo title")
		.unwrap();

	let mut permissions = std::fs::metadata(file.path()).unwrap().permissions();
	permissions.set_readonly(true);
	std::fs::set_permissions(file.path(), permissions).unwrap();

	let err = mp3_file.save(WriteOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::ReadOnlyFile));

	assert_eq!(std::fs::read(file.path()).unwrap(), content);
	assert_eq!(mp3_file.mp3_start_byte(), 0);
}

#[test_log::test]
fn save_to_small_file() {
	let content = audio(1);
	let file = temp_file(&content);
	let mut mp3_file = Mp3File::open(file.path(), ParseOptions::new()).unwrap();
	mp3_file
		.id3v2_or_insert(WriteOptions::new())
		.set_field(FieldKey::Title, "Foo title")
		.unwrap();

	let err = mp3_file
		.save(WriteOptions::new().minimum_file_size(FRAME_LEN as u64))
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileTooSmall { .. }));

	assert_eq!(std::fs::read(file.path()).unwrap(), content);
}
