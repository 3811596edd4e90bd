use tagsmith::config::{ParseOptions, WriteOptions};
use tagsmith::file::Mp3File;
use tagsmith::id3::v1::Id3v1Tag;

use std::io::Cursor;

fn audio() -> Vec<u8> {
	let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
	frame.resize(417, 0x33);
	frame.repeat(2)
}

#[test_log::test]
fn write_new_tag() {
	let mut file = Cursor::new(audio());
	let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
	assert!(mp3_file.id3v1().is_none());

	let mut tag = Id3v1Tag::new();
	tag.title = Some(String::from("Foo title"));
	tag.year = Some(1999);
	tag.set_genre(String::from("Rock"));
	tag.set_track(5);
	mp3_file.set_id3v1(tag);

	mp3_file.save_to(&mut file, WriteOptions::new()).unwrap();

	let bytes = file.get_ref();
	assert_eq!(bytes.len(), audio().len() + 128);

	let trailer = &bytes[bytes.len() - 128..];
	assert_eq!(&trailer[..3], b"TAG");
	assert_eq!(&trailer[3..12], b"Foo title");
	assert_eq!(&trailer[93..97], b"1999");
	// ID3v1.1 track number
	assert_eq!(trailer[125], 0);
	assert_eq!(trailer[126], 5);
	assert_eq!(trailer[127], 17);

	let mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
	let tag = mp3_file.id3v1().unwrap();
	assert_eq!(tag.genre().as_deref(), Some("Rock"));
	assert_eq!(tag.track(), Some(5));
	// The trailer isn't mistaken for audio
	assert_eq!(mp3_file.audio_header().number_of_frames(), 2);
}

#[test_log::test]
fn replace_existing_tag() {
	let mut tag = Id3v1Tag::new();
	tag.artist = Some(String::from("Foo artist"));

	let mut content = audio();
	tag.dump_to(&mut content, WriteOptions::new()).unwrap();

	let mut file = Cursor::new(content);
	let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
	mp3_file.id3v1_mut().unwrap().artist = Some(String::from("Bar artist"));
	mp3_file.save_to(&mut file, WriteOptions::new()).unwrap();

	assert_eq!(file.get_ref().len(), audio().len() + 128);

	let mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(
		mp3_file.id3v1().unwrap().artist.as_deref(),
		Some("Bar artist")
	);
}

#[test_log::test]
fn skip_reading() {
	let mut tag = Id3v1Tag::new();
	tag.artist = Some(String::from("Foo artist"));

	let mut content = audio();
	tag.dump_to(&mut content, WriteOptions::new()).unwrap();

	let mp3_file = Mp3File::read_from(
		&mut Cursor::new(content),
		ParseOptions::new().read_id3v1(false),
	)
	.unwrap();
	assert!(mp3_file.id3v1().is_none());
}
