use crate::util::{audio, tag_bytes, temp_file};
use tagsmith::config::{ParseOptions, ParsingMode};
use tagsmith::error::ErrorKind;
use tagsmith::file::extract_raw_tag_bytes;
use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};

fn tag() -> Vec<u8> {
	let mut tag = Id3v2Tag::new(Id3v2Version::V4);
	tag.set_title(String::from("Foo title"));
	tag_bytes(&tag, 64)
}

#[test_log::test]
fn extract_tag() {
	let tag = tag();
	let mut content = tag.clone();
	content.extend(audio(3));

	let file = temp_file(&content);
	let extracted = extract_raw_tag_bytes(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(extracted, tag);
}

#[test_log::test]
fn extract_includes_junk() {
	let tag = tag();
	let mut content = tag.clone();
	content.extend(b"junk");
	content.extend(audio(3));

	let file = temp_file(&content);
	let extracted = extract_raw_tag_bytes(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(extracted.len(), tag.len() + 4);
	assert_eq!(&extracted[tag.len()..], b"junk");
}

#[test_log::test]
fn extract_untagged() {
	let file = temp_file(&audio(3));
	assert!(
		extract_raw_tag_bytes(file.path(), ParseOptions::new())
			.unwrap()
			.is_none()
	);
}

#[test_log::test]
fn extract_without_audio() {
	let tag = tag();
	let mut content = tag.clone();
	content.extend([0; 500]);

	let file = temp_file(&content);

	let err = extract_raw_tag_bytes(
		file.path(),
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
	)
	.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidAudioFrame));

	// Otherwise, the declared size is trusted
	let extracted = extract_raw_tag_bytes(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(extracted, tag);
}
