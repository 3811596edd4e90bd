use crate::config::{ParseOptions, WriteOptions};
use crate::error::{ErrorKind, Result, TagsmithError};
use crate::id3::v1::Id3v1Tag;
use crate::id3::v1::write::write_id3v1;
use crate::id3::v2::convert::convert;
use crate::id3::v2::read::parse_id3v2;
use crate::id3::v2::write::write_id3v2;
use crate::id3::v2::{Id3v2Header, Id3v2Tag, Id3v2Version};
use crate::id3::{find_id3v1, find_id3v1_offset};
use crate::macros::err;
use crate::mpeg::resolve::resolve_audio_start;
use crate::mpeg::{AudioHeader, read_audio_header};
use crate::util::io::{FileLike, FileOperator, Length, Truncate};

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

/// An MP3 file
///
/// ## Reading
///
/// The ID3v2 header's declared size is only a hint. The audio is searched for starting at the end
/// of the declared tag, and if it isn't found there, the file is searched from the start as well.
/// The tag is then read from every byte ahead of the audio, so a tag that claims to be larger than
/// it is can't swallow audio frames.
///
/// ## Saving
///
/// The ID3v2 tag is rewritten at the start of the file, and the audio is moved to directly follow
/// it. The ID3v1 tag is written to (or removed from) the end of the file separately. See
/// [`Mp3File::save_to`].
#[derive(Debug, Clone)]
pub struct Mp3File {
	path: Option<PathBuf>,
	id3v2_tag: Option<Id3v2Tag>,
	id3v1_tag: Option<Id3v1Tag>,
	audio_header: AudioHeader,
}

impl Mp3File {
	/// Read an MP3 file from a reader
	///
	/// # Errors
	///
	/// * The ID3v2 header is invalid
	/// * A tag fails to parse, depending on the [`ParsingMode`](crate::config::ParsingMode)
	/// * No audio frame can be found ([`ErrorKind::InvalidAudioFrame`])
	/// * The reader fails
	///
	/// # Examples
	///
	/// ```rust
	/// use std::io::Cursor;
	/// use tagsmith::config::ParseOptions;
	/// use tagsmith::file::Mp3File;
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
	/// frame.resize(417, 0);
	/// let audio = frame.repeat(3);
	///
	/// let file = Mp3File::read_from(&mut Cursor::new(audio), ParseOptions::new())?;
	///
	/// assert!(file.id3v2().is_none());
	/// assert_eq!(file.mp3_start_byte(), 0);
	/// assert_eq!(file.audio_header().number_of_frames(), 3);
	/// # Ok(()) }
	/// ```
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let mut reader = FileOperator::new(reader)?;

		reader.get_mut().rewind()?;
		let header = Id3v2Header::parse(reader.get_mut())?;

		let audio_end = find_id3v1_offset(reader.get_mut())?.unwrap_or(reader.len());

		let mut id3v1_tag = None;
		if parse_options.read_id3v1 {
			id3v1_tag = find_id3v1(reader.get_mut(), parse_options.parsing_mode)?;
		}

		let audio_header = match &header {
			Some(header) => {
				let expected_start = u64::from(header.full_tag_size());
				resolve_audio_start(&mut reader, expected_start, audio_end)?
			},
			None => match read_audio_header(reader.get_mut(), 0, audio_end)? {
				Some(audio_header) => audio_header,
				None => err!(InvalidAudioFrame),
			},
		};

		log::debug!("Audio starts at {:#X}", audio_header.mp3_start_byte());

		let mut id3v2_tag = None;
		if let Some(header) = header.filter(|_| parse_options.read_id3v2) {
			let tag_region = reader.read_at(0, audio_header.mp3_start_byte())?;

			// The header was already validated, skip it
			let mut content = &tag_region[..];
			if Id3v2Header::parse(&mut content)?.is_some() {
				id3v2_tag = Some(parse_id3v2(&mut content, header, parse_options)?);
			}
		}

		Ok(Self {
			path: None,
			id3v2_tag,
			id3v1_tag,
			audio_header,
		})
	}

	/// Read an MP3 file from a path
	///
	/// The path is remembered for [`Mp3File::save`]. The file is closed before returning.
	///
	/// # Errors
	///
	/// * `path` does not exist, or can't be read
	/// * See [`Mp3File::read_from`]
	pub fn open<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		log::debug!("Opening {}", path.display());

		let mut reader = BufReader::new(File::open(path)?);
		let mut mp3_file = Self::read_from(&mut reader, parse_options)?;
		mp3_file.path = Some(path.to_path_buf());

		Ok(mp3_file)
	}

	/// The path this file was opened from, if any
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Save the tags back to the path this file was opened from
	///
	/// # Errors
	///
	/// * The file was not opened from a path ([`ErrorKind::FileNotFound`])
	/// * See [`Mp3File::save_to_path`]
	pub fn save(&mut self, write_options: WriteOptions) -> Result<()> {
		let Some(path) = self.path.clone() else {
			err!(FileNotFound);
		};

		self.save_to_path(path, write_options)
	}

	/// Save the tags to a path
	///
	/// The path is expected to hold the same audio this file was read from. Nothing is written unless
	/// every check passes.
	///
	/// # Errors
	///
	/// * `path` does not exist ([`ErrorKind::FileNotFound`])
	/// * `path` is read only, and [`WriteOptions::respect_read_only`] is set ([`ErrorKind::ReadOnlyFile`])
	/// * See [`Mp3File::save_to`]
	pub fn save_to_path<P>(&mut self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();

		let metadata = match std::fs::metadata(path) {
			Ok(metadata) => metadata,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				log::error!("Unable to save, {} does not exist", path.display());
				err!(FileNotFound);
			},
			Err(e) => return Err(e.into()),
		};

		if write_options.respect_read_only && metadata.permissions().readonly() {
			log::error!("Unable to save, {} is read only", path.display());
			err!(ReadOnlyFile);
		}

		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.save_to(&mut file, write_options)
	}

	/// Save the tags to a file
	///
	/// Saving happens in two steps. The new ID3v2 tag is fully serialized first, then the audio is
	/// moved to fit it, and the tag is written ahead of it. An empty (or missing) ID3v2 tag strips
	/// the tag from the file.
	///
	/// If [`WriteOptions::write_id3v1`] is set, the ID3v1 tag is written afterwards, or removed if
	/// this file has none.
	///
	/// On success, [`Mp3File::mp3_start_byte`] reflects the new position of the audio.
	///
	/// NOTE: An I/O error while moving the audio leaves the file in an undefined state. Work on a
	///       copy if the original must survive.
	///
	/// # Errors
	///
	/// * The file is not larger than [`WriteOptions::minimum_file_size`] ([`ErrorKind::FileTooSmall`])
	/// * A tag fails to serialize
	/// * The file fails to be read or written
	///
	/// # Examples
	///
	/// ```rust
	/// use std::io::Cursor;
	/// use tagsmith::config::{ParseOptions, WriteOptions};
	/// use tagsmith::file::Mp3File;
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
	/// frame.resize(417, 0);
	/// let mut file = Cursor::new(frame.repeat(3));
	///
	/// let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new())?;
	///
	/// let write_options = WriteOptions::new().preferred_padding(0);
	/// mp3_file
	/// 	.id3v2_or_insert(write_options)
	/// 	.set_title(String::from("Foo title"));
	/// mp3_file.save_to(&mut file, write_options)?;
	///
	/// // Header (10) + TIT2 frame (20)
	/// assert_eq!(mp3_file.mp3_start_byte(), 30);
	/// assert_eq!(file.get_ref().len(), 30 + 417 * 3);
	/// # Ok(()) }
	/// ```
	pub fn save_to<F>(&mut self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagsmithError: From<<F as Truncate>::Error>,
		TagsmithError: From<<F as Length>::Error>,
	{
		let file_len = file.len()?;
		if file_len <= write_options.minimum_file_size {
			log::error!(
				"Unable to save, the file is only {file_len} bytes (minimum: {})",
				write_options.minimum_file_size
			);
			return Err(TagsmithError::new(ErrorKind::FileTooSmall {
				size: file_len,
				minimum: write_options.minimum_file_size,
			}));
		}

		let audio_start = self.audio_header.mp3_start_byte;
		if audio_start > file_len {
			log::error!("Unable to save, the file is shorter than the known audio start");
			err!(SizeMismatch);
		}

		let new_audio_start =
			write_id3v2(file, self.id3v2_tag.as_ref(), audio_start, write_options)?;
		self.audio_header.mp3_start_byte = new_audio_start;

		if write_options.write_id3v1 {
			write_id3v1(file, self.id3v1_tag.as_ref(), write_options)?;
		}

		file.flush()?;
		Ok(())
	}

	/// Returns a reference to the ID3v2 tag, if any
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2_tag.as_ref()
	}

	/// Returns a mutable reference to the ID3v2 tag, if any
	pub fn id3v2_mut(&mut self) -> Option<&mut Id3v2Tag> {
		self.id3v2_tag.as_mut()
	}

	/// Returns a mutable reference to the ID3v2 tag, creating an empty one if needed
	///
	/// A new tag uses [`WriteOptions::id3v2_version`].
	pub fn id3v2_or_insert(&mut self, write_options: WriteOptions) -> &mut Id3v2Tag {
		self.id3v2_tag
			.get_or_insert_with(|| Id3v2Tag::new(write_options.id3v2_version))
	}

	/// Replace the ID3v2 tag, returning the previous one
	pub fn set_id3v2(&mut self, tag: Id3v2Tag) -> Option<Id3v2Tag> {
		self.id3v2_tag.replace(tag)
	}

	/// Remove the ID3v2 tag
	///
	/// The tag is stripped from the file on the next save.
	pub fn remove_id3v2(&mut self) -> Option<Id3v2Tag> {
		self.id3v2_tag.take()
	}

	/// The ID3v2 tag, as an ID3v2.4 tag
	///
	/// The tag is only converted if it isn't already ID3v2.4. See [`convert`] for how frames are
	/// carried over.
	pub fn id3v2_as_v24(&self) -> Option<Cow<'_, Id3v2Tag>> {
		let tag = self.id3v2_tag.as_ref()?;
		if tag.version() == Id3v2Version::V4 {
			return Some(Cow::Borrowed(tag));
		}

		Some(Cow::Owned(convert(tag, Id3v2Version::V4)))
	}

	/// Returns a reference to the ID3v1 tag, if any
	pub fn id3v1(&self) -> Option<&Id3v1Tag> {
		self.id3v1_tag.as_ref()
	}

	/// Returns a mutable reference to the ID3v1 tag, if any
	pub fn id3v1_mut(&mut self) -> Option<&mut Id3v1Tag> {
		self.id3v1_tag.as_mut()
	}

	/// Replace the ID3v1 tag, returning the previous one
	pub fn set_id3v1(&mut self, tag: Id3v1Tag) -> Option<Id3v1Tag> {
		self.id3v1_tag.replace(tag)
	}

	/// Remove the ID3v1 tag
	///
	/// The tag is stripped from the file on the next save, if [`WriteOptions::write_id3v1`] is set.
	pub fn remove_id3v1(&mut self) -> Option<Id3v1Tag> {
		self.id3v1_tag.take()
	}

	/// Whether the file has any tags
	pub fn contains_tag(&self) -> bool {
		self.id3v2_tag.is_some() || self.id3v1_tag.is_some()
	}

	/// Returns the audio header of the first frame
	pub fn audio_header(&self) -> &AudioHeader {
		&self.audio_header
	}

	/// The offset of the first audio frame
	///
	/// This is kept up to date across saves.
	pub fn mp3_start_byte(&self) -> u64 {
		self.audio_header.mp3_start_byte
	}
}

#[cfg(test)]
mod tests {
	use super::Mp3File;
	use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	use crate::error::ErrorKind;
	use crate::id3::v1::Id3v1Tag;
	use crate::id3::v2::fields::FieldKey;
	use crate::id3::v2::{Id3v2Tag, Id3v2Version};

	use std::io::Cursor;

	const FRAME_128K: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

	fn audio(frames: usize) -> Vec<u8> {
		let mut frame = FRAME_128K.to_vec();
		frame.resize(417, 0x55);
		frame.repeat(frames)
	}

	fn tagged(version: Id3v2Version, padding: u32) -> Vec<u8> {
		let mut tag = Id3v2Tag::new(version);
		tag.set_title(String::from("Foo title"));
		tag.set_artist(String::from("Bar artist"));

		let mut bytes = Vec::new();
		tag.dump_to(&mut bytes, WriteOptions::new().preferred_padding(padding))
			.unwrap();
		bytes.extend(audio(4));
		bytes
	}

	#[test_log::test]
	fn read_tagged() {
		let bytes = tagged(Id3v2Version::V3, 100);
		let tag_len = bytes.len() - 417 * 4;

		let file = Mp3File::read_from(&mut Cursor::new(bytes), ParseOptions::new()).unwrap();
		assert_eq!(file.mp3_start_byte(), tag_len as u64);
		assert_eq!(file.audio_header().number_of_frames(), 4);

		let tag = file.id3v2().unwrap();
		assert_eq!(tag.version(), Id3v2Version::V3);
		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert!(file.id3v1().is_none());
	}

	#[test_log::test]
	fn skip_tags() {
		let mut bytes = tagged(Id3v2Version::V4, 0);
		bytes.extend(b"TAG");
		bytes.resize(bytes.len() + 125, 0);

		let file = Mp3File::read_from(
			&mut Cursor::new(bytes.clone()),
			ParseOptions::new().read_id3v2(false).read_id3v1(false),
		)
		.unwrap();
		assert!(!file.contains_tag());
		// The tag is still used to find the audio
		assert_eq!(file.audio_header().number_of_frames(), 4);

		let file = Mp3File::read_from(&mut Cursor::new(bytes), ParseOptions::new()).unwrap();
		assert!(file.id3v2().is_some());
		assert!(file.id3v1().is_some());
	}

	#[test_log::test]
	fn oversized_tag_is_bounded_by_audio() {
		let mut bytes = tagged(Id3v2Version::V3, 0);
		let tag_len = bytes.len() - 417 * 4;

		// Every frame agrees on the frame count
		let mut info = b"Info".to_vec();
		info.extend([0, 0, 0, 3]);
		info.extend(4_u32.to_be_bytes());
		info.extend(1668_u32.to_be_bytes());
		for i in 0..4 {
			let info_start = tag_len + i * 417 + 36;
			bytes[info_start..info_start + info.len()].copy_from_slice(&info);
		}

		// Claim 200 extra bytes, running into the audio
		let size = (tag_len - 10 + 200) as u32;
		bytes[8] = (size >> 7) as u8;
		bytes[9] = (size & 0x7F) as u8;

		let file = Mp3File::read_from(
			&mut Cursor::new(bytes),
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		)
		.unwrap();
		assert_eq!(file.mp3_start_byte(), tag_len as u64);
		assert_eq!(file.id3v2().unwrap().len(), 2);
	}

	#[test_log::test]
	fn no_audio() {
		let err = Mp3File::read_from(&mut Cursor::new(vec![0; 1000]), ParseOptions::new())
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::InvalidAudioFrame));
	}

	#[test_log::test]
	fn save_moves_audio() {
		let bytes = tagged(Id3v2Version::V3, 100);
		let original_start = (bytes.len() - 417 * 4) as u64;

		let mut file = Cursor::new(bytes);
		let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();

		// 50 more bytes of padding
		let write_options = WriteOptions::new().preferred_padding(150);
		mp3_file.save_to(&mut file, write_options).unwrap();
		assert_eq!(mp3_file.mp3_start_byte(), original_start + 50);
		assert_eq!(
			&file.get_ref()[mp3_file.mp3_start_byte() as usize..],
			&audio(4)[..]
		);

		// 30 fewer
		let write_options = WriteOptions::new().preferred_padding(70);
		mp3_file.save_to(&mut file, write_options).unwrap();
		assert_eq!(mp3_file.mp3_start_byte(), original_start - 30);
		assert_eq!(file.get_ref().len() as u64, original_start - 30 + 417 * 4);

		let reread = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
		assert_eq!(reread.mp3_start_byte(), mp3_file.mp3_start_byte());
		assert_eq!(reread.id3v2(), mp3_file.id3v2());
	}

	#[test_log::test]
	fn save_strips_tags() {
		let mut bytes = tagged(Id3v2Version::V4, 10);
		let mut id3v1 = Id3v1Tag::new();
		id3v1.title = Some(String::from("Foo title"));
		id3v1.dump_to(&mut bytes, WriteOptions::new()).unwrap();

		let mut file = Cursor::new(bytes);
		let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
		assert!(mp3_file.id3v1().is_some());

		mp3_file.remove_id3v2();
		mp3_file.remove_id3v1();
		mp3_file.save_to(&mut file, WriteOptions::new()).unwrap();

		assert_eq!(mp3_file.mp3_start_byte(), 0);
		assert_eq!(file.into_inner(), audio(4));
	}

	#[test_log::test]
	fn id3v1_left_alone() {
		let mut bytes = audio(4);
		let mut id3v1 = Id3v1Tag::new();
		id3v1.title = Some(String::from("Foo title"));
		id3v1.dump_to(&mut bytes, WriteOptions::new()).unwrap();

		let mut file = Cursor::new(bytes.clone());
		let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
		mp3_file.remove_id3v1();

		mp3_file
			.save_to(&mut file, WriteOptions::new().write_id3v1(false))
			.unwrap();
		assert_eq!(file.into_inner(), bytes);
	}

	#[test_log::test]
	fn too_small() {
		let mut file = Cursor::new(audio(1));
		let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();

		let err = mp3_file
			.save_to(&mut file, WriteOptions::new().minimum_file_size(417))
			.unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::FileTooSmall {
				size: 417,
				minimum: 417
			}
		));

		// Nothing was touched
		assert_eq!(file.into_inner(), audio(1));
	}

	#[test_log::test]
	fn new_tag_version() {
		let mut file = Cursor::new(audio(2));
		let mut mp3_file = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();

		let tag = mp3_file.id3v2_or_insert(WriteOptions::new().id3v2_version(Id3v2Version::V3));
		assert_eq!(tag.version(), Id3v2Version::V3);
		tag.set_field(FieldKey::Mood, "Calm").unwrap();

		let v24 = mp3_file.id3v2_as_v24().unwrap();
		assert_eq!(v24.version(), Id3v2Version::V4);
		assert_eq!(v24.get_first(FieldKey::Mood).as_deref(), Some("Calm"));

		// Already ID3v2.4
		mp3_file.set_id3v2(Id3v2Tag::new(Id3v2Version::V4));
		assert!(matches!(
			mp3_file.id3v2_as_v24(),
			Some(std::borrow::Cow::Borrowed(_))
		));
	}
}
