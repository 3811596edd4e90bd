//! Read, convert, and write ID3 tags in MP3 files.
//!
//! tagsmith handles ID3v2.2, ID3v2.3, and ID3v2.4 tags, along with the ID3v1 trailer. Tags can be
//! edited frame by frame, or through format independent [`FieldKey`](id3::v2::fields::FieldKey)s
//! that map to the right frame in every version.
//!
//! When a file is saved, the ID3v2 tag is rewritten in place. The audio is moved to directly
//! follow the new tag, whether it grew or shrank, and is never rewritten otherwise.
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ```rust,no_run
//! # fn main() -> tagsmith::error::Result<()> {
//! use tagsmith::config::ParseOptions;
//! use tagsmith::file::Mp3File;
//! use tagsmith::id3::v2::fields::FieldKey;
//!
//! let mp3_file = Mp3File::open("test.mp3", ParseOptions::new())?;
//!
//! if let Some(id3v2) = mp3_file.id3v2() {
//! 	println!("Version: {}", id3v2.version());
//! 	println!("Artist: {:?}", id3v2.get_first(FieldKey::Artist));
//! }
//!
//! println!("Audio starts at: {}", mp3_file.mp3_start_byte());
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing and saving
//!
//! ```rust,no_run
//! # fn main() -> tagsmith::error::Result<()> {
//! use tagsmith::config::{ParseOptions, WriteOptions};
//! use tagsmith::file::Mp3File;
//! use tagsmith::id3::v2::Id3v2Version;
//! use tagsmith::id3::v2::fields::FieldKey;
//!
//! let mut mp3_file = Mp3File::open("test.mp3", ParseOptions::new())?;
//!
//! let write_options = WriteOptions::new().id3v2_version(Id3v2Version::V3);
//!
//! let tag = mp3_file.id3v2_or_insert(write_options);
//! tag.set_field(FieldKey::Title, "Foo title")?;
//! tag.add_field(FieldKey::AlbumArtist, "Bar artist")?;
//! tag.add_field(FieldKey::AlbumArtist, "Baz artist")?;
//!
//! mp3_file.save(write_options)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Converting between versions
//!
//! ```rust
//! # fn main() -> tagsmith::error::Result<()> {
//! use tagsmith::id3::v2::convert::convert;
//! use tagsmith::id3::v2::fields::FieldKey;
//! use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};
//!
//! let mut tag = Id3v2Tag::new(Id3v2Version::V2);
//! tag.set_field(FieldKey::Title, "Foo title")?;
//!
//! let v24 = convert(&tag, Id3v2Version::V4);
//! assert_eq!(v24.get_first(FieldKey::Title).as_deref(), Some("Foo title"));
//! # Ok(())
//! # }
//! ```
//!
//! # Important notes
//!
//! A failed save can leave the file half written, since the audio is moved in place. Keep a copy
//! of anything that matters.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod file;
pub(crate) mod macros;
mod util;

pub mod id3;
pub mod mpeg;

pub use util::text::TextEncoding;

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use tagsmith::prelude::*;
	//! ```

	pub use crate::config::{ParseOptions, WriteOptions};
	pub use crate::file::Mp3File;
	pub use crate::id3::v2::fields::FieldKey;
	pub use crate::id3::v2::{Id3v2Tag, Id3v2Version};
}
