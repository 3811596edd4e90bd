use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::hash::{Hash, Hasher};
use std::io::Read;

/// An `ID3v2` URL frame
#[derive(Clone, Debug, Eq)]
pub struct UrlLinkFrame {
	pub(crate) header: FrameHeader,
	pub(crate) content: String,
}

impl PartialEq for UrlLinkFrame {
	fn eq(&self, other: &Self) -> bool {
		self.header.id == other.header.id && self.content == other.content
	}
}

impl Hash for UrlLinkFrame {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.header.id.hash(state);
		self.content.hash(state);
	}
}

impl UrlLinkFrame {
	/// Create a new [`UrlLinkFrame`]
	///
	/// The URL is always stored as ISO-8859-1.
	pub fn new(id: FrameId, content: impl Into<String>) -> Self {
		Self {
			header: FrameHeader::new(id, FrameFlags::default()),
			content: content.into(),
		}
	}

	/// Read an [`UrlLinkFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text as [`TextEncoding::Latin1`]
	pub fn parse<R>(reader: &mut R, id: FrameId, frame_flags: FrameFlags) -> Result<Option<Self>>
	where
		R: Read,
	{
		let url = decode_text(
			reader,
			TextDecodeOptions::new().encoding(TextEncoding::Latin1),
		)?;
		if url.bytes_read == 0 {
			return Ok(None);
		}

		let header = FrameHeader::new(id, frame_flags);
		Ok(Some(UrlLinkFrame {
			header,
			content: url.content,
		}))
	}

	/// Convert an [`UrlLinkFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the URL isn't ISO-8859-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		Ok(TextEncoding::Latin1.encode(&self.content, false, write_options.lossy_text_encoding)?)
	}

	/// Get the URL of the frame
	pub fn url(&self) -> &str {
		&self.content
	}

	/// Change the URL of the frame
	///
	/// If `content` is not valid ISO-8859-1, it will be rejected and the frame left unchanged.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::{FrameId, UrlLinkFrame};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut frame = UrlLinkFrame::new(FrameId::new("WOAR")?, "https://example.com");
	///
	/// assert!(!frame.set_url(String::from("https://\u{4f8b}.com")));
	/// assert!(frame.set_url(String::from("https://example.org")));
	/// assert_eq!(frame.url(), "https://example.org");
	/// # Ok(()) }
	/// ```
	pub fn set_url(&mut self, url: String) -> bool {
		if TextEncoding::verify_latin1(&url) {
			self.content = url;
			return true;
		}

		false
	}
}
