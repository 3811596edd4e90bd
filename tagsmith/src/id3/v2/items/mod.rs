mod attached_picture_frame;
mod binary_frame;
mod extended_text_frame;
mod extended_url_frame;
mod key_value_frame;
pub(in crate::id3::v2) mod language_frame;
mod popularimeter;
mod private_frame;
mod text_information_frame;
mod unique_file_identifier;
mod url_link_frame;

pub use attached_picture_frame::{AttachedPictureFrame, PICTURE_LINK_MIME_TYPE};
pub use binary_frame::BinaryFrame;
pub use extended_text_frame::ExtendedTextFrame;
pub use extended_url_frame::ExtendedUrlFrame;
pub use key_value_frame::KeyValueFrame;
pub use language_frame::{CommentFrame, DEFAULT_LANGUAGE, UnsynchronizedTextFrame};
pub use popularimeter::PopularimeterFrame;
pub use private_frame::PrivateFrame;
pub use text_information_frame::{TEXT_VALUE_SEPARATOR, TextInformationFrame};
pub(crate) use text_information_frame::encode_with_value;
pub use unique_file_identifier::UniqueFileIdentifierFrame;
pub use url_link_frame::UrlLinkFrame;

use crate::id3::v2::{FrameFlags, FrameId};

macro_rules! impl_header_accessors {
	($($name:ident),+ $(,)?) => {
		$(
			impl $name {
				/// The ID this frame is written with
				pub fn id(&self) -> &FrameId {
					&self.header.id
				}

				/// The flags this frame is written with
				pub fn flags(&self) -> FrameFlags {
					self.header.flags
				}

				/// Replace the frame's flags
				///
				/// Flags that don't exist in the tag's version are ignored when writing.
				pub fn set_flags(&mut self, flags: FrameFlags) {
					self.header.flags = flags;
				}
			}
		)+
	};
}

impl_header_accessors!(
	AttachedPictureFrame,
	BinaryFrame,
	CommentFrame,
	ExtendedTextFrame,
	ExtendedUrlFrame,
	KeyValueFrame,
	PopularimeterFrame,
	PrivateFrame,
	TextInformationFrame,
	UniqueFileIdentifierFrame,
	UnsynchronizedTextFrame,
	UrlLinkFrame,
);
