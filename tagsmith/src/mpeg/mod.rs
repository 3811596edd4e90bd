//! MPEG audio items
//!
//! Only as much of the audio stream is decoded as is needed to find where it starts, and to
//! describe its first frame. See [`find_audio_frame`] and [`AudioHeader`].

mod constants;
mod header;
mod properties;
mod read;
pub(crate) mod resolve;

pub use header::{ChannelMode, FrameHeader, Layer, MpegVersion};
pub use properties::AudioHeader;
pub use read::find_audio_frame;

pub(crate) use read::read_audio_header;
