use super::frame::Frame;
use super::frame::read::ParsedFrame;
use super::header::Id3v2Header;
use super::tag::Id3v2Tag;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::util::synchsafe::UnsynchronizedStream;

use std::io::Read;

/// Read the frames of a tag
///
/// The reader is expected to be positioned right after the header (and extended header). The entire
/// tag content is consumed, including padding.
pub(crate) fn parse_id3v2<R>(
	bytes: &mut R,
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag>
where
	R: Read,
{
	log::debug!(
		"ID3v2: Parsing tag, size: {}, version: {}",
		header.size,
		header.version
	);

	let mut tag_bytes = bytes.take(u64::from(header.content_size()));

	let ret;
	if header.flags.unsynchronisation {
		// Unsynchronize the entire tag
		let mut unsynchronized_reader = UnsynchronizedStream::new(tag_bytes);
		ret = read_all_frames_into_tag(&mut unsynchronized_reader, header, parse_options)?;

		// Get the `Take` back from the `UnsynchronizedStream`
		tag_bytes = unsynchronized_reader.into_inner();
	} else {
		ret = read_all_frames_into_tag(&mut tag_bytes, header, parse_options)?;
	};

	// Throw away the rest of the tag (padding, bad frames)
	std::io::copy(&mut tag_bytes, &mut std::io::sink())?;
	Ok(ret)
}

fn read_all_frames_into_tag<R>(
	reader: &mut R,
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag>
where
	R: Read,
{
	let mut frames: Vec<Frame> = Vec::new();

	loop {
		match ParsedFrame::read(reader, header.version, parse_options)? {
			ParsedFrame::Next(frame) => {
				// Superfluous duplicates that follow the first frame are often empty
				if frame.is_empty() == Some(true)
					&& frames
						.iter()
						.any(|existing| existing == &frame && existing.is_empty() == Some(false))
				{
					log::warn!(
						"ID3v2: Discarding empty frame with ID \"{}\", a non-empty one already \
						 exists",
						frame.id()
					);
					continue;
				}

				frames.push(frame);
			},
			// No frame content found or ignored due to errors, but we can expect more frames
			ParsedFrame::Skip => {},
			// No frame content found, and we can expect there are no more frames
			ParsedFrame::Eof => break,
		}
	}

	Ok(Id3v2Tag::with_frames(header.version, header.flags, frames))
}
