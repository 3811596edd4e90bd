use crate::config::ParsingMode;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{
	AttachedPictureFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame, KeyValueFrame,
	PopularimeterFrame, PrivateFrame, TextInformationFrame, UniqueFileIdentifierFrame,
	UnsynchronizedTextFrame, UrlLinkFrame,
};
use crate::id3::v2::{BinaryFrame, Frame, FrameFlags, FrameId};
use crate::macros::{err, id3v2_err};
use crate::util::text::TextEncoding;

use std::io::Read;

#[rustfmt::skip]
pub(super) fn parse_content<R: Read>(
	reader: &mut R,
	id: FrameId,
	flags: FrameFlags,
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<Option<Frame>> {
	log::trace!("ID3v2: Parsing frame content for ID: {}", id);

	Ok(match id.as_str() {
		"APIC" | "PIC" => Some(Frame::Picture(AttachedPictureFrame::parse(reader, id, flags, version)?)),
		"TXXX" | "TXX" => ExtendedTextFrame::parse(reader, id, flags, version)?.map(Frame::UserText),
		"WXXX" | "WXX" => ExtendedUrlFrame::parse(reader, id, flags, version)?.map(Frame::UserUrl),
		"COMM" | "COM" => CommentFrame::parse(reader, id, flags, version)?.map(Frame::Comment),
		"USLT" | "ULT" => UnsynchronizedTextFrame::parse(reader, id, flags, version)?.map(Frame::UnsynchronizedText),
		"TIPL" | "TMCL" | "IPLS" | "IPL" => KeyValueFrame::parse(reader, id, flags, version)?.map(Frame::KeyValue),
		"UFID" | "UFI" => UniqueFileIdentifierFrame::parse(reader, id, flags, parse_mode)?.map(Frame::UniqueFileIdentifier),
		"PRIV" => PrivateFrame::parse(reader, flags)?.map(Frame::Private),
		"POPM" | "POP" => Some(Frame::Popularimeter(PopularimeterFrame::parse(reader, id, flags)?)),
		i if i.starts_with('T') => TextInformationFrame::parse(reader, id, flags, version)?.map(Frame::Text),
		// Apple proprietary frames
		// GRP1/GP1 (Grouping), MVNM/MVN (Movement Name), MVIN/MVI (Movement Number)
		"GRP1" | "MVNM" | "MVIN" | "GP1" | "MVN" | "MVI" => TextInformationFrame::parse(reader, id, flags, version)?.map(Frame::Text),
		i if i.starts_with('W') => UrlLinkFrame::parse(reader, id, flags)?.map(Frame::Url),
		// SYLT, GEOB, and any unknown frames
		_ => Some(Frame::Binary(BinaryFrame::parse(reader, id, flags)?)),
	})
}

pub(in crate::id3::v2) fn verify_encoding(
	encoding: u8,
	version: Id3v2Version,
) -> Result<TextEncoding> {
	if version != Id3v2Version::V4 && encoding > 1 {
		if version == Id3v2Version::V2 {
			id3v2_err!(V2InvalidTextEncoding);
		}

		// ID3v2.3 only has two encodings, but there are writers that use the ID3v2.4 encodings anyway
		log::warn!("ID3v2: Found an ID3v2.4 text encoding ({encoding}) in an ID3v2.3 frame");
	}

	match TextEncoding::from_u8(encoding) {
		None => err!(TextDecode("Found invalid encoding")),
		Some(e) => Ok(e),
	}
}
