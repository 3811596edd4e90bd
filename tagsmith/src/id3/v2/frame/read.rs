use super::Frame;
use super::header::parse::{parse_header, parse_v2_header};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::id3::v2::frame::content::parse_content;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, UnsynchronizedStream};
use crate::id3::v2::{BinaryFrame, FrameFlags, FrameHeader, FrameId};
use crate::macros::{id3v2_err, try_vec};

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

pub(crate) enum ParsedFrame {
	Next(Frame),
	Skip,
	Eof,
}

impl ParsedFrame {
	pub(crate) fn read<R>(
		reader: &mut R,
		version: Id3v2Version,
		parse_options: ParseOptions,
	) -> Result<Self>
	where
		R: Read,
	{
		let mut size = 0u32;

		let parse_header_result = match version {
			Id3v2Version::V2 => parse_v2_header(reader, &mut size),
			Id3v2Version::V3 | Id3v2Version::V4 => parse_header(reader, &mut size, version),
		};
		let (id, mut flags) = match parse_header_result {
			Ok(None) => {
				// Stop reading
				return Ok(Self::Eof);
			},
			Ok(Some(some)) => some,
			Err(err) => {
				match parse_options.parsing_mode {
					ParsingMode::Strict => return Err(err),
					ParsingMode::BestAttempt | ParsingMode::Relaxed => {
						log::warn!("ID3v2: Failed to read frame header, skipping: {}", err);

						// Skip this frame and continue reading
						skip_frame(reader, size)?;
						return Ok(Self::Skip);
					},
				}
			},
		};

		if size == 0 {
			if parse_options.parsing_mode == ParsingMode::Strict {
				id3v2_err!(BadFrame(id.to_string(), "frame has a size of 0"));
			}

			log::debug!("ID3v2: Encountered a zero length frame ({id}), skipping");
			return Ok(Self::Skip);
		}

		// The additional frame data is in the order of the flags, which differs between versions
		//
		// ID3v2.3: decompressed size -> encryption method -> group identifier
		// ID3v2.4: group identifier -> encryption method -> data length indicator
		if version == Id3v2Version::V3 {
			read_data_length_indicator(reader, &mut size, &mut flags, version)?;
			read_encryption_method(reader, &mut size, &mut flags, parse_options.parsing_mode)?;
			read_group_identifier(reader, &mut size, &mut flags)?;
		} else {
			read_group_identifier(reader, &mut size, &mut flags)?;
			read_encryption_method(reader, &mut size, &mut flags, parse_options.parsing_mode)?;
			read_data_length_indicator(reader, &mut size, &mut flags, version)?;
		}

		// Frames must have at least 1 byte, *after* all of the additional data flags can provide
		if size == 0 {
			id3v2_err!(BadFrameLength);
		}

		// Restrict the reader to the frame content
		let mut reader = reader.take(u64::from(size));

		// Encrypted frames can't be decoded, the content is kept exactly as it was read
		if flags.encryption.is_some() {
			return handle_encryption(&mut reader, size, id, flags, version);
		}

		// The flags are applied in the order unsynchronisation -> compression
		let mut content_reader: Box<dyn Read + '_> = match flags {
			FrameFlags {
				unsynchronisation: true,
				compression: true,
				..
			} => handle_compression(UnsynchronizedStream::new(reader))?,
			FrameFlags {
				unsynchronisation: true,
				..
			} => Box::new(UnsynchronizedStream::new(reader)),
			FrameFlags {
				compression: true, ..
			} => handle_compression(reader)?,
			_ => Box::new(reader),
		};

		parse_frame(
			&mut content_reader,
			id,
			flags,
			version,
			parse_options.parsing_mode,
		)
	}
}

#[cfg(feature = "id3v2_compression_support")]
#[allow(clippy::unnecessary_wraps)]
fn handle_compression<'a, R: Read + 'a>(reader: R) -> Result<Box<dyn Read + 'a>> {
	Ok(Box::new(flate2::read::ZlibDecoder::new(reader)))
}

#[cfg(not(feature = "id3v2_compression_support"))]
fn handle_compression<'a, R: Read + 'a>(_: R) -> Result<Box<dyn Read + 'a>> {
	id3v2_err!(CompressedFrameEncountered)
}

fn read_group_identifier<R: Read>(
	reader: &mut R,
	size: &mut u32,
	flags: &mut FrameFlags,
) -> Result<()> {
	if let Some(group) = flags.grouping_identity.as_mut() {
		log::trace!("Reading group identifier");

		if *size < 1 {
			id3v2_err!(BadFrameLength);
		}

		*group = reader.read_u8()?;
		*size -= 1;
	}

	Ok(())
}

fn read_encryption_method<R: Read>(
	reader: &mut R,
	size: &mut u32,
	flags: &mut FrameFlags,
	parsing_mode: ParsingMode,
) -> Result<()> {
	if let Some(enc) = flags.encryption.as_mut() {
		log::trace!("Reading encryption method symbol");

		if *size < 1 {
			id3v2_err!(BadFrameLength);
		}

		*enc = reader.read_u8()?;
		*size -= 1;

		if *enc < 0x80 && parsing_mode == ParsingMode::Strict {
			id3v2_err!(InvalidEncryptionMethodSymbol(*enc));
		}
	}

	Ok(())
}

// ID3v2.3 only stores this for compressed frames, as a plain u32
fn read_data_length_indicator<R: Read>(
	reader: &mut R,
	size: &mut u32,
	flags: &mut FrameFlags,
	version: Id3v2Version,
) -> Result<()> {
	if flags.data_length_indicator.is_some() || flags.compression {
		log::trace!("Reading data length indicator");

		if *size < 4 {
			id3v2_err!(BadFrameLength);
		}

		let mut len = reader.read_u32::<BigEndian>()?;
		if version == Id3v2Version::V4 {
			len = len.unsynch();
		}

		flags.data_length_indicator = Some(len);
		*size -= 4;
	}

	Ok(())
}

fn handle_encryption<R: Read>(
	reader: &mut R,
	size: u32,
	id: FrameId,
	flags: FrameFlags,
	version: Id3v2Version,
) -> Result<ParsedFrame> {
	if version == Id3v2Version::V4 && flags.data_length_indicator.is_none() {
		id3v2_err!(MissingDataLengthIndicator);
	}

	let mut content = try_vec![0; size as usize];
	reader.read_exact(&mut content)?;

	let encrypted_frame = Frame::Binary(BinaryFrame {
		header: FrameHeader::new(id, flags),
		data: content,
	});

	// Nothing further we can do with encrypted frames
	Ok(ParsedFrame::Next(encrypted_frame))
}

fn parse_frame<R: Read>(
	reader: &mut R,
	id: FrameId,
	flags: FrameFlags,
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<ParsedFrame> {
	let frame = match parse_content(reader, id, flags, version, parse_mode) {
		Ok(frame) => frame,
		Err(err) if parse_mode == ParsingMode::Strict => return Err(err),
		Err(err) => {
			log::warn!("ID3v2: Failed to parse frame content, skipping: {err}");
			None
		},
	};

	// Whatever the frame didn't consume is discarded
	std::io::copy(reader, &mut std::io::sink())?;

	match frame {
		Some(frame) => Ok(ParsedFrame::Next(frame)),
		None => Ok(ParsedFrame::Skip),
	}
}

// Note that this is only ever given the full frame size.
fn skip_frame(reader: &mut impl Read, size: u32) -> Result<()> {
	log::trace!("Skipping frame of size {}", size);

	let size = u64::from(size);
	let mut reader = reader.take(size);
	let skipped = std::io::copy(&mut reader, &mut std::io::sink())?;
	debug_assert!(skipped <= size);

	Ok(())
}
