//! Moving tags between ID3v2 versions
//!
//! Every frame of the source tag is either rewritten for the destination version or dropped:
//!
//! * Frames holding a [`FieldKey`] follow the key's mapping. A key that has a dedicated frame in
//!   one version and a reserved-description fallback in the other (ex. `TMOO` and `TXXX:MOOD`) is
//!   rewritten into the other form.
//! * The ID3v2.3 date frames (`TYER`, `TDAT`, `TIME`) are merged into a single `TDRC` timestamp
//!   for ID3v2.4, and split back out when going the other way.
//! * Involved people lists are split into `TIPL` and `TMCL` for ID3v2.4, and joined back into
//!   `IPLS` (`IPL`) for older versions.
//! * Everything else is renamed through the frame ID tables, or carried over with the same ID
//!   when both versions share it.
//!
//! Frames that have no counterpart in the destination version are dropped, see
//! [`convert_with_report`]. Frames are never merged, so two source frames that end up with the same
//! ID are both kept.

use crate::id3::v2::fields::{FieldKey, INVOLVED_PEOPLE_ROLES, new_field_frame};
use crate::id3::v2::{Frame, FrameId, Id3v2Tag, Id3v2Version, KeyValueFrame, TextInformationFrame};
use crate::util::text::TextEncoding;

use std::collections::HashMap;
use std::mem;
use std::sync::OnceLock;

macro_rules! gen_id_tables {
	($($v22_id:literal <=> $v23_id:literal),+ $(,)?) => {
		fn v22_to_v23() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| {
				let mut map = HashMap::new();
				$(
					map.insert($v22_id, $v23_id);
				)+
				map
			})
		}

		fn v23_to_v22() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| {
				let mut map = HashMap::new();
				$(
					map.insert($v23_id, $v22_id);
				)+
				map
			})
		}
	};
}

gen_id_tables!(
	// Standard frames
	"BUF" <=> "RBUF",
	"CNT" <=> "PCNT",
	"COM" <=> "COMM",
	"CRA" <=> "AENC",
	"EQU" <=> "EQUA",
	"ETC" <=> "ETCO",
	"GEO" <=> "GEOB",
	"IPL" <=> "IPLS",
	"LNK" <=> "LINK",
	"MCI" <=> "MCDI",
	"MLL" <=> "MLLT",
	"PIC" <=> "APIC",
	"POP" <=> "POPM",
	"REV" <=> "RVRB",
	"RVA" <=> "RVAD",
	"SLT" <=> "SYLT",
	"STC" <=> "SYTC",
	"TAL" <=> "TALB",
	"TBP" <=> "TBPM",
	"TCM" <=> "TCOM",
	"TCO" <=> "TCON",
	"TCR" <=> "TCOP",
	"TDA" <=> "TDAT",
	"TDY" <=> "TDLY",
	"TEN" <=> "TENC",
	"TFT" <=> "TFLT",
	"TIM" <=> "TIME",
	"TKE" <=> "TKEY",
	"TLA" <=> "TLAN",
	"TLE" <=> "TLEN",
	"TMT" <=> "TMED",
	"TOA" <=> "TOPE",
	"TOF" <=> "TOFN",
	"TOL" <=> "TOLY",
	"TOR" <=> "TORY",
	"TOT" <=> "TOAL",
	"TP1" <=> "TPE1",
	"TP2" <=> "TPE2",
	"TP3" <=> "TPE3",
	"TP4" <=> "TPE4",
	"TPA" <=> "TPOS",
	"TPB" <=> "TPUB",
	"TRC" <=> "TSRC",
	"TRD" <=> "TRDA",
	"TRK" <=> "TRCK",
	"TSI" <=> "TSIZ",
	"TSS" <=> "TSSE",
	"TT1" <=> "TIT1",
	"TT2" <=> "TIT2",
	"TT3" <=> "TIT3",
	"TXT" <=> "TEXT",
	"TXX" <=> "TXXX",
	"TYE" <=> "TYER",
	"UFI" <=> "UFID",
	"ULT" <=> "USLT",
	"WAF" <=> "WOAF",
	"WAR" <=> "WOAR",
	"WAS" <=> "WOAS",
	"WCM" <=> "WCOM",
	"WCP" <=> "WCOP",
	"WPB" <=> "WPUB",
	"WXX" <=> "WXXX",
	// iTunes non-standard frames
	"GP1" <=> "GRP1",
	"MVI" <=> "MVIN",
	"MVN" <=> "MVNM",
	"PCS" <=> "PCST",
	"TCP" <=> "TCMP",
	"TCT" <=> "TCAT",
	"TDS" <=> "TDES",
	"TID" <=> "TGID",
	"TS2" <=> "TSO2",
	"TSA" <=> "TSOA",
	"TSC" <=> "TSOC",
	"TSP" <=> "TSOP",
	"TST" <=> "TSOT",
	"WFD" <=> "WFED",
);

// Frames that only exist in ID3v2.4
const V24_ONLY: &[&str] = &[
	"ASPI", "EQU2", "RVA2", "SEEK", "SIGN", "TDEN", "TDRL", "TDTG", "TPRO",
];

// Frames that only exist in ID3v2.2 and ID3v2.3
const V23_ONLY: &[&str] = &["EQUA", "RVAD", "TSIZ", "TRDA"];

/// Upgrade an ID3v2.2 frame ID to its ID3v2.3 counterpart
///
/// # Examples
///
/// ```rust
/// use tagsmith::id3::v2::convert::upgrade_v22_id;
///
/// assert_eq!(upgrade_v22_id("TT2"), Some("TIT2"));
/// assert_eq!(upgrade_v22_id("TYE"), Some("TYER"));
/// assert_eq!(upgrade_v22_id("XYZ"), None);
/// ```
pub fn upgrade_v22_id(id: &str) -> Option<&'static str> {
	v22_to_v23().get(id).copied()
}

/// Downgrade an ID3v2.3 frame ID to its ID3v2.2 counterpart
///
/// # Examples
///
/// ```rust
/// use tagsmith::id3::v2::convert::downgrade_v23_id;
///
/// assert_eq!(downgrade_v23_id("TIT2"), Some("TT2"));
/// assert_eq!(downgrade_v23_id("PRIV"), None);
/// ```
pub fn downgrade_v23_id(id: &str) -> Option<&'static str> {
	v23_to_v22().get(id).copied()
}

/// Convert a tag to `version`
///
/// See the [module docs](crate::id3::v2::convert) for how frames are rewritten. Use
/// [`convert_with_report`] to find out which frames were dropped.
///
/// # Examples
///
/// ```rust
/// use tagsmith::id3::v2::convert::convert;
/// use tagsmith::id3::v2::fields::FieldKey;
/// use tagsmith::id3::v2::{Id3v2Tag, Id3v2Version};
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
/// tag.set_field(FieldKey::Mood, "Calm")?;
/// assert_eq!(tag.get_user_text("MOOD"), Some("Calm"));
///
/// // ID3v2.4 has a dedicated mood frame
/// let converted = convert(&tag, Id3v2Version::V4);
/// assert_eq!(converted.get_user_text("MOOD"), None);
/// assert_eq!(converted.get_fields(FieldKey::Mood), ["Calm"]);
/// # Ok(()) }
/// ```
pub fn convert(tag: &Id3v2Tag, version: Id3v2Version) -> Id3v2Tag {
	convert_with_report(tag, version).0
}

/// Convert a tag to `version`, returning the IDs of the frames that were dropped
///
/// The dropped IDs are those of the source tag, in the order they appeared.
pub fn convert_with_report(tag: &Id3v2Tag, version: Id3v2Version) -> (Id3v2Tag, Vec<FrameId>) {
	let from = tag.version();
	if from == version {
		return (tag.clone(), Vec::new());
	}

	log::debug!("ID3v2: Converting tag from {from} to {version}");

	let mut converter = Converter {
		from,
		to: version,
		frames: Vec::with_capacity(tag.len()),
		dropped: Vec::new(),
	};

	let dates = SourceDates::collect(tag);
	for frame in tag.frames() {
		converter.convert_frame(frame, &dates);
	}

	let Converter {
		frames, dropped, ..
	} = converter;

	if !dropped.is_empty() {
		log::warn!(
			"ID3v2: Dropped {} frame(s) with no {version} counterpart",
			dropped.len()
		);
	}

	(Id3v2Tag::with_frames(version, *tag.flags(), frames), dropped)
}

struct Converter {
	from: Id3v2Version,
	to: Id3v2Version,
	frames: Vec<Frame>,
	dropped: Vec<FrameId>,
}

impl Converter {
	fn crosses_v24(&self) -> bool {
		(self.from == Id3v2Version::V4) != (self.to == Id3v2Version::V4)
	}

	fn drop_frame(&mut self, frame: &Frame) {
		log::warn!(
			"ID3v2: Dropping frame \"{}\", it has no {} counterpart",
			frame.id(),
			self.to
		);
		self.dropped.push(frame.id().clone());
	}

	fn push(&mut self, mut frame: Frame) {
		if self.to != Id3v2Version::V4 {
			downgrade_encoding(&mut frame, self.to);
		}

		self.frames.push(frame);
	}

	fn convert_frame(&mut self, frame: &Frame, dates: &SourceDates) {
		if self.crosses_v24()
			&& (self.convert_date(frame, dates) || self.convert_involved_people(frame))
		{
			return;
		}

		if self.convert_field(frame) {
			return;
		}

		match self.convert_id(frame.id()) {
			Some(id) => {
				let mut frame = frame.clone();
				frame.header_mut().id = id;
				self.push(frame);
			},
			None => self.drop_frame(frame),
		}
	}

	// Frames with a field key follow the key's mapping
	fn convert_field(&mut self, frame: &Frame) -> bool {
		let Some(key) = FieldKey::from_frame(frame, self.from) else {
			return false;
		};

		let source = key.mapping(self.from);
		let destination = key.mapping(self.to);

		// Same kind of frame, only the ID changes
		if mem::discriminant(&source) == mem::discriminant(&destination) {
			let mut frame = frame.clone();
			frame.header_mut().id = destination.frame_id(self.to);
			self.push(frame);
			return true;
		}

		let value = match frame {
			Frame::Text(text) => text.value.as_str(),
			Frame::UserText(text) => text.content.as_str(),
			Frame::Comment(comment) => comment.content.as_str(),
			_ => return false,
		};

		log::debug!(
			"ID3v2: Rewriting \"{}\" as {:?} for {key}",
			frame.id(),
			destination
		);

		match new_field_frame(destination, self.to, value) {
			Ok(mut converted) => {
				converted.set_flags(frame.flags());
				self.push(converted);
			},
			Err(e) => {
				log::warn!("ID3v2: Unable to rewrite \"{}\": {e}", frame.id());
				self.drop_frame(frame);
			},
		}

		true
	}

	fn convert_date(&mut self, frame: &Frame, dates: &SourceDates) -> bool {
		let Frame::Text(text) = frame else {
			return false;
		};

		match (self.from, text.id().as_str()) {
			// TYER + TDAT + TIME -> TDRC
			(Id3v2Version::V2, "TYE") | (Id3v2Version::V3, "TYER") => {
				let timestamp = join_timestamp(
					&text.value,
					dates.date.as_deref(),
					dates.time.as_deref(),
				);
				self.push_text(frame, "TDRC", timestamp);
				true
			},
			(Id3v2Version::V2, "TDA" | "TIM") | (Id3v2Version::V3, "TDAT" | "TIME") => {
				// Merged into the year, if there is one
				if !dates.has_year {
					self.drop_frame(frame);
				}
				true
			},
			(Id3v2Version::V2, "TOR") | (Id3v2Version::V3, "TORY") => {
				self.push_text(frame, "TDOR", text.value.clone());
				true
			},
			// TDRC -> TYER + TDAT + TIME
			(Id3v2Version::V4, "TDRC") => {
				let Some(split) = split_timestamp(&text.value) else {
					log::warn!("ID3v2: Unable to split timestamp \"{}\"", text.value);
					self.drop_frame(frame);
					return true;
				};

				let (year, date, time) = match self.to {
					Id3v2Version::V2 => ("TYE", "TDA", "TIM"),
					_ => ("TYER", "TDAT", "TIME"),
				};

				self.push_text(frame, year, split.year);
				if let Some(day_month) = split.day_month {
					self.push_text(frame, date, day_month);
				}
				if let Some(hour_minute) = split.hour_minute {
					self.push_text(frame, time, hour_minute);
				}
				true
			},
			(Id3v2Version::V4, "TDOR") => {
				let Some(split) = split_timestamp(&text.value) else {
					self.drop_frame(frame);
					return true;
				};

				let id = match self.to {
					Id3v2Version::V2 => "TOR",
					_ => "TORY",
				};
				self.push_text(frame, id, split.year);
				true
			},
			_ => false,
		}
	}

	fn push_text(&mut self, source: &Frame, id: &'static str, value: String) {
		let Frame::Text(text) = source else {
			return;
		};

		let mut frame = TextInformationFrame::new(FrameId::from_static(id), text.encoding, value);
		frame.set_flags(text.flags());
		self.push(Frame::Text(frame));
	}

	fn convert_involved_people(&mut self, frame: &Frame) -> bool {
		let Frame::KeyValue(pairs) = frame else {
			return false;
		};

		match (self.to, pairs.id().as_str()) {
			// IPLS -> TIPL + TMCL
			(Id3v2Version::V4, "IPL" | "IPLS") => {
				let (involved, musicians): (Vec<_>, Vec<_>) =
					pairs.key_value_pairs.iter().cloned().partition(|(role, _)| {
						INVOLVED_PEOPLE_ROLES
							.iter()
							.any(|known| known.eq_ignore_ascii_case(role))
					});

				for (id, list) in [("TIPL", involved), ("TMCL", musicians)] {
					if list.is_empty() {
						continue;
					}

					let mut converted =
						KeyValueFrame::new(FrameId::from_static(id), pairs.encoding, list);
					converted.set_flags(pairs.flags());
					self.push(Frame::KeyValue(converted));
				}

				true
			},
			// TIPL, TMCL -> IPLS
			(Id3v2Version::V2 | Id3v2Version::V3, "TIPL" | "TMCL") => {
				let mut converted = frame.clone();
				converted.header_mut().id = FrameId::versioned(self.to, "IPL", "IPLS");
				self.push(converted);
				true
			},
			_ => false,
		}
	}

	fn convert_id(&self, id: &FrameId) -> Option<FrameId> {
		let id = id.as_str();
		match (self.from, self.to) {
			(Id3v2Version::V2, _) => {
				let upgraded = upgrade_v22_id(id)?;
				if self.to == Id3v2Version::V4 && V23_ONLY.contains(&upgraded) {
					return None;
				}

				Some(FrameId::from_static(upgraded))
			},
			(_, Id3v2Version::V2) => {
				if self.from == Id3v2Version::V4 && V24_ONLY.contains(&id) {
					return None;
				}

				downgrade_v23_id(id).map(FrameId::from_static)
			},
			(Id3v2Version::V3, _) if V23_ONLY.contains(&id) => None,
			(Id3v2Version::V4, _) if V24_ONLY.contains(&id) => None,
			_ => FrameId::new(id.to_owned()).ok(),
		}
	}
}

// The ID3v2.2/ID3v2.3 date and time frames, which are merged into the year frame
struct SourceDates {
	has_year: bool,
	date: Option<String>,
	time: Option<String>,
}

impl SourceDates {
	fn collect(tag: &Id3v2Tag) -> Self {
		let (year, date, time) = match tag.version() {
			Id3v2Version::V2 => ("TYE", "TDA", "TIM"),
			Id3v2Version::V3 => ("TYER", "TDAT", "TIME"),
			Id3v2Version::V4 => {
				return Self {
					has_year: false,
					date: None,
					time: None,
				};
			},
		};

		let text = |id: &'static str| tag.get_text(&FrameId::from_static(id)).map(str::to_owned);

		Self {
			has_year: text(year).is_some(),
			date: text(date),
			time: text(time),
		}
	}
}

// "2004" + "2503" (DDMM) + "1345" (HHMM) -> "2004-03-25T13:45"
fn join_timestamp(year: &str, date: Option<&str>, time: Option<&str>) -> String {
	let mut timestamp = year.trim().to_owned();

	let Some((day, month)) = date.and_then(split_digit_pairs) else {
		return timestamp;
	};
	timestamp.push_str(&format!("-{month}-{day}"));

	if let Some((hour, minute)) = time.and_then(split_digit_pairs) {
		timestamp.push_str(&format!("T{hour}:{minute}"));
	}

	timestamp
}

fn split_digit_pairs(value: &str) -> Option<(&str, &str)> {
	let value = value.trim();
	if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	Some((&value[..2], &value[2..]))
}

struct SplitTimestamp {
	year: String,
	day_month: Option<String>,
	hour_minute: Option<String>,
}

// "yyyy[-MM[-dd[THH[:mm[:ss]]]]]"
fn split_timestamp(timestamp: &str) -> Option<SplitTimestamp> {
	let timestamp = timestamp.trim();
	let digits = |range: std::ops::Range<usize>| {
		timestamp
			.get(range)
			.filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
	};

	let year = digits(0..4)?;

	let day_month = match (digits(5..7), digits(8..10)) {
		(Some(month), Some(day)) => Some(format!("{day}{month}")),
		_ => None,
	};

	let hour_minute = match (&day_month, digits(11..13), digits(14..16)) {
		(Some(_), Some(hour), Some(minute)) => Some(format!("{hour}{minute}")),
		_ => None,
	};

	Some(SplitTimestamp {
		year: year.to_owned(),
		day_month,
		hour_minute,
	})
}

// ID3v2.2 and ID3v2.3 only know Latin-1 and UTF-16
fn downgrade_encoding(frame: &mut Frame, version: Id3v2Version) {
	let encoding = match frame {
		Frame::Text(frame) => &mut frame.encoding,
		Frame::UserText(frame) => &mut frame.encoding,
		Frame::UserUrl(frame) => &mut frame.encoding,
		Frame::Comment(frame) => &mut frame.encoding,
		Frame::UnsynchronizedText(frame) => &mut frame.encoding,
		Frame::Picture(frame) => &mut frame.encoding,
		Frame::KeyValue(frame) => &mut frame.encoding,
		_ => return,
	};

	if !encoding.is_valid_for(version) {
		*encoding = TextEncoding::to_id3v23(*encoding);
	}
}
