//! Format independent tag fields
//!
//! A [`FieldKey`] names a piece of metadata (ex. [`FieldKey::AlbumArtist`]) without caring how it is
//! stored. Each key has a [`FieldMapping`] for every ID3v2 version, describing the frame (and
//! the frame's description, role, or owner where needed) that holds it.
//!
//! Keys without a dedicated frame in a version are stored in a user defined text frame
//! (`TXXX`/`TXX`) or a comment frame (`COMM`/`COM`) with a reserved description. These are read back
//! the same way, so every key can be used with every version.
//!
//! See [`Id3v2Tag::get_first`](crate::id3::v2::Id3v2Tag::get_first) and friends for working with
//! the fields of a tag.

mod access;

pub(crate) use access::new_field_frame;

use crate::id3::v2::{Frame, FrameId, Id3v2Version};

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Separates the role and the name in the values of key/value pair fields
///
/// For example, the [`FieldKey::Performer`] value `"guitar:Foo"` credits Foo on guitar.
pub const PAIR_VALUE_SEPARATOR: char = ':';

/// The owner of the MusicBrainz recording ID `UFID` frame
pub const MUSICBRAINZ_UFID_OWNER: &str = "http://musicbrainz.org";

/// The part of a number pair (ex. `"3/12"`) a field refers to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumberPairPart {
	/// The number (`3` in `"3/12"`)
	Number,
	/// The total (`12` in `"3/12"`)
	Total,
}

/// How a [`FieldKey`] is stored in a tag of a specific version
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldMapping {
	/// A text information frame with the given ID
	Text(&'static str),
	/// The genre frame (`TCON`/`TCO`)
	///
	/// Values are read through [`parse_genres`](crate::id3::v2::util::genres::parse_genres).
	Genre,
	/// A user defined text frame (`TXXX`/`TXX`) with the given description
	UserText(&'static str),
	/// A comment frame (`COMM`/`COM`) with the given description
	Comment(&'static str),
	/// Unsynchronized lyrics (`USLT`/`ULT`)
	Lyrics,
	/// A URL link frame with the given ID
	Url(&'static str),
	/// A user defined URL frame (`WXXX`/`WXX`) with the given description
	UserUrl(&'static str),
	/// The pairs of the involved people list with the given role
	InvolvedPeopleRole(&'static str),
	/// Every pair of the involved people list (`TIPL`, `IPLS`, `IPL`)
	InvolvedPeople,
	/// The musician credits list (`TMCL`)
	///
	/// ID3v2.2 and ID3v2.3 keep musicians in the involved people list. There, every pair whose role
	/// isn't one of [`INVOLVED_PEOPLE_ROLES`] is a musician credit.
	MusicianCredits,
	/// One half of a number pair text frame with the given ID
	NumberPair(&'static str, NumberPairPart),
	/// A unique file identifier frame (`UFID`/`UFI`) with the given owner
	UniqueFileIdentifier(&'static str),
	/// The rating of the popularimeter frame (`POPM`/`POP`)
	Popularimeter,
}

/// The roles of the involved people list that have their own [`FieldKey`]
pub const INVOLVED_PEOPLE_ROLES: &[&str] = &["arranger", "engineer", "DJ-mix", "mix", "producer"];

impl FieldMapping {
	/// The ID of the frame holding the field in a tag of `version`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::id3::v2::Id3v2Version;
	/// use tagsmith::id3::v2::fields::FieldKey;
	///
	/// let mood = FieldKey::Mood;
	/// assert_eq!(mood.mapping(Id3v2Version::V4).frame_id(Id3v2Version::V4), "TMOO");
	/// assert_eq!(mood.mapping(Id3v2Version::V3).frame_id(Id3v2Version::V3), "TXXX");
	/// assert_eq!(mood.mapping(Id3v2Version::V2).frame_id(Id3v2Version::V2), "TXX");
	/// ```
	pub fn frame_id(self, version: Id3v2Version) -> FrameId {
		FrameId::from_static(self.raw_id(version))
	}

	pub(crate) fn raw_id(self, version: Id3v2Version) -> &'static str {
		let legacy = version == Id3v2Version::V2;
		match self {
			FieldMapping::Text(id) | FieldMapping::Url(id) | FieldMapping::NumberPair(id, _) => id,
			FieldMapping::Genre if legacy => "TCO",
			FieldMapping::Genre => "TCON",
			FieldMapping::UserText(_) if legacy => "TXX",
			FieldMapping::UserText(_) => "TXXX",
			FieldMapping::Comment(_) if legacy => "COM",
			FieldMapping::Comment(_) => "COMM",
			FieldMapping::Lyrics if legacy => "ULT",
			FieldMapping::Lyrics => "USLT",
			FieldMapping::UserUrl(_) if legacy => "WXX",
			FieldMapping::UserUrl(_) => "WXXX",
			FieldMapping::InvolvedPeopleRole(_) | FieldMapping::InvolvedPeople => {
				involved_people_id(version)
			},
			FieldMapping::MusicianCredits => match version {
				Id3v2Version::V4 => "TMCL",
				_ => involved_people_id(version),
			},
			FieldMapping::UniqueFileIdentifier(_) if legacy => "UFI",
			FieldMapping::UniqueFileIdentifier(_) => "UFID",
			FieldMapping::Popularimeter if legacy => "POP",
			FieldMapping::Popularimeter => "POPM",
		}
	}

	/// Whether the field shares its frame with other fields of the same key
	pub(crate) fn is_shared(self) -> bool {
		matches!(
			self,
			FieldMapping::InvolvedPeopleRole(_)
				| FieldMapping::InvolvedPeople
				| FieldMapping::MusicianCredits
				| FieldMapping::NumberPair(..)
		)
	}

	/// The description, role, or owner that tells the field apart from others in the same frame ID
	pub fn descriptor(self) -> Option<&'static str> {
		match self {
			FieldMapping::UserText(descriptor)
			| FieldMapping::Comment(descriptor)
			| FieldMapping::UserUrl(descriptor)
			| FieldMapping::InvolvedPeopleRole(descriptor)
			| FieldMapping::UniqueFileIdentifier(descriptor) => Some(descriptor),
			_ => None,
		}
	}
}

pub(crate) fn involved_people_id(version: Id3v2Version) -> &'static str {
	match version {
		Id3v2Version::V2 => "IPL",
		Id3v2Version::V3 => "IPLS",
		Id3v2Version::V4 => "TIPL",
	}
}

// Keys with one mapping use it for every version, otherwise the mappings are for
// ID3v2.2, ID3v2.3, and ID3v2.4 respectively.
fn select(mappings: &[FieldMapping], version: Id3v2Version) -> FieldMapping {
	match (mappings, version) {
		([all], _) => *all,
		([v22, ..], Id3v2Version::V2) => *v22,
		([_, v23, ..], Id3v2Version::V3) => *v23,
		([.., v24], _) => *v24,
		([], _) => unreachable!("every key has a mapping"),
	}
}

macro_rules! gen_field_keys {
	(
		$(
			$(#[$meta:meta])*
			$key:ident => $name:literal: [$($mapping:expr),+]
		),+ $(,)?
	) => {
		/// A format independent tag field
		///
		/// See the [module docs](crate::id3::v2::fields) for how keys are stored.
		#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
		#[non_exhaustive]
		pub enum FieldKey {
			$(
				$(#[$meta])*
				$key,
			)+
		}

		impl FieldKey {
			/// Every key
			pub const ALL: &'static [FieldKey] = &[$(FieldKey::$key,)+];

			/// The name of the key (ex. `"ALBUM_ARTIST"`)
			///
			/// Keys stored with a reserved description use this name as the description.
			pub fn name(self) -> &'static str {
				match self {
					$(FieldKey::$key => $name,)+
				}
			}

			/// Get a key from its name, ignoring case
			///
			/// # Examples
			///
			/// ```rust
			/// use tagsmith::id3::v2::fields::FieldKey;
			///
			/// assert_eq!(FieldKey::from_name("album_artist"), Some(FieldKey::AlbumArtist));
			/// assert_eq!(FieldKey::from_name("NOT_A_KEY"), None);
			/// ```
			pub fn from_name(name: &str) -> Option<Self> {
				FieldKey::ALL
					.iter()
					.copied()
					.find(|key| key.name().eq_ignore_ascii_case(name))
			}

			/// How the key is stored in a tag of `version`
			pub fn mapping(self, version: Id3v2Version) -> FieldMapping {
				#[allow(unused_imports)]
				use FieldMapping::{
					Comment, Genre, InvolvedPeople, InvolvedPeopleRole, Lyrics, MusicianCredits,
					NumberPair, Popularimeter, Text, UniqueFileIdentifier, Url, UserText,
					UserUrl,
				};
				use NumberPairPart::{Number, Total};

				match self {
					$(FieldKey::$key => select(&[$($mapping),+], version),)+
				}
			}
		}
	};
}

gen_field_keys! {
	/// AcoustID fingerprint
	AcoustidFingerprint         => "ACOUSTID_FINGERPRINT": [UserText("Acoustid Fingerprint")],
	/// AcoustID
	AcoustidId                  => "ACOUSTID_ID": [UserText("Acoustid Id")],
	/// Album title
	Album                       => "ALBUM": [Text("TAL"), Text("TALB"), Text("TALB")],
	/// Album artist
	AlbumArtist                 => "ALBUM_ARTIST": [Text("TP2"), Text("TPE2"), Text("TPE2")],
	/// Album artist sort order
	AlbumArtistSort             => "ALBUM_ARTIST_SORT": [Text("TS2"), Text("TSO2"), Text("TSO2")],
	/// Every album artist, for multi-artist releases
	AlbumArtists                => "ALBUM_ARTISTS": [UserText("ALBUM_ARTISTS")],
	/// Sort order of [`FieldKey::AlbumArtists`]
	AlbumArtistsSort            => "ALBUM_ARTISTS_SORT": [UserText("ALBUM_ARTISTS_SORT")],
	/// Album sort order
	AlbumSort                   => "ALBUM_SORT": [Text("TSA"), Text("TSOA"), Text("TSOA")],
	/// Amazon standard identification number
	AmazonId                    => "AMAZON_ID": [UserText("ASIN")],
	/// Arranger
	Arranger                    => "ARRANGER": [InvolvedPeopleRole("arranger")],
	/// Arranger sort order
	ArrangerSort                => "ARRANGER_SORT": [UserText("ARRANGER_SORT")],
	/// Track artist
	Artist                      => "ARTIST": [Text("TP1"), Text("TPE1"), Text("TPE1")],
	/// Every track artist, for multi-artist tracks
	Artists                     => "ARTISTS": [UserText("ARTISTS")],
	/// Sort order of [`FieldKey::Artists`]
	ArtistsSort                 => "ARTISTS_SORT": [UserText("ARTISTS_SORT")],
	/// Track artist sort order
	ArtistSort                  => "ARTIST_SORT": [Text("TSP"), Text("TSOP"), Text("TSOP")],
	/// Release barcode
	Barcode                     => "BARCODE": [UserText("BARCODE")],
	/// Beats per minute
	Bpm                         => "BPM": [Text("TBP"), Text("TBPM"), Text("TBPM")],
	/// Release catalog number
	CatalogNo                   => "CATALOG_NO": [UserText("CATALOGNUMBER")],
	/// Choir
	Choir                       => "CHOIR": [UserText("CHOIR")],
	/// Choir sort order
	ChoirSort                   => "CHOIR_SORT": [UserText("CHOIR_SORT")],
	/// Classical catalog number (ex. `BWV 1007`)
	ClassicalCatalog            => "CLASSICAL_CATALOG": [UserText("CLASSICAL_CATALOG")],
	/// Nickname of a classical work
	ClassicalNickname           => "CLASSICAL_NICKNAME": [UserText("CLASSICAL_NICKNAME")],
	/// Comment without a description
	Comment                     => "COMMENT": [Comment("")],
	/// Composer
	Composer                    => "COMPOSER": [Text("TCM"), Text("TCOM"), Text("TCOM")],
	/// Composer sort order
	ComposerSort                => "COMPOSER_SORT": [Text("TSC"), Text("TSOC"), Text("TSOC")],
	/// Conductor
	Conductor                   => "CONDUCTOR": [Text("TP3"), Text("TPE3"), Text("TPE3")],
	/// Conductor sort order
	ConductorSort               => "CONDUCTOR_SORT": [UserText("CONDUCTOR_SORT")],
	/// Copyright message
	Copyright                   => "COPYRIGHT": [Text("TCR"), Text("TCOP"), Text("TCOP")],
	/// Release country
	Country                     => "COUNTRY": [UserText("Country")],
	/// Custom field 1 (Songs-DB convention)
	Custom1                     => "CUSTOM1": [Comment("Songs-DB_Custom1")],
	/// Custom field 2 (Songs-DB convention)
	Custom2                     => "CUSTOM2": [Comment("Songs-DB_Custom2")],
	/// Custom field 3 (Songs-DB convention)
	Custom3                     => "CUSTOM3": [Comment("Songs-DB_Custom3")],
	/// Custom field 4 (Songs-DB convention)
	Custom4                     => "CUSTOM4": [Comment("Songs-DB_Custom4")],
	/// Custom field 5 (Songs-DB convention)
	Custom5                     => "CUSTOM5": [Comment("Songs-DB_Custom5")],
	/// Disc number
	DiscNo                      => "DISC_NO": [NumberPair("TPA", Number), NumberPair("TPOS", Number), NumberPair("TPOS", Number)],
	/// Disc subtitle
	DiscSubtitle                => "DISC_SUBTITLE": [UserText("DISC_SUBTITLE"), UserText("DISC_SUBTITLE"), Text("TSST")],
	/// Total number of discs
	DiscTotal                   => "DISC_TOTAL": [NumberPair("TPA", Total), NumberPair("TPOS", Total), NumberPair("TPOS", Total)],
	/// DJ mixer
	DjMixer                     => "DJMIXER": [InvolvedPeopleRole("DJ-mix")],
	/// Encoded by
	Encoder                     => "ENCODER": [Text("TEN"), Text("TENC"), Text("TENC")],
	/// Encoder settings
	EncoderSettings             => "ENCODER_SETTINGS": [Text("TSS"), Text("TSSE"), Text("TSSE")],
	/// Encoding time
	EncodingTime                => "ENCODING_TIME": [UserText("ENCODING_TIME"), UserText("ENCODING_TIME"), Text("TDEN")],
	/// Engineer
	Engineer                    => "ENGINEER": [InvolvedPeopleRole("engineer")],
	/// Ensemble
	Ensemble                    => "ENSEMBLE": [UserText("Ensemble")],
	/// Ensemble sort order
	EnsembleSort                => "ENSEMBLE_SORT": [UserText("Ensemble Sort")],
	/// Floating point beats per minute
	Fbpm                        => "FBPM": [UserText("FBPM")],
	/// File owner
	FileOwner                   => "FILE_OWNER": [UserText("FILE_OWNER"), Text("TOWN"), Text("TOWN")],
	/// Genre
	Genre                       => "GENRE": [Genre],
	/// Group
	Group                       => "GROUP": [UserText("GROUP")],
	/// Content group
	Grouping                    => "GROUPING": [Text("TT1"), Text("TIT1"), Text("TIT1")],
	/// Instrument
	Instrument                  => "INSTRUMENT": [UserText("INSTRUMENT")],
	/// Internet radio station name
	InternetRadioStation        => "INTERNET_RADIO_STATION": [UserText("INTERNET_RADIO_STATION"), Text("TRSN"), Text("TRSN")],
	/// Involved people, as `role:name`
	InvolvedPerson              => "INVOLVED_PERSON": [InvolvedPeople],
	/// Whether the track is classical music
	IsClassical                 => "IS_CLASSICAL": [UserText("IS_CLASSICAL")],
	/// Whether the track is part of a compilation (iTunes)
	IsCompilation               => "IS_COMPILATION": [Text("TCP"), Text("TCMP"), Text("TCMP")],
	/// Whether the track is part of a soundtrack
	IsSoundtrack                => "IS_SOUNDTRACK": [UserText("IS_SOUNDTRACK")],
	/// International standard recording code
	Isrc                        => "ISRC": [Text("TRC"), Text("TSRC"), Text("TSRC")],
	/// Grouping (iTunes)
	ItunesGrouping              => "ITUNES_GROUPING": [Text("GP1"), Text("GRP1"), Text("GRP1")],
	/// Initial key
	Key                         => "KEY": [Text("TKE"), Text("TKEY"), Text("TKEY")],
	/// Language
	Language                    => "LANGUAGE": [Text("TLA"), Text("TLAN"), Text("TLAN")],
	/// Length in milliseconds
	Length                      => "LENGTH": [Text("TLE"), Text("TLEN"), Text("TLEN")],
	/// Lyricist
	Lyricist                    => "LYRICIST": [Text("TXT"), Text("TEXT"), Text("TEXT")],
	/// Unsynchronized lyrics
	Lyrics                      => "LYRICS": [Lyrics],
	/// Media type
	Media                       => "MEDIA": [Text("TMT"), Text("TMED"), Text("TMED")],
	/// Mixing engineer
	Mixer                       => "MIXER": [InvolvedPeopleRole("mix")],
	/// Mood
	Mood                        => "MOOD": [UserText("MOOD"), UserText("MOOD"), Text("TMOO")],
	/// Acoustic mood rating
	MoodAcoustic                => "MOOD_ACOUSTIC": [UserText("MOOD_ACOUSTIC")],
	/// Aggressive mood rating
	MoodAggressive              => "MOOD_AGGRESSIVE": [UserText("MOOD_AGGRESSIVE")],
	/// Mood arousal rating
	MoodArousal                 => "MOOD_AROUSAL": [UserText("MOOD_AROUSAL")],
	/// Danceability rating
	MoodDanceability            => "MOOD_DANCEABILITY": [UserText("MOOD_DANCEABILITY")],
	/// Electronic mood rating
	MoodElectronic              => "MOOD_ELECTRONIC": [UserText("MOOD_ELECTRONIC")],
	/// Happy mood rating
	MoodHappy                   => "MOOD_HAPPY": [UserText("MOOD_HAPPY")],
	/// Instrumental mood rating
	MoodInstrumental            => "MOOD_INSTRUMENTAL": [UserText("MOOD_INSTRUMENTAL")],
	/// Party mood rating
	MoodParty                   => "MOOD_PARTY": [UserText("MOOD_PARTY")],
	/// Relaxed mood rating
	MoodRelaxed                 => "MOOD_RELAXED": [UserText("MOOD_RELAXED")],
	/// Sad mood rating
	MoodSad                     => "MOOD_SAD": [UserText("MOOD_SAD")],
	/// Mood valence rating
	MoodValence                 => "MOOD_VALENCE": [UserText("MOOD_VALENCE")],
	/// Movement name
	Movement                    => "MOVEMENT": [Text("MVN"), Text("MVNM"), Text("MVNM")],
	/// Movement number
	MovementNo                  => "MOVEMENT_NO": [NumberPair("MVI", Number), NumberPair("MVIN", Number), NumberPair("MVIN", Number)],
	/// Total number of movements
	MovementTotal               => "MOVEMENT_TOTAL": [NumberPair("MVI", Total), NumberPair("MVIN", Total), NumberPair("MVIN", Total)],
	/// MusicBrainz artist ID
	MusicbrainzArtistId         => "MUSICBRAINZ_ARTISTID": [UserText("MusicBrainz Artist Id")],
	/// MusicBrainz disc ID
	MusicbrainzDiscId           => "MUSICBRAINZ_DISC_ID": [UserText("MusicBrainz Disc Id")],
	/// MusicBrainz original release ID
	MusicbrainzOriginalReleaseId => "MUSICBRAINZ_ORIGINAL_RELEASEID": [UserText("MusicBrainz Original Album Id")],
	/// MusicBrainz release artist ID
	MusicbrainzReleaseArtistId  => "MUSICBRAINZ_RELEASEARTISTID": [UserText("MusicBrainz Album Artist Id")],
	/// MusicBrainz release country
	MusicbrainzReleaseCountry   => "MUSICBRAINZ_RELEASE_COUNTRY": [UserText("MusicBrainz Album Release Country")],
	/// MusicBrainz release group ID
	MusicbrainzReleaseGroupId   => "MUSICBRAINZ_RELEASE_GROUP_ID": [UserText("MusicBrainz Release Group Id")],
	/// MusicBrainz release ID
	MusicbrainzReleaseId        => "MUSICBRAINZ_RELEASEID": [UserText("MusicBrainz Album Id")],
	/// MusicBrainz release status
	MusicbrainzReleaseStatus    => "MUSICBRAINZ_RELEASE_STATUS": [UserText("MusicBrainz Album Status")],
	/// MusicBrainz release track ID
	MusicbrainzReleaseTrackId   => "MUSICBRAINZ_RELEASE_TRACK_ID": [UserText("MusicBrainz Release Track Id")],
	/// MusicBrainz release type
	MusicbrainzReleaseType      => "MUSICBRAINZ_RELEASE_TYPE": [UserText("MusicBrainz Album Type")],
	/// MusicBrainz recording ID
	MusicbrainzTrackId          => "MUSICBRAINZ_TRACK_ID": [UniqueFileIdentifier(MUSICBRAINZ_UFID_OWNER)],
	/// MusicBrainz work
	MusicbrainzWork             => "MUSICBRAINZ_WORK": [UserText("MusicBrainz Work")],
	/// MusicBrainz work ID
	MusicbrainzWorkId           => "MUSICBRAINZ_WORKID": [UserText("MusicBrainz Work Id")],
	/// MusicBrainz work composition ID
	MusicbrainzWorkCompositionId => "MUSICBRAINZ_WORK_COMPOSITION_ID": [UserText("MUSICBRAINZ_WORK_COMPOSITION_ID")],
	/// MusicBrainz work part level 1 ID
	MusicbrainzWorkPartLevel1Id => "MUSICBRAINZ_WORK_PART_LEVEL1_ID": [UserText("MUSICBRAINZ_WORK_PART_LEVEL1_ID")],
	/// MusicBrainz work part level 1 type
	MusicbrainzWorkPartLevel1Type => "MUSICBRAINZ_WORK_PART_LEVEL1_TYPE": [UserText("MUSICBRAINZ_WORK_PART_LEVEL1_TYPE")],
	/// MusicBrainz work part level 2 ID
	MusicbrainzWorkPartLevel2Id => "MUSICBRAINZ_WORK_PART_LEVEL2_ID": [UserText("MUSICBRAINZ_WORK_PART_LEVEL2_ID")],
	/// MusicBrainz work part level 2 type
	MusicbrainzWorkPartLevel2Type => "MUSICBRAINZ_WORK_PART_LEVEL2_TYPE": [UserText("MUSICBRAINZ_WORK_PART_LEVEL2_TYPE")],
	/// MusicBrainz work part level 3 ID
	MusicbrainzWorkPartLevel3Id => "MUSICBRAINZ_WORK_PART_LEVEL3_ID": [UserText("MUSICBRAINZ_WORK_PART_LEVEL3_ID")],
	/// MusicBrainz work part level 3 type
	MusicbrainzWorkPartLevel3Type => "MUSICBRAINZ_WORK_PART_LEVEL3_TYPE": [UserText("MUSICBRAINZ_WORK_PART_LEVEL3_TYPE")],
	/// MusicBrainz work part level 4 ID
	MusicbrainzWorkPartLevel4Id => "MUSICBRAINZ_WORK_PART_LEVEL4_ID": [UserText("MUSICBRAINZ_WORK_PART_LEVEL4_ID")],
	/// MusicBrainz work part level 4 type
	MusicbrainzWorkPartLevel4Type => "MUSICBRAINZ_WORK_PART_LEVEL4_TYPE": [UserText("MUSICBRAINZ_WORK_PART_LEVEL4_TYPE")],
	/// MusicBrainz work part level 5 ID
	MusicbrainzWorkPartLevel5Id => "MUSICBRAINZ_WORK_PART_LEVEL5_ID": [UserText("MUSICBRAINZ_WORK_PART_LEVEL5_ID")],
	/// MusicBrainz work part level 5 type
	MusicbrainzWorkPartLevel5Type => "MUSICBRAINZ_WORK_PART_LEVEL5_TYPE": [UserText("MUSICBRAINZ_WORK_PART_LEVEL5_TYPE")],
	/// MusicBrainz work part level 6 ID
	MusicbrainzWorkPartLevel6Id => "MUSICBRAINZ_WORK_PART_LEVEL6_ID": [UserText("MUSICBRAINZ_WORK_PART_LEVEL6_ID")],
	/// MusicBrainz work part level 6 type
	MusicbrainzWorkPartLevel6Type => "MUSICBRAINZ_WORK_PART_LEVEL6_TYPE": [UserText("MUSICBRAINZ_WORK_PART_LEVEL6_TYPE")],
	/// MusicIP PUID
	MusicipId                   => "MUSICIP_ID": [UserText("MusicIP PUID")],
	/// Occasion (Songs-DB convention)
	Occasion                    => "OCCASION": [Comment("Songs-DB_Occasion")],
	/// Opus number
	Opus                        => "OPUS": [UserText("OPUS")],
	/// Orchestra
	Orchestra                   => "ORCHESTRA": [UserText("ORCHESTRA")],
	/// Orchestra sort order
	OrchestraSort               => "ORCHESTRA_SORT": [UserText("ORCHESTRA_SORT")],
	/// Original album title
	OriginalAlbum               => "ORIGINAL_ALBUM": [Text("TOT"), Text("TOAL"), Text("TOAL")],
	/// Original artist
	OriginalArtist              => "ORIGINAL_ARTIST": [Text("TOA"), Text("TOPE"), Text("TOPE")],
	/// Original filename
	OriginalFilename            => "ORIGINAL_FILENAME": [Text("TOF"), Text("TOFN"), Text("TOFN")],
	/// Original lyricist
	OriginalLyricist            => "ORIGINAL_LYRICIST": [Text("TOL"), Text("TOLY"), Text("TOLY")],
	/// Original release year
	OriginalYear                => "ORIGINAL_YEAR": [Text("TOR"), Text("TORY"), Text("TDOR")],
	/// Part of a work
	Part                        => "PART": [UserText("PART")],
	/// Part number of a work
	PartNumber                  => "PART_NUMBER": [UserText("PARTNUMBER")],
	/// Part type of a work
	PartType                    => "PART_TYPE": [UserText("PART_TYPE")],
	/// Musician credits, as `instrument:name`
	Performer                   => "PERFORMER": [MusicianCredits],
	/// Performer name
	PerformerName               => "PERFORMER_NAME": [UserText("PERFORMER_NAME")],
	/// Performer name sort order
	PerformerNameSort           => "PERFORMER_NAME_SORT": [UserText("PERFORMER_NAME_SORT")],
	/// Period of a classical work
	Period                      => "PERIOD": [UserText("PERIOD")],
	/// Producer
	Producer                    => "PRODUCER": [InvolvedPeopleRole("producer")],
	/// Quality (Songs-DB convention)
	Quality                     => "QUALITY": [Comment("Songs-DB_Preference")],
	/// Ranking
	Ranking                     => "RANKING": [UserText("RANKING")],
	/// Rating, stored in the popularimeter (0-255)
	Rating                      => "RATING": [Popularimeter],
	/// Record label
	RecordLabel                 => "RECORD_LABEL": [Text("TPB"), Text("TPUB"), Text("TPUB")],
	/// Release date
	ReleaseDate                 => "RELEASE_DATE": [UserText("RELEASE_DATE"), UserText("RELEASE_DATE"), Text("TDRL")],
	/// Remixer
	Remixer                     => "REMIXER": [Text("TP4"), Text("TPE4"), Text("TPE4")],
	/// Script
	Script                      => "SCRIPT": [UserText("Script")],
	/// Track number, ignoring discs
	SingleDiscTrackNo           => "SINGLE_DISC_TRACK_NO": [UserText("SINGLE_DISC_TRACK_NO")],
	/// Subtitle
	Subtitle                    => "SUBTITLE": [Text("TT3"), Text("TIT3"), Text("TIT3")],
	/// Free form tags
	Tags                        => "TAGS": [UserText("TAGS")],
	/// Tempo (Songs-DB convention)
	Tempo                       => "TEMPO": [Comment("Songs-DB_Tempo")],
	/// Timbre brightness
	Timbre                      => "TIMBRE": [UserText("TIMBRE_BRIGHTNESS")],
	/// Track title
	Title                       => "TITLE": [Text("TT2"), Text("TIT2"), Text("TIT2")],
	/// Title of a movement
	TitleMovement               => "TITLE_MOVEMENT": [UserText("TITLE_MOVEMENT")],
	/// Title sort order
	TitleSort                   => "TITLE_SORT": [Text("TST"), Text("TSOT"), Text("TSOT")],
	/// Tonality
	Tonality                    => "TONALITY": [UserText("TONALITY")],
	/// Track number
	Track                       => "TRACK": [NumberPair("TRK", Number), NumberPair("TRCK", Number), NumberPair("TRCK", Number)],
	/// Total number of tracks
	TrackTotal                  => "TRACK_TOTAL": [NumberPair("TRK", Total), NumberPair("TRCK", Total), NumberPair("TRCK", Total)],
	/// Official audio source webpage
	UrlAudioSourceSite          => "URL_AUDIO_SOURCE_SITE": [Url("WAS"), Url("WOAS"), Url("WOAS")],
	/// Commercial information webpage
	UrlCommercialSite           => "URL_COMMERCIAL_SITE": [Url("WCM"), Url("WCOM"), Url("WCOM")],
	/// Copyright information webpage
	UrlCopyrightSite            => "URL_COPYRIGHT_SITE": [Url("WCP"), Url("WCOP"), Url("WCOP")],
	/// Discogs artist page
	UrlDiscogsArtistSite        => "URL_DISCOGS_ARTIST_SITE": [UserUrl("DISCOGS_ARTIST")],
	/// Discogs release page
	UrlDiscogsReleaseSite       => "URL_DISCOGS_RELEASE_SITE": [UserUrl("DISCOGS_RELEASE")],
	/// Lyrics webpage
	UrlLyricsSite               => "URL_LYRICS_SITE": [UserUrl("LYRICS_SITE")],
	/// Official artist webpage
	UrlOfficialArtistSite       => "URL_OFFICIAL_ARTIST_SITE": [Url("WAR"), Url("WOAR"), Url("WOAR")],
	/// Official release webpage
	UrlOfficialReleaseSite      => "URL_OFFICIAL_RELEASE_SITE": [UserUrl("OFFICIAL_RELEASE")],
	/// Publisher webpage
	UrlPublisherSite            => "URL_PUBLISHER_SITE": [Url("WPB"), Url("WPUB"), Url("WPUB")],
	/// Wikipedia artist page
	UrlWikipediaArtistSite      => "URL_WIKIPEDIA_ARTIST_SITE": [UserUrl("WIKIPEDIA_ARTIST")],
	/// Wikipedia release page
	UrlWikipediaReleaseSite     => "URL_WIKIPEDIA_RELEASE_SITE": [UserUrl("WIKIPEDIA_RELEASE")],
	/// Work
	Work                        => "WORK": [UserText("WORK")],
	/// Work type
	WorkType                    => "WORK_TYPE": [UserText("WORK_TYPE")],
	/// Recording year (`TDRC` in ID3v2.4)
	Year                        => "YEAR": [Text("TYE"), Text("TYER"), Text("TDRC")],
}

impl Display for FieldKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

type FrameIdentity = (Id3v2Version, &'static str, Option<&'static str>);

impl FieldKey {
	/// Find the key a frame holds in a tag of `version`
	///
	/// Key/value pair frames and number pairs hold more than one key, and are never matched.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::TextEncoding;
	/// use tagsmith::id3::v2::fields::FieldKey;
	/// use tagsmith::id3::v2::{ExtendedTextFrame, Frame, Id3v2Version};
	///
	/// let mood = Frame::UserText(ExtendedTextFrame::new(
	/// 	Id3v2Version::V3,
	/// 	TextEncoding::Latin1,
	/// 	"MOOD",
	/// 	"Calm",
	/// ));
	///
	/// assert_eq!(FieldKey::from_frame(&mood, Id3v2Version::V3), Some(FieldKey::Mood));
	/// ```
	pub fn from_frame(frame: &Frame, version: Id3v2Version) -> Option<Self> {
		static INSTANCE: OnceLock<HashMap<FrameIdentity, FieldKey>> = OnceLock::new();

		let map = INSTANCE.get_or_init(|| {
			let mut map = HashMap::new();
			for version in Id3v2Version::ALL {
				for key in FieldKey::ALL {
					let mapping = key.mapping(version);
					if mapping.is_shared() {
						continue;
					}

					map.insert(
						(version, mapping.raw_id(version), mapping.descriptor()),
						*key,
					);
				}
			}

			map
		});

		let descriptor = match frame {
			Frame::UserText(frame) => Some(frame.description.as_str()),
			Frame::UserUrl(frame) => Some(frame.description.as_str()),
			Frame::Comment(frame) => Some(frame.description.as_str()),
			Frame::UniqueFileIdentifier(frame) => Some(frame.owner.as_str()),
			Frame::KeyValue(_) => return None,
			_ => None,
		};

		map.get(&(version, frame.id_str(), descriptor)).copied()
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldKey, FieldMapping};
	use crate::id3::v2::{FrameId, Id3v2Version};

	use std::collections::HashSet;

	#[test_log::test]
	fn every_key_maps_in_every_version() {
		for key in FieldKey::ALL {
			for version in Id3v2Version::ALL {
				let id = key.mapping(version).frame_id(version);
				assert!(
					FrameId::new(id.as_str().to_owned()).is_ok(),
					"{key} has an invalid frame ID in {version}"
				);
				assert!(
					id.is_valid_for(version),
					"{key} maps to {id}, which isn't valid for {version}"
				);
			}
		}
	}

	#[test_log::test]
	fn mappings_are_unique() {
		for version in Id3v2Version::ALL {
			let mut seen = HashSet::new();
			for key in FieldKey::ALL {
				let mapping = key.mapping(version);
				assert!(
					seen.insert((mapping.frame_id(version), mapping)),
					"{key} shares a mapping with another key in {version}"
				);
			}
		}
	}

	#[test_log::test]
	fn names_are_unique() {
		let names = FieldKey::ALL.iter().map(|k| k.name()).collect::<HashSet<_>>();
		assert_eq!(names.len(), FieldKey::ALL.len());

		for key in FieldKey::ALL {
			assert_eq!(FieldKey::from_name(key.name()), Some(*key));
		}
	}

	#[test_log::test]
	fn fallback_descriptions() {
		// No first class frame in older versions
		for key in [
			FieldKey::Mood,
			FieldKey::DiscSubtitle,
			FieldKey::ReleaseDate,
			FieldKey::EncodingTime,
		] {
			assert_eq!(
				key.mapping(Id3v2Version::V3),
				FieldMapping::UserText(key.name())
			);
			assert!(matches!(
				key.mapping(Id3v2Version::V4),
				FieldMapping::Text(_)
			));
		}

		assert_eq!(
			FieldKey::MoodValence.mapping(Id3v2Version::V2),
			FieldMapping::UserText("MOOD_VALENCE")
		);
	}
}
