/// Options to control how tagsmith parses a file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) read_id3v2: bool,
	pub(crate) read_id3v1: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	read_id3v2: true,
	/// 	read_id3v1: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			read_id3v2: true,
			read_id3v1: true,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether or not to read an ID3v2 tag
	///
	/// The audio start is still resolved when this is disabled, so the file can be saved safely.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::ParseOptions;
	///
	/// // I only care about the ID3v1 trailer
	/// let parsing_options = ParseOptions::new().read_id3v2(false);
	/// ```
	pub fn read_id3v2(&mut self, read_id3v2: bool) -> Self {
		self.read_id3v2 = read_id3v2;
		*self
	}

	/// Whether or not to read an ID3v1 tag
	pub fn read_id3v1(&mut self, read_id3v1: bool) -> Self {
		self.read_id3v1 = read_id3v1;
		*self
	}
}

/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust,no_run
/// use tagsmith::config::{ParseOptions, ParsingMode};
/// use tagsmith::file::Mp3File;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// // We only want to read spec-compliant inputs
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// let file = Mp3File::open("foo.mp3", parsing_options)?;
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The parser will error and the entire input is discarded
	/// * A frame ID that is invalid for the tag version - The parser will error
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - If the frame is not required, it is discarded
	/// * A frame overruns the tag - The rest of the tag is treated as padding
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The frame is kept as a binary frame
	/// * A frame ID that is invalid for the tag version - The rest of the tag is treated as padding
	Relaxed,
}
