//! Various configuration options to control tagsmith
//!
//! Options are plain values. Every read takes a [`ParseOptions`] and every write takes a
//! [`WriteOptions`], there is no process-wide state.

mod parse_options;
mod write_options;

pub use parse_options::{ParseOptions, ParsingMode};
pub use write_options::WriteOptions;
