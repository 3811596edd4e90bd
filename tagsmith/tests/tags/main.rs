#![allow(missing_docs)]

mod conversions;
mod id3v1;
