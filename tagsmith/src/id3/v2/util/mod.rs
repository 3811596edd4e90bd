//! Utilities for working with ID3v2 tags

pub mod genres;
pub mod synchsafe;
