//! Various traits and helpers for reading and writing to file-like objects

use crate::error::{Result, TagsmithError};
use crate::macros::{err, try_vec};
use crate::util::alloc::VecFallibleCapacity;

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// The size of the buffer used when moving audio data around
const SHIFT_CHUNK_SIZE: u64 = 64 * 1024;

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> crate::error::Result<u64> {
		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// Provides a method to truncate an object to the specified length
///
/// This is one component of the [`FileLike`] trait, which is used to provide implementors access to
/// file saving methods such as [`Mp3File::save_to`](crate::file::Mp3File::save_to).
///
/// Take great care in implementing this for downstream types, as tagsmith will assume that the
/// container has the new length specified. If this assumption were to be broken, files **will** become corrupted.
///
/// # Examples
///
/// ```rust
/// use tagsmith::io::Truncate;
///
/// let mut data = vec![1, 2, 3, 4, 5];
/// data.truncate(3);
///
/// assert_eq!(data, vec![1, 2, 3]);
/// ```
pub trait Truncate {
	/// The error type of the truncation operation
	type Error: Into<TagsmithError>;

	/// Truncate a storage object to the specified length
	///
	/// # Errors
	///
	/// Errors depend on the object being truncated, which may not always be fallible.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(new_len as usize);
		Ok(())
	}
}

impl<T> Truncate for Cursor<T>
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

impl<T> Truncate for &mut T
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		(**self).truncate(new_len)
	}
}

/// Provides a method to get the length of a storage object
///
/// This is one component of the [`FileLike`] trait, which is used to provide implementors access to
/// file saving methods such as [`Mp3File::save_to`](crate::file::Mp3File::save_to).
///
/// Take great care in implementing this for downstream types, as tagsmith will assume that the
/// container has the exact length specified. If this assumption were to be broken, files **may** become corrupted.
///
/// # Examples
///
/// ```rust
/// use tagsmith::io::Length;
///
/// let data = vec![1, 2, 3, 4, 5];
/// assert_eq!(data.len(), 5);
/// ```
pub trait Length {
	/// The error type of the length operation
	type Error: Into<TagsmithError>;

	/// Get the length of a storage object
	///
	/// # Errors
	///
	/// Errors depend on the object being read, which may not always be fallible.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.metadata().map(|m| m.len())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T> Length for Cursor<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

impl<T> Length for &T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

impl<T> Length for &mut T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

/// Provides a set of methods to read and write to a file-like object
///
/// This is a combination of the [`Read`], [`Write`], [`Seek`], [`Truncate`], and [`Length`] traits.
/// It is used to provide implementors access to file saving methods such as [`Mp3File::save_to`](crate::file::Mp3File::save_to).
///
/// Take great care in implementing this for downstream types, as tagsmith will assume that the
/// trait implementations are correct. If this assumption were to be broken, files **may** become corrupted.
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<TagsmithError>,
	<Self as Length>::Error: Into<TagsmithError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<TagsmithError>,
	<T as Length>::Error: Into<TagsmithError>,
{
}

/// A bounds-checked, position-based reader
///
/// Every read names its absolute offset, so callers never depend on where a previous read left
/// the stream. Reads that would pass the end of the stream fail with
/// [`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch) rather than returning short data.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use tagsmith::io::FileOperator;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut operator = FileOperator::new(Cursor::new(vec![0, 0, 0, 1, 2]))?;
///
/// assert_eq!(operator.read_at(3, 2)?, vec![1, 2]);
/// assert!(operator.is_range_null(0, 3)?);
/// assert!(operator.read_at(4, 2).is_err());
/// # Ok(()) }
/// ```
pub struct FileOperator<R> {
	reader: R,
	len: u64,
}

impl<R> FileOperator<R>
where
	R: Read + Seek,
{
	/// Wrap a reader, recording its current length
	///
	/// # Errors
	///
	/// * Unable to determine the length of the stream
	pub fn new(mut reader: R) -> Result<Self> {
		let len = reader.stream_len_hack()?;
		Ok(Self { reader, len })
	}

	/// The length of the underlying stream when it was wrapped
	pub fn len(&self) -> u64 {
		self.len
	}

	fn check_bounds(&self, pos: u64, len: u64) -> Result<()> {
		match pos.checked_add(len) {
			Some(end) if end <= self.len => Ok(()),
			_ => err!(SizeMismatch),
		}
	}

	/// Fill `buf` with the bytes starting at `pos`
	///
	/// # Errors
	///
	/// * The range passes the end of the stream
	/// * The underlying reader fails
	pub fn read_exact_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
		self.check_bounds(pos, buf.len() as u64)?;

		self.reader.seek(SeekFrom::Start(pos))?;
		self.reader.read_exact(buf)?;

		Ok(())
	}

	/// Read `len` bytes starting at `pos`
	///
	/// # Errors
	///
	/// * The range passes the end of the stream
	/// * The underlying reader fails
	pub fn read_at(&mut self, pos: u64, len: u64) -> Result<Vec<u8>> {
		self.check_bounds(pos, len)?;

		let mut content = Vec::try_with_capacity_stable(len as usize)?;
		self.reader.seek(SeekFrom::Start(pos))?;
		self.reader
			.by_ref()
			.take(len)
			.read_to_end(&mut content)?;

		Ok(content)
	}

	/// Whether every byte in `start..end` is zero
	///
	/// An empty range is considered null.
	///
	/// # Errors
	///
	/// * The range passes the end of the stream
	/// * The underlying reader fails
	pub fn is_range_null(&mut self, start: u64, end: u64) -> Result<bool> {
		if end <= start {
			return Ok(true);
		}

		self.check_bounds(start, end - start)?;
		self.reader.seek(SeekFrom::Start(start))?;

		let mut remaining = end - start;
		let mut buf = [0; 4096];
		while remaining > 0 {
			let chunk = std::cmp::min(remaining, buf.len() as u64) as usize;
			self.reader.read_exact(&mut buf[..chunk])?;

			if buf[..chunk].iter().any(|b| *b != 0) {
				return Ok(false);
			}

			remaining -= chunk as u64;
		}

		Ok(true)
	}

	/// Access the underlying reader
	pub fn get_mut(&mut self) -> &mut R {
		&mut self.reader
	}

	/// Unwrap the underlying reader
	pub fn into_inner(self) -> R {
		self.reader
	}
}

/// Move everything from `from` to the end of the file `delta` bytes towards the end
///
/// The file grows by `delta` bytes. Data is copied from the end of the file backwards, so no byte is
/// overwritten before it has been moved. The bytes in `from..from + delta` are left as they were.
pub(crate) fn shift_right<F>(file: &mut F, from: u64, delta: u64) -> Result<()>
where
	F: FileLike,
	TagsmithError: From<<F as Length>::Error>,
{
	if delta == 0 {
		return Ok(());
	}

	let file_len = file.len()?;
	if from > file_len {
		err!(SizeMismatch);
	}

	// Extend the file first, so a failure here leaves the existing content untouched
	file.seek(SeekFrom::Start(file_len))?;
	let zeroes = [0; 4096];
	let mut to_extend = delta;
	while to_extend > 0 {
		let chunk = std::cmp::min(to_extend, zeroes.len() as u64) as usize;
		file.write_all(&zeroes[..chunk])?;
		to_extend -= chunk as u64;
	}

	let mut buf = try_vec![0; std::cmp::min(SHIFT_CHUNK_SIZE, file_len - from) as usize];
	let mut end = file_len;
	while end > from {
		let chunk = std::cmp::min(end - from, buf.len() as u64);
		let start = end - chunk;

		file.seek(SeekFrom::Start(start))?;
		file.read_exact(&mut buf[..chunk as usize])?;

		file.seek(SeekFrom::Start(start + delta))?;
		file.write_all(&buf[..chunk as usize])?;

		end = start;
	}

	log::trace!("Shifted {} bytes right by {delta}", file_len - from);
	Ok(())
}

/// Move everything from `from` to the end of the file `delta` bytes towards the start
///
/// Data is copied from `from` forwards, then the file is truncated by `delta` bytes.
pub(crate) fn shift_left<F>(file: &mut F, from: u64, delta: u64) -> Result<()>
where
	F: FileLike,
	TagsmithError: From<<F as Truncate>::Error>,
	TagsmithError: From<<F as Length>::Error>,
{
	if delta == 0 {
		return Ok(());
	}

	let file_len = file.len()?;
	if delta > from || from > file_len {
		err!(SizeMismatch);
	}

	let mut buf = try_vec![0; std::cmp::min(SHIFT_CHUNK_SIZE, file_len - from) as usize];
	let mut start = from;
	while start < file_len {
		let chunk = std::cmp::min(file_len - start, buf.len() as u64);

		file.seek(SeekFrom::Start(start))?;
		file.read_exact(&mut buf[..chunk as usize])?;

		file.seek(SeekFrom::Start(start - delta))?;
		file.write_all(&buf[..chunk as usize])?;

		start += chunk;
	}

	file.truncate(file_len - delta)?;

	log::trace!("Shifted {} bytes left by {delta}", file_len - from);
	Ok(())
}
