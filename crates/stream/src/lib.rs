// Path: crates/stream/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # keyfmt Stream Contract
//!
//! The codec in `keyfmt-format` never touches storage directly. It talks to a
//! [`Stream`]: a sequential, seekable byte resource with one extra capability,
//! [`Stream::splice`], which deletes a byte range and lets a producer write
//! replacement bytes in its place.
//!
//! Two backends are provided:
//!
//! *   [`MemoryStream`]: a growable in-memory buffer, spliced in place.
//! *   [`FileStream`]: a locked file on disk, spliced by saving the suffix and
//!     re-appending it after the producer runs.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{ErrorCode, StreamError};
pub use file::FileStream;
pub use memory::MemoryStream;

/// Reference point for [`Stream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offset is absolute, counted from the first byte.
    Start,
    /// Offset is relative to the current cursor.
    Current,
    /// Offset is relative to the end of the stream (usually zero or negative).
    End,
}

/// A sequential, seekable byte resource.
///
/// Implementations must keep `tell()` and `size()` consistent with every
/// `read`, `write`, `seek` and `splice` they perform. A `read` returning `0`
/// signals end of stream.
pub trait Stream {
    /// Reads up to `buf.len()` bytes at the cursor and advances past them.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError>;

    /// Writes `data` at the cursor, overwriting existing bytes and extending
    /// the stream as needed. Returns the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError>;

    /// Moves the cursor. Positions outside `[0, size]` are rejected and leave
    /// the cursor where it was.
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError>;

    /// The current cursor position.
    fn tell(&self) -> u64;

    /// The total length of the stream in bytes.
    fn size(&self) -> u64;

    /// Returns true when the cursor sits at (or past) the last byte.
    fn eof(&self) -> bool {
        self.tell() >= self.size()
    }

    /// Moves the cursor back to the first byte.
    fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(0, SeekOrigin::Start).map(|_| ())
    }

    /// Removes `delete_len` bytes at the cursor and runs `producer` to write
    /// replacement bytes at the same position, shifting the rest of the stream
    /// by the length difference.
    ///
    /// On success the cursor is left immediately after the inserted bytes. If
    /// `producer` fails, the stream content and cursor are restored to their
    /// state before the call and the producer's error is returned.
    fn splice<F, E>(&mut self, delete_len: u64, producer: F) -> Result<(), E>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<(), E>,
        E: From<StreamError>;
}

/// Writes all of `data`, treating a short write as a failure.
pub fn write_all<S: Stream + ?Sized>(stream: &mut S, data: &[u8]) -> Result<(), StreamError> {
    let written = stream.write(data)?;
    if written != data.len() {
        return Err(StreamError::ShortWrite {
            expected: data.len(),
            written,
        });
    }
    Ok(())
}

/// Resolves a seek request against the current cursor and size, returning the
/// absolute target position.
pub(crate) fn resolve_seek(
    offset: i64,
    origin: SeekOrigin,
    position: u64,
    size: u64,
) -> Result<u64, StreamError> {
    let base = match origin {
        SeekOrigin::Start => 0i128,
        SeekOrigin::Current => i128::from(position),
        SeekOrigin::End => i128::from(size),
    };
    let target = base + i128::from(offset);
    if target < 0 || target > i128::from(size) {
        return Err(StreamError::OutOfRange { offset: target, size });
    }
    u64::try_from(target).map_err(|_| StreamError::OutOfRange { offset: target, size })
}
