// Path: crates/stream/src/error.rs

//! Error types for stream backends.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Failures reported by a [`Stream`](crate::Stream) implementation.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying storage reported an I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A seek or splice addressed a position outside the stream.
    #[error("position {offset} is outside the stream (size {size})")]
    OutOfRange {
        /// The rejected absolute position.
        offset: i128,
        /// The stream size at the time of the request.
        size: u64,
    },
    /// Fewer bytes were written than requested.
    #[error("short write: expected {expected} bytes, wrote {written}")]
    ShortWrite {
        /// The number of bytes requested.
        expected: usize,
        /// The number of bytes actually written.
        written: usize,
    },
}

impl ErrorCode for StreamError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STREAM_IO",
            Self::OutOfRange { .. } => "STREAM_OUT_OF_RANGE",
            Self::ShortWrite { .. } => "STREAM_SHORT_WRITE",
        }
    }
}
