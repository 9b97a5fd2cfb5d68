// Path: crates/format/src/error.rs

//! Error types for the key-value codec.

use crate::value::ValueType;
use keyfmt_stream::{ErrorCode, StreamError};
use thiserror::Error;

/// Every failure the codec can report.
///
/// Parse and structure failures abort the current operation only. Stream
/// failures are passed through unchanged; the codec never retries.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The key is absent, or a strict lookup hit a different key first.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// The token stream does not follow the line grammar.
    #[error("malformed record: {0}")]
    Malformed(String),
    /// The record exists but carries no value.
    #[error("key has no value: {0}")]
    NoValue(String),
    /// The record holds a different number of values than requested.
    #[error("key {key}: expected exactly {expected} values")]
    ArityMismatch {
        /// The key being read.
        key: String,
        /// The number of values requested.
        expected: usize,
    },
    /// A token could not be decoded as the requested type.
    #[error("cannot parse {token:?} as {value_type}")]
    Parse {
        /// The requested type.
        value_type: ValueType,
        /// The offending token.
        token: String,
    },
    /// The operation does not support the given value type.
    #[error("unsupported value type for this operation: {0}")]
    UnsupportedType(ValueType),
    /// The key is empty, contains a reserved byte, or starts with the comment marker.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    /// Text to be written contains a line terminator.
    #[error("text contains a line terminator")]
    InvalidText,
    /// The stream's contents disagree with its reported size.
    #[error("corrupt layout: {0}")]
    CorruptLayout(String),
    /// A header record does not hold the expected value.
    #[error("header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        /// The expected value.
        expected: String,
        /// The value found in the stream.
        found: String,
    },
    /// The underlying stream failed.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

impl ErrorCode for FormatError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound(_) => "FORMAT_KEY_NOT_FOUND",
            Self::Malformed(_) => "FORMAT_MALFORMED",
            Self::NoValue(_) => "FORMAT_NO_VALUE",
            Self::ArityMismatch { .. } => "FORMAT_ARITY_MISMATCH",
            Self::Parse { .. } => "FORMAT_PARSE_FAILED",
            Self::UnsupportedType(_) => "FORMAT_UNSUPPORTED_TYPE",
            Self::InvalidKey(_) => "FORMAT_INVALID_KEY",
            Self::InvalidText => "FORMAT_INVALID_TEXT",
            Self::CorruptLayout(_) => "FORMAT_CORRUPT_LAYOUT",
            Self::HeaderMismatch { .. } => "FORMAT_HEADER_MISMATCH",
            Self::Stream(e) => e.code(),
        }
    }
}

/// Convenience alias for codec results.
pub type Result<T> = std::result::Result<T, FormatError>;
