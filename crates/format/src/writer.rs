// Path: crates/format/src/writer.rs

//! Writing records and comments.

use crate::codec::Codec;
use crate::consts::{COMMENT, DELIMITER, EOL, EOL_IGNORE, SPACE};
use crate::error::{FormatError, Result};
use crate::value::{ValueType, Values};
use keyfmt_stream::{write_all, Stream};

/// A record to write: a key and its typed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteRequest<'a> {
    pub key: &'a str,
    pub values: Values<'a>,
}

impl<'a> WriteRequest<'a> {
    pub fn new(key: &'a str, values: Values<'a>) -> Self {
        Self { key, values }
    }

    pub fn value_type(&self) -> ValueType {
        self.values.value_type()
    }

    pub fn count(&self) -> usize {
        self.values.count()
    }
}

/// Rejects keys the scanner could not find again.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let bytes = key.as_bytes();
    let reserved = bytes
        .iter()
        .any(|b| matches!(*b, DELIMITER | EOL | EOL_IGNORE));
    if bytes.is_empty() || reserved || bytes.first() == Some(&COMMENT) {
        return Err(FormatError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl Codec {
    /// Writes `key: v1 v2 ...` followed by a line terminator at the cursor.
    ///
    /// An [`Values::Ignore`] request writes nothing. Text is written verbatim,
    /// spaces included.
    pub fn write_record<S: Stream>(&self, stream: &mut S, request: &WriteRequest<'_>) -> Result<()> {
        if request.value_type() == ValueType::Ignore {
            return Ok(());
        }

        validate_key(request.key)?;
        if let Values::Text(text) = request.values {
            if text.as_bytes().contains(&EOL) {
                return Err(FormatError::InvalidText);
            }
        }

        let mut line = String::with_capacity(request.key.len() + 3 + request.count() * 4);
        line.push_str(request.key);
        line.push(char::from(DELIMITER));
        line.push(char::from(SPACE));
        request.values.format_into(&mut line);
        line.push(char::from(EOL));

        tracing::trace!(target: "format", "Writing {} {} value(s) for {:?}", request.count(), request.value_type(), request.key);
        write_all(stream, line.as_bytes())?;
        Ok(())
    }

    /// Writes `# text` followed by a line terminator at the cursor.
    pub fn write_comment<S: Stream>(&self, stream: &mut S, text: &str) -> Result<()> {
        if text.as_bytes().contains(&EOL) {
            return Err(FormatError::InvalidText);
        }
        write_all(stream, &[COMMENT, SPACE])?;
        write_all(stream, text.as_bytes())?;
        write_all(stream, &[EOL])?;
        Ok(())
    }
}
