// Path: crates/format/src/reader.rs

//! Reading values of a located key.

use crate::codec::Codec;
use crate::consts::{EOL, EOL_IGNORE, SPACE};
use crate::cursor::{seek_to, ScanCursor};
use crate::error::{FormatError, Result};
use crate::value::{Value, ValueType};
use keyfmt_stream::Stream;
use std::borrow::Cow;

/// One value token read from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The raw token bytes.
    pub bytes: Vec<u8>,
    /// True when the token is the last one on its line.
    pub last: bool,
}

impl Token {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl Codec {
    /// Reads the remainder of the current line as raw text.
    ///
    /// Ignorable bytes are dropped. The cursor is left on the line
    /// terminator, or at the end of the stream. An empty line yields an
    /// empty string.
    pub fn read_line<S: Stream>(&self, stream: &mut S) -> Result<String> {
        let mut cursor = ScanCursor::new(stream, self.chunk_size());
        let mut line = Vec::new();

        while let Some((offset, byte)) = cursor.next_byte()? {
            match byte {
                EOL => {
                    cursor.park(offset)?;
                    break;
                }
                EOL_IGNORE => {}
                _ => line.push(byte),
            }
        }

        String::from_utf8(line).map_err(|e| FormatError::Parse {
            value_type: ValueType::Text,
            token: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Finds `key` and reads its value as one line of text.
    pub fn read_text<S: Stream>(&self, stream: &mut S, key: &str, strict: bool) -> Result<String> {
        self.seek_to_key(stream, key, strict)?;
        let text = self.read_line(stream)?;
        if text.is_empty() {
            return Err(FormatError::NoValue(key.to_string()));
        }
        Ok(text)
    }

    /// Reads the next value token.
    ///
    /// Leading spaces are skipped. After a token the cursor rests on the byte
    /// that ended it: a space (`last == false`), or the line terminator or end
    /// of stream (`last == true`). Reaching the end of the line before any
    /// token byte is a [`FormatError::Malformed`] error.
    pub fn read_token<S: Stream>(&self, stream: &mut S) -> Result<Token> {
        self.next_token(stream)?
            .ok_or_else(|| FormatError::Malformed("no value token before end of line".into()))
    }

    /// `None` when the line (or stream) ends before a token starts.
    fn next_token<S: Stream>(&self, stream: &mut S) -> Result<Option<Token>> {
        let mut cursor = ScanCursor::new(stream, self.chunk_size());
        let mut bytes = Vec::new();

        while let Some((offset, byte)) = cursor.next_byte()? {
            match byte {
                EOL => {
                    cursor.park(offset)?;
                    if bytes.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(Token { bytes, last: true }));
                }
                SPACE if bytes.is_empty() => {}
                SPACE => {
                    cursor.park(offset)?;
                    return Ok(Some(Token { bytes, last: false }));
                }
                EOL_IGNORE => {}
                _ => bytes.push(byte),
            }
        }

        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Token { bytes, last: true }))
    }

    /// Finds `key` and reads exactly `count` scalar values of `value_type`.
    ///
    /// The record must hold exactly `count` tokens; fewer or more is an
    /// [`FormatError::ArityMismatch`]. The first token that fails to parse
    /// aborts the read.
    pub fn read_values<S: Stream>(
        &self,
        stream: &mut S,
        key: &str,
        value_type: ValueType,
        count: usize,
        strict: bool,
    ) -> Result<Vec<Value>> {
        if matches!(value_type, ValueType::Text | ValueType::Ignore) {
            return Err(FormatError::UnsupportedType(value_type));
        }

        self.seek_to_key(stream, key, strict)?;

        let arity = || FormatError::ArityMismatch {
            key: key.to_string(),
            expected: count,
        };

        if count == 0 {
            return match self.next_token(stream)? {
                None => Ok(Vec::new()),
                Some(_) => Err(arity()),
            };
        }

        let mut values = Vec::with_capacity(count);
        for i in 0..count {
            let token = match self.next_token(stream)? {
                Some(token) => token,
                None if i == 0 => return Err(FormatError::NoValue(key.to_string())),
                None => {
                    return Err(FormatError::Malformed(format!(
                        "trailing separator after value {} of {:?}",
                        i, key
                    )))
                }
            };

            values.push(value_type.parse_token(&token.bytes)?);

            let is_final = i + 1 == count;
            if token.last != is_final {
                tracing::debug!(
                    target: "format",
                    "Arity mismatch on {:?}: expected {}, line ended after {}",
                    key,
                    count,
                    if token.last { (i + 1).to_string() } else { format!("more than {}", count) }
                );
                return Err(arity());
            }
        }

        Ok(values)
    }

    /// Counts the value tokens of `key` without moving the cursor.
    ///
    /// The cursor is restored to its position before the call whether or not
    /// the count succeeds.
    pub fn count_values<S: Stream>(&self, stream: &mut S, key: &str, strict: bool) -> Result<usize> {
        let position = stream.tell();
        let counted = self.count_from_key(stream, key, strict);
        seek_to(stream, position)?;
        counted
    }

    fn count_from_key<S: Stream>(&self, stream: &mut S, key: &str, strict: bool) -> Result<usize> {
        self.seek_to_key(stream, key, strict)?;

        let mut count = 0usize;
        loop {
            let Some(token) = self.next_token(stream)? else {
                return Err(if count == 0 {
                    FormatError::NoValue(key.to_string())
                } else {
                    FormatError::Malformed(format!("trailing separator in {:?}", key))
                });
            };
            count += 1;
            if token.last {
                return Ok(count);
            }
        }
    }
}
