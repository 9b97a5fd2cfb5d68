// Path: crates/format/src/scanner.rs

//! Line scanning and key lookup.
//!
//! The scanner walks the stream byte by byte (fed by [`ScanCursor`]) with two
//! flags: whether bytes are currently collected into a candidate key, and
//! whether no content byte has been seen since the last line break. A key is
//! reported when a delimiter follows collected key bytes; comment lines and
//! lines opening with a delimiter are skipped to their end.

use crate::codec::Codec;
use crate::consts::{COMMENT, DELIMITER, EOL, EOL_IGNORE, SPACE};
use crate::cursor::{seek_to, ScanCursor};
use crate::error::{FormatError, Result};
use keyfmt_stream::Stream;
use std::borrow::Cow;

/// A key found by [`Codec::scan_next_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedKey {
    /// The key bytes, with ignorable bytes removed.
    pub key: Vec<u8>,
    /// Absolute offset of the first byte of the key's line, ignorable bytes
    /// included. Equal to the scan start when the key began mid-line.
    pub key_start: u64,
    /// Absolute offset of the delimiter that ended the key.
    pub delimiter_offset: u64,
}

impl ScannedKey {
    pub fn key_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }
}

impl Codec {
    /// Scans forward to the next key.
    ///
    /// On success the stream cursor points at the key's delimiter. Returns
    /// `None` when the stream ends first.
    pub fn scan_next_key<S: Stream>(&self, stream: &mut S) -> Result<Option<ScannedKey>> {
        let mut cursor = ScanCursor::new(stream, self.chunk_size());
        let mut key = Vec::new();
        let mut key_start = cursor.offset();
        let mut accumulating = true;
        let mut at_line_start = true;

        while let Some((offset, byte)) = cursor.next_byte()? {
            match byte {
                EOL => {
                    key.clear();
                    key_start = offset + 1;
                    accumulating = true;
                    at_line_start = true;
                }
                EOL_IGNORE => {}
                COMMENT if at_line_start => {
                    accumulating = false;
                    at_line_start = false;
                }
                DELIMITER => {
                    if at_line_start {
                        // Delimiter without a key: drop the rest of the line.
                        key.clear();
                        accumulating = false;
                        at_line_start = false;
                    } else if accumulating {
                        cursor.park(offset)?;
                        return Ok(Some(ScannedKey {
                            key,
                            key_start,
                            delimiter_offset: offset,
                        }));
                    }
                }
                _ => {
                    at_line_start = false;
                    if accumulating {
                        key.push(byte);
                    }
                }
            }
        }

        Ok(None)
    }

    /// Moves the cursor to the first value of `key`.
    ///
    /// In strict mode the first key that does not match ends the search with
    /// [`FormatError::KeyNotFound`]; otherwise non-matching keys are skipped.
    pub fn seek_to_key<S: Stream>(&self, stream: &mut S, key: &str, strict: bool) -> Result<()> {
        self.locate_key(stream, key, strict).map(|_| ())
    }

    /// Like [`seek_to_key`](Self::seek_to_key), returning where the key was found.
    pub(crate) fn locate_key<S: Stream>(&self, stream: &mut S, key: &str, strict: bool) -> Result<ScannedKey> {
        while !stream.eof() {
            let Some(found) = self.scan_next_key(stream)? else {
                break;
            };

            if found.key == key.as_bytes() {
                self.skip_separator(stream, found.delimiter_offset)?;
                tracing::trace!(target: "format", "Found key {:?} at {}", key, found.delimiter_offset);
                return Ok(found);
            }

            if strict {
                tracing::debug!(
                    target: "format",
                    "Strict lookup for {:?} stopped at key {:?}",
                    key,
                    found.key_text()
                );
                return Err(FormatError::KeyNotFound(key.to_string()));
            }
        }

        Err(FormatError::KeyNotFound(key.to_string()))
    }

    /// Steps over the delimiter and the single space after it. A record
    /// without that space keeps its line terminator in front of the cursor.
    fn skip_separator<S: Stream>(&self, stream: &mut S, delimiter_offset: u64) -> Result<()> {
        let value_start = delimiter_offset + 1;
        seek_to(stream, value_start)?;
        let mut next = [0u8; 1];
        if stream.read(&mut next)? == 1 && next == [SPACE] {
            return Ok(());
        }
        seek_to(stream, value_start)?;
        Ok(())
    }

    /// Lists every key from the cursor to the end of the stream, in order.
    pub fn keys<S: Stream>(&self, stream: &mut S) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        while let Some(found) = self.scan_next_key(stream)? {
            keys.push(found.key_text().into_owned());
        }
        Ok(keys)
    }

    /// Moves the cursor just past the next line terminator and returns that
    /// offset, or the end of the stream when no terminator follows.
    pub(crate) fn seek_to_next_line<S: Stream>(&self, stream: &mut S) -> Result<u64> {
        let mut cursor = ScanCursor::new(stream, self.chunk_size());
        while let Some((offset, byte)) = cursor.next_byte()? {
            if byte == EOL {
                let next_line = offset + 1;
                cursor.park(next_line)?;
                return Ok(next_line);
            }
        }
        Ok(cursor.offset())
    }
}
