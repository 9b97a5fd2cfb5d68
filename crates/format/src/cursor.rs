// Path: crates/format/src/cursor.rs

//! Byte-at-a-time view over a stream read in fixed-size chunks.

use keyfmt_stream::{SeekOrigin, Stream, StreamError};

/// Pulls bytes from a stream in chunks and reports the absolute offset of
/// every byte handed out, so a scan can stop on any byte and put the stream
/// cursor exactly there regardless of where the chunk boundaries fell.
pub(crate) struct ScanCursor<'s, S: Stream> {
    stream: &'s mut S,
    chunk: Vec<u8>,
    /// Absolute offset of `chunk[0]`.
    chunk_start: u64,
    filled: usize,
    index: usize,
}

impl<'s, S: Stream> ScanCursor<'s, S> {
    pub(crate) fn new(stream: &'s mut S, chunk_size: usize) -> Self {
        let chunk_start = stream.tell();
        Self {
            stream,
            chunk: vec![0; chunk_size.max(1)],
            chunk_start,
            filled: 0,
            index: 0,
        }
    }

    /// Returns the next byte and its absolute offset, or `None` at end of stream.
    pub(crate) fn next_byte(&mut self) -> Result<Option<(u64, u8)>, StreamError> {
        if self.index >= self.filled {
            self.chunk_start += self.filled as u64;
            self.index = 0;
            self.filled = self.stream.read(&mut self.chunk)?;
            if self.filled == 0 {
                return Ok(None);
            }
        }
        let Some(&byte) = self.chunk.get(self.index) else {
            return Ok(None);
        };
        let offset = self.chunk_start + self.index as u64;
        self.index += 1;
        Ok(Some((offset, byte)))
    }

    /// Absolute offset of the byte the next call to `next_byte` would return.
    pub(crate) fn offset(&self) -> u64 {
        self.chunk_start + self.index as u64
    }

    /// Moves the stream cursor to `offset`, undoing any read-ahead.
    pub(crate) fn park(&mut self, offset: u64) -> Result<(), StreamError> {
        seek_to(&mut *self.stream, offset)
    }
}

/// Seeks to an absolute offset.
pub(crate) fn seek_to<S: Stream + ?Sized>(stream: &mut S, offset: u64) -> Result<(), StreamError> {
    let target = i64::try_from(offset).map_err(|_| StreamError::OutOfRange {
        offset: i128::from(offset),
        size: stream.size(),
    })?;
    stream.seek(target, SeekOrigin::Start)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfmt_stream::MemoryStream;

    #[test]
    fn test_offsets_survive_chunk_boundaries() {
        for chunk in [1, 2, 3, 64] {
            let mut stream = MemoryStream::from_bytes(b"abcdefg".to_vec());
            stream.seek(2, SeekOrigin::Start).unwrap();
            let mut cursor = ScanCursor::new(&mut stream, chunk);
            let mut seen = Vec::new();
            while let Some((offset, byte)) = cursor.next_byte().unwrap() {
                seen.push((offset, byte));
            }
            assert_eq!(cursor.offset(), 7);
            assert_eq!(seen.first(), Some(&(2, b'c')));
            assert_eq!(seen.last(), Some(&(6, b'g')));
            assert_eq!(seen.len(), 5);
        }
    }

    #[test]
    fn test_park_rewinds_read_ahead() {
        let mut stream = MemoryStream::from_bytes(b"key: value\n".to_vec());
        {
            let mut cursor = ScanCursor::new(&mut stream, 32);
            while let Some((offset, byte)) = cursor.next_byte().unwrap() {
                if byte == b':' {
                    cursor.park(offset).unwrap();
                    break;
                }
            }
        }
        assert_eq!(stream.tell(), 3);
    }
}
