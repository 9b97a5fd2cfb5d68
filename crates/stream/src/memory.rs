// Path: crates/stream/src/memory.rs

//! A growable in-memory stream.

use crate::{resolve_seek, SeekOrigin, Stream, StreamError};

/// An in-memory [`Stream`] backed by a `Vec<u8>`.
///
/// Writes behave like writes to a file: bytes under the cursor are
/// overwritten and the buffer grows when the cursor runs past its end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStream {
    data: Vec<u8>,
    position: usize,
}

impl MemoryStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream holding `data`, with the cursor at the start.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }

    /// The full content of the stream.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the stream and returns its content.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn position_u64(&self) -> u64 {
        self.position as u64
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let remaining = self.data.get(self.position..).unwrap_or_default();
        let count = remaining.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..count), remaining.get(..count)) {
            dst.copy_from_slice(src);
        }
        self.position += count;
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        let end = self.position + data.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        if let Some(dst) = self.data.get_mut(self.position..end) {
            dst.copy_from_slice(data);
        }
        self.position = end;
        Ok(data.len())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
        let target = resolve_seek(offset, origin, self.position_u64(), self.size())?;
        self.position = target as usize;
        Ok(target)
    }

    fn tell(&self) -> u64 {
        self.position_u64()
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn splice<F, E>(&mut self, delete_len: u64, producer: F) -> Result<(), E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
        E: From<StreamError>,
    {
        let start = self.position;
        let cut_end = self.position_u64().saturating_add(delete_len);
        if cut_end > self.size() {
            return Err(StreamError::OutOfRange {
                offset: i128::from(cut_end),
                size: self.size(),
            }
            .into());
        }

        // The suffix holds the deleted range followed by the untouched tail.
        let suffix = self.data.split_off(start);
        let deleted = delete_len as usize;

        match producer(self) {
            Ok(()) => {
                let insert_end = self.position;
                self.data.truncate(insert_end);
                self.data
                    .extend_from_slice(suffix.get(deleted..).unwrap_or_default());
                self.position = insert_end;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "stream", "Splice producer failed, restoring {} bytes at {}", suffix.len(), start);
                self.data.truncate(start);
                self.data.extend_from_slice(&suffix);
                self.position = start;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_seek() {
        let mut stream = MemoryStream::from_bytes(b"hello world".to_vec());
        let mut buf = [0u8; 5];
        assert_eq!(stream.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(stream.tell(), 5);

        stream.seek(-5, SeekOrigin::End).unwrap();
        stream.write(b"there!").unwrap();
        assert_eq!(stream.as_bytes(), b"hello there!");
        assert!(stream.eof());

        assert!(stream.seek(1, SeekOrigin::Current).is_err());
        assert_eq!(stream.tell(), 12);

        let mut rest = [0u8; 4];
        assert_eq!(stream.read(&mut rest).unwrap(), 0);
    }

    #[test]
    fn test_splice_shrinks_and_grows() {
        let mut stream = MemoryStream::from_bytes(b"aaa:1\nbbb:22\nccc:3\n".to_vec());
        stream.seek(6, SeekOrigin::Start).unwrap();
        stream
            .splice::<_, StreamError>(7, |s| {
                s.write(b"b:9\n")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(stream.as_bytes(), b"aaa:1\nb:9\nccc:3\n");
        assert_eq!(stream.tell(), 10);

        stream.seek(0, SeekOrigin::Start).unwrap();
        stream
            .splice::<_, StreamError>(0, |s| {
                s.write(b"# header\n")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(stream.as_bytes(), b"# header\naaa:1\nb:9\nccc:3\n");
        assert_eq!(stream.tell(), 9);
    }

    #[test]
    fn test_splice_rolls_back_on_failure() {
        let original = b"key: value\nnext: 1\n".to_vec();
        let mut stream = MemoryStream::from_bytes(original.clone());
        stream.seek(0, SeekOrigin::Start).unwrap();

        let result = stream.splice(11, |s| {
            s.write(b"partial")?;
            Err(StreamError::ShortWrite {
                expected: 10,
                written: 7,
            })
        });

        assert!(result.is_err());
        assert_eq!(stream.as_bytes(), original.as_slice());
        assert_eq!(stream.tell(), 0);
    }

    #[test]
    fn test_splice_past_end_is_rejected() {
        let mut stream = MemoryStream::from_bytes(b"abc".to_vec());
        stream.seek(2, SeekOrigin::Start).unwrap();
        let result = stream.splice::<_, StreamError>(5, |_| Ok(()));
        assert!(matches!(result, Err(StreamError::OutOfRange { .. })));
        assert_eq!(stream.as_bytes(), b"abc");
    }
}
