// Path: crates/format/src/keyfile.rs

//! A stream paired with a codec and a lookup mode.

use crate::codec::Codec;
use crate::config::FormatConfig;
use crate::consts::{EOL, FILETYPE_KEY, VERSION_KEY};
use crate::cursor::seek_to;
use crate::error::{FormatError, Result};
use crate::value::{Scalar, Values};
use crate::writer::WriteRequest;
use keyfmt_stream::{write_all, SeekOrigin, Stream};

/// Typed access to a key-value stream.
///
/// Reads and lookups start at the current cursor, so a file written in a
/// fixed key order can be read back sequentially (in strict mode, a key out
/// of order is an error rather than a skip). Call [`rewind`](Self::rewind) to
/// search from the start. Updates always search from the start.
#[derive(Debug)]
pub struct KeyFile<S: Stream> {
    stream: S,
    codec: Codec,
    strict: bool,
}

impl<S: Stream> KeyFile<S> {
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, &FormatConfig::default())
    }

    pub fn with_config(stream: S, config: &FormatConfig) -> Self {
        Self {
            stream,
            codec: Codec::from_config(config),
            strict: config.strict,
        }
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.stream.rewind()?;
        Ok(())
    }

    pub fn seek_to_end(&mut self) -> Result<()> {
        self.stream.seek(0, SeekOrigin::End)?;
        Ok(())
    }

    /// Whether `key` appears anywhere in the stream. The cursor is preserved.
    pub fn key_exists(&mut self, key: &str) -> Result<bool> {
        let position = self.stream.tell();
        self.stream.rewind()?;
        let found = match self.codec.seek_to_key(&mut self.stream, key, false) {
            Ok(()) => Ok(true),
            Err(FormatError::KeyNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        };
        seek_to(&mut self.stream, position)?;
        found
    }

    /// Number of values stored under `key`. The cursor is preserved.
    pub fn value_count(&mut self, key: &str) -> Result<usize> {
        self.codec.count_values(&mut self.stream, key, self.strict)
    }

    /// Every key in the stream, in order. The cursor is preserved.
    pub fn keys(&mut self) -> Result<Vec<String>> {
        let position = self.stream.tell();
        self.stream.rewind()?;
        let keys = self.codec.keys(&mut self.stream);
        seek_to(&mut self.stream, position)?;
        keys
    }

    /// Writes the `Filetype` and `Version` records at the cursor.
    pub fn write_header(&mut self, filetype: &str, version: u32) -> Result<()> {
        self.write_string(FILETYPE_KEY, filetype)?;
        self.write(VERSION_KEY, version)
    }

    /// Reads the `Filetype` and `Version` records from the cursor.
    pub fn read_header(&mut self) -> Result<(String, u32)> {
        let filetype = self.read_string(FILETYPE_KEY)?;
        let version = self.read(VERSION_KEY)?;
        Ok((filetype, version))
    }

    /// Reads the header and checks it against the expected file type and version.
    pub fn check_header(&mut self, filetype: &str, version: u32) -> Result<()> {
        let (found_type, found_version) = self.read_header()?;
        if found_type != filetype {
            return Err(FormatError::HeaderMismatch {
                expected: filetype.to_string(),
                found: found_type,
            });
        }
        if found_version != version {
            return Err(FormatError::HeaderMismatch {
                expected: version.to_string(),
                found: found_version.to_string(),
            });
        }
        Ok(())
    }

    pub fn read_string(&mut self, key: &str) -> Result<String> {
        self.codec.read_text(&mut self.stream, key, self.strict)
    }

    pub fn read<T: Scalar>(&mut self, key: &str) -> Result<T> {
        let mut values = self.read_array::<T>(key, 1)?;
        values.pop().ok_or_else(|| FormatError::NoValue(key.to_string()))
    }

    pub fn read_array<T: Scalar>(&mut self, key: &str, count: usize) -> Result<Vec<T>> {
        self.codec
            .read_values(&mut self.stream, key, T::VALUE_TYPE, count, self.strict)?
            .into_iter()
            .map(|value| T::from_value(value).ok_or(FormatError::UnsupportedType(T::VALUE_TYPE)))
            .collect()
    }

    pub fn write_string(&mut self, key: &str, text: &str) -> Result<()> {
        self.write_values(key, Values::Text(text))
    }

    pub fn write<T: Scalar>(&mut self, key: &str, value: T) -> Result<()> {
        self.write_array(key, std::slice::from_ref(&value))
    }

    pub fn write_array<T: Scalar>(&mut self, key: &str, values: &[T]) -> Result<()> {
        self.write_values(key, T::as_values(values))
    }

    pub fn write_values(&mut self, key: &str, values: Values<'_>) -> Result<()> {
        self.codec
            .write_record(&mut self.stream, &WriteRequest::new(key, values))
    }

    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        self.codec.write_comment(&mut self.stream, text)
    }

    pub fn update_string(&mut self, key: &str, text: &str) -> Result<()> {
        self.update_values(key, Values::Text(text))
    }

    pub fn update<T: Scalar>(&mut self, key: &str, value: T) -> Result<()> {
        self.update_array(key, std::slice::from_ref(&value))
    }

    pub fn update_array<T: Scalar>(&mut self, key: &str, values: &[T]) -> Result<()> {
        self.update_values(key, T::as_values(values))
    }

    /// Replaces the values of an existing key. Fails with
    /// [`FormatError::KeyNotFound`] if the key is absent.
    pub fn update_values(&mut self, key: &str, values: Values<'_>) -> Result<()> {
        self.codec
            .replace_record(&mut self.stream, &WriteRequest::new(key, values), self.strict)
    }

    pub fn insert_or_update_string(&mut self, key: &str, text: &str) -> Result<()> {
        self.insert_or_update_values(key, Values::Text(text))
    }

    pub fn insert_or_update<T: Scalar>(&mut self, key: &str, value: T) -> Result<()> {
        self.insert_or_update_array(key, std::slice::from_ref(&value))
    }

    pub fn insert_or_update_array<T: Scalar>(&mut self, key: &str, values: &[T]) -> Result<()> {
        self.insert_or_update_values(key, T::as_values(values))
    }

    /// Updates `key` in place when present, otherwise appends a new record
    /// at the end of the stream.
    pub fn insert_or_update_values(&mut self, key: &str, values: Values<'_>) -> Result<()> {
        if self.key_exists(key)? {
            return self.update_values(key, values);
        }

        self.seek_to_append()?;
        tracing::debug!(target: "format", "Appending new key {:?}", key);
        self.write_values(key, values)
    }

    /// Moves the cursor to the end of the stream, terminating the final line
    /// first if it has no line terminator.
    pub fn seek_to_append(&mut self) -> Result<()> {
        let size = self.stream.size();
        if size == 0 {
            return self.rewind();
        }
        seek_to(&mut self.stream, size - 1)?;
        let mut last = [0u8; 1];
        if self.stream.read(&mut last)? != 1 {
            return Err(FormatError::CorruptLayout(format!(
                "stream reports {} bytes but its last byte cannot be read",
                size
            )));
        }
        if last != [EOL] {
            // A final line without terminator would swallow the next record.
            write_all(&mut self.stream, &[EOL])?;
        }
        Ok(())
    }

    /// Removes the record of an existing key.
    pub fn delete_key(&mut self, key: &str) -> Result<()> {
        self.codec.delete_record(&mut self.stream, key, self.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ShortReadStream;
    use keyfmt_stream::MemoryStream;

    #[test]
    fn test_sequential_write_then_strict_read() {
        let mut file = KeyFile::new(MemoryStream::new());
        file.write_header("Test File", 2).unwrap();
        file.write_comment("values below").unwrap();
        file.write_string("Name", "front door").unwrap();
        file.write_array("Key", &[0xDEu8, 0xAD]).unwrap();
        file.write("Count", -3i32).unwrap();
        file.write("Enabled", true).unwrap();

        file.set_strict(true);
        file.rewind().unwrap();
        file.check_header("Test File", 2).unwrap();
        assert_eq!(file.read_string("Name").unwrap(), "front door");
        assert_eq!(file.read_array::<u8>("Key", 2).unwrap(), vec![0xDE, 0xAD]);
        assert_eq!(file.read::<i32>("Count").unwrap(), -3);
        assert!(file.read::<bool>("Enabled").unwrap());
    }

    #[test]
    fn test_header_mismatch() {
        let mut file = KeyFile::new(MemoryStream::from_bytes(b"Filetype: Other\nVersion: 1\n".to_vec()));
        let err = file.check_header("Test File", 1).unwrap_err();
        assert!(matches!(err, FormatError::HeaderMismatch { .. }));

        file.rewind().unwrap();
        let err = file.check_header("Other", 3).unwrap_err();
        assert!(matches!(err, FormatError::HeaderMismatch { ref expected, .. } if expected == "3"));
    }

    #[test]
    fn test_insert_or_update() {
        let mut file = KeyFile::new(MemoryStream::from_bytes(b"a: 1\nb: 2".to_vec()));
        file.insert_or_update("b", 20u32).unwrap();
        file.insert_or_update("c", 30u32).unwrap();
        file.insert_or_update_string("d", "x y").unwrap();
        assert_eq!(file.stream().as_bytes(), b"a: 1\nb: 20\nc: 30\nd: x y\n");

        assert!(matches!(file.update("zz", 1u32), Err(FormatError::KeyNotFound(_))));
    }

    #[test]
    fn test_append_after_unterminated_line() {
        let mut file = KeyFile::new(MemoryStream::from_bytes(b"a: 1".to_vec()));
        file.insert_or_update("b", 2i32).unwrap();
        assert_eq!(file.stream().as_bytes(), b"a: 1\nb: 2\n");
    }

    #[test]
    fn test_key_exists_and_keys_preserve_cursor() {
        let mut file = KeyFile::new(MemoryStream::from_bytes(b"a: 1\nb: 2\n".to_vec()));
        file.stream_mut().seek(5, SeekOrigin::Start).unwrap();
        assert!(file.key_exists("a").unwrap());
        assert!(!file.key_exists("q").unwrap());
        assert_eq!(file.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(file.stream().tell(), 5);
        assert_eq!(file.value_count("b").unwrap(), 1);
        assert_eq!(file.stream().tell(), 5);
    }

    #[test]
    fn test_seek_to_end_and_append() {
        let mut file = KeyFile::new(MemoryStream::from_bytes(b"a: 1".to_vec()));
        file.seek_to_end().unwrap();
        assert_eq!(file.stream().tell(), 4);
        file.seek_to_append().unwrap();
        file.write_comment("tail").unwrap();
        assert_eq!(file.stream().as_bytes(), b"a: 1\n# tail\n");

        let mut empty = KeyFile::new(MemoryStream::new());
        empty.seek_to_append().unwrap();
        assert_eq!(empty.stream().tell(), 0);
    }

    #[test]
    fn test_append_refuses_unreadable_last_byte() {
        let mut file = KeyFile::new(ShortReadStream::new(b"a: 1", 0));
        let err = file.seek_to_append().unwrap_err();
        assert!(matches!(err, FormatError::CorruptLayout(_)));
        assert_eq!(file.stream().size(), 4);
    }

    #[test]
    fn test_delete_key() {
        let mut file = KeyFile::new(MemoryStream::from_bytes(b"a: 1\nb: 2\nc: 3\n".to_vec()));
        file.delete_key("b").unwrap();
        assert_eq!(file.into_inner().into_bytes(), b"a: 1\nc: 3\n");
    }

    #[cfg(feature = "float")]
    #[test]
    fn test_float_values() {
        let mut file = KeyFile::new(MemoryStream::new());
        file.write_array("F", &[1.5f32, -2.0]).unwrap();
        assert_eq!(file.stream().as_bytes(), b"F: 1.500000 -2.000000\n");
        file.rewind().unwrap();
        assert_eq!(file.read_array::<f32>("F", 2).unwrap(), vec![1.5, -2.0]);
    }
}
