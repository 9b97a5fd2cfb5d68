// Path: crates/format/src/lib.rs
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

//! # keyfmt Format
//!
//! A line-oriented, human-readable, typed key-value format read and written
//! directly against a seekable [`Stream`](keyfmt_stream::Stream):
//!
//! ```text
//! # comment
//! Filetype: Remote
//! Version: 1
//! Key: 0A FF 12
//! Name: any text, spaces kept
//! ```
//!
//! ## Key Features
//!
//! *   **No index:** every lookup re-scans the stream from the cursor, so the
//!     codec holds no state between calls and always sees the current bytes.
//!
//! *   **Chunk-independent scanning:** bytes are pulled in chunks of any size
//!     and the cursor is put back on the exact byte a scan stopped at.
//!
//! *   **In-place rewrite:** a record can be replaced by one of a different
//!     length through the stream's splice primitive, leaving the rest of the
//!     file untouched.

pub mod codec;
pub mod config;
pub mod consts;
mod cursor;
pub mod error;
pub mod keyfile;
pub mod reader;
pub mod rewrite;
pub mod scanner;
pub mod value;
pub mod writer;

pub use codec::Codec;
pub use config::FormatConfig;
pub use error::{FormatError, Result};
pub use keyfile::KeyFile;
pub use keyfmt_stream::ErrorCode;
pub use reader::Token;
pub use scanner::ScannedKey;
pub use value::{Scalar, Value, ValueType, Values};
pub use writer::WriteRequest;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::codec::Codec;
    use keyfmt_stream::{MemoryStream, SeekOrigin, Stream, StreamError};

    /// Codecs covering single-byte, tiny and default chunk sizes.
    pub fn chunked_codecs() -> Vec<Codec> {
        [1, 2, 3, 32].into_iter().map(Codec::new).collect()
    }

    /// A memory stream that never returns more than `max_read` bytes per read.
    pub struct ShortReadStream {
        inner: MemoryStream,
        max_read: usize,
    }

    impl ShortReadStream {
        pub fn new(data: &[u8], max_read: usize) -> Self {
            Self {
                inner: MemoryStream::from_bytes(data.to_vec()),
                max_read,
            }
        }
    }

    impl Stream for ShortReadStream {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
            let len = buf.len().min(self.max_read);
            self.inner.read(&mut buf[..len])
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
            self.inner.write(data)
        }

        fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
            self.inner.seek(offset, origin)
        }

        fn tell(&self) -> u64 {
            self.inner.tell()
        }

        fn size(&self) -> u64 {
            self.inner.size()
        }

        fn splice<F, E>(&mut self, delete_len: u64, producer: F) -> Result<(), E>
        where
            F: FnOnce(&mut Self) -> Result<(), E>,
            E: From<StreamError>,
        {
            let max_read = self.max_read;
            self.inner.splice(delete_len, |inner| {
                let mut wrapper = ShortReadStream {
                    inner: std::mem::take(inner),
                    max_read,
                };
                let result = producer(&mut wrapper);
                *inner = wrapper.inner;
                result
            })
        }
    }
}
