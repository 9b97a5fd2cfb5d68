// Path: crates/format/src/codec.rs

use crate::config::FormatConfig;
use crate::consts::DEFAULT_READ_CHUNK_SIZE;

/// Entry point for every stream-level operation of the format.
///
/// A `Codec` only carries the scanner's read chunk size. It keeps no state
/// about any stream between calls: every lookup re-scans the stream from its
/// current cursor, so edits made to the storage between calls are always seen.
///
/// The operations are spread over several modules:
/// - scanning and key lookup in [`scanner`](crate::scanner),
/// - value reads and counting in [`reader`](crate::reader),
/// - record and comment writes in [`writer`](crate::writer),
/// - in-place record replacement in [`rewrite`](crate::rewrite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    chunk_size: usize,
}

impl Codec {
    /// Creates a codec reading `chunk_size` bytes at a time (at least one).
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn from_config(config: &FormatConfig) -> Self {
        Self::new(config.read_chunk_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_READ_CHUNK_SIZE)
    }
}
