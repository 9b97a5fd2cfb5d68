// Path: crates/format/src/consts.rs

//! Reserved bytes of the key-value line format.
//!
//! These are part of the format itself and shared by reader and writer. None
//! of them may appear inside a key.

/// Separates a key from its values.
pub const DELIMITER: u8 = b':';

/// Marks a comment line when it is the first byte of the line.
pub const COMMENT: u8 = b'#';

/// Terminates a record line.
pub const EOL: u8 = b'\n';

/// Carriage return. Discarded wherever it appears.
pub const EOL_IGNORE: u8 = b'\r';

/// Separates value tokens, and the delimiter from the first value.
pub const SPACE: u8 = b' ';

/// Default size of the buffered reads issued by the scanner.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 32;

/// Key of the file type record written by [`KeyFile::write_header`](crate::KeyFile::write_header).
pub const FILETYPE_KEY: &str = "Filetype";

/// Key of the version record written by [`KeyFile::write_header`](crate::KeyFile::write_header).
pub const VERSION_KEY: &str = "Version";
