// Path: crates/format/src/config.rs

//! Runtime configuration for the codec.

use crate::consts::DEFAULT_READ_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

/// Tunables for a [`Codec`](crate::Codec) and [`KeyFile`](crate::KeyFile).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Size of each buffered read issued while scanning. Results never depend
    /// on this value; zero is treated as one.
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,
    /// When set, key lookups stop at the first key that does not match.
    #[serde(default)]
    pub strict: bool,
}

fn default_read_chunk_size() -> usize {
    DEFAULT_READ_CHUNK_SIZE
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: default_read_chunk_size(),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_toml() {
        let cfg: FormatConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, FormatConfig::default());
        assert_eq!(cfg.read_chunk_size, 32);
        assert!(!cfg.strict);
    }

    #[test]
    fn test_config_overrides() {
        let cfg: FormatConfig = toml::from_str("read_chunk_size = 4\nstrict = true\n").unwrap();
        assert_eq!(cfg.read_chunk_size, 4);
        assert!(cfg.strict);
    }
}
