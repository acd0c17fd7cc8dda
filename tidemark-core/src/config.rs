//! Centralized configuration for Tidemark.
//!
//! Decoder limits and torrent file bounds are defined here instead of
//! being scattered through the codec and extractor.

use crate::bencode::{DEFAULT_MAX_DEPTH, DecodeOptions};

/// Largest torrent file read from disk by default (16 MiB).
pub const DEFAULT_MAX_TORRENT_SIZE: u64 = 16 * 1024 * 1024;

/// Central configuration for all Tidemark components.
///
/// Groups related settings into sections. Supports environment variable
/// overrides for runtime customization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidemarkConfig {
    pub bencode: BencodeConfig,
    pub torrent: TorrentConfig,
}

/// Bencode decoder limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BencodeConfig {
    /// Deepest list/dictionary nesting accepted
    pub max_depth: usize,
    /// Reject dictionary keys that are not valid UTF-8
    pub require_utf8_keys: bool,
}

impl Default for BencodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            require_utf8_keys: false,
        }
    }
}

impl From<&BencodeConfig> for DecodeOptions {
    fn from(config: &BencodeConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            require_utf8_keys: config.require_utf8_keys,
        }
    }
}

/// Torrent file handling configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentConfig {
    /// Files larger than this are rejected before being read
    pub max_torrent_size: u64,
}

impl Default for TorrentConfig {
    fn default() -> Self {
        Self {
            max_torrent_size: DEFAULT_MAX_TORRENT_SIZE,
        }
    }
}

impl TidemarkConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(depth) = std::env::var("TIDEMARK_MAX_DEPTH") {
            if let Ok(value) = depth.parse::<usize>() {
                config.bencode.max_depth = value;
            }
        }

        if let Ok(strict) = std::env::var("TIDEMARK_STRICT_KEYS") {
            config.bencode.require_utf8_keys = strict.parse().unwrap_or(false);
        }

        if let Ok(size) = std::env::var("TIDEMARK_MAX_TORRENT_SIZE") {
            if let Ok(bytes) = size.parse::<u64>() {
                config.torrent.max_torrent_size = bytes;
            }
        }

        config
    }

    /// Creates a configuration with tight limits for tests.
    pub fn for_testing() -> Self {
        Self {
            bencode: BencodeConfig {
                max_depth: 16,
                require_utf8_keys: true,
            },
            torrent: TorrentConfig {
                max_torrent_size: 64 * 1024, // 64 KiB
            },
        }
    }

    /// Decoder options derived from the bencode section.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::from(&self.bencode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = TidemarkConfig::default();

        assert_eq!(config.bencode.max_depth, 64);
        assert!(!config.bencode.require_utf8_keys);
        assert_eq!(config.torrent.max_torrent_size, 16 * 1024 * 1024);
        assert_eq!(config.decode_options(), DecodeOptions::default());
    }

    #[test]
    fn test_config_presets() {
        let testing_config = TidemarkConfig::for_testing();
        assert_eq!(testing_config.bencode.max_depth, 16);
        assert!(testing_config.bencode.require_utf8_keys);
        assert!(testing_config.torrent.max_torrent_size < DEFAULT_MAX_TORRENT_SIZE);

        let options = testing_config.decode_options();
        assert_eq!(options.max_depth, 16);
        assert!(options.require_utf8_keys);
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("TIDEMARK_MAX_DEPTH", "8");
            std::env::set_var("TIDEMARK_STRICT_KEYS", "true");
            std::env::set_var("TIDEMARK_MAX_TORRENT_SIZE", "1024");
        }

        let config = TidemarkConfig::from_env();

        assert_eq!(config.bencode.max_depth, 8);
        assert!(config.bencode.require_utf8_keys);
        assert_eq!(config.torrent.max_torrent_size, 1024);

        unsafe {
            std::env::set_var("TIDEMARK_MAX_DEPTH", "not-a-number");
            std::env::remove_var("TIDEMARK_STRICT_KEYS");
            std::env::remove_var("TIDEMARK_MAX_TORRENT_SIZE");
        }

        let config = TidemarkConfig::from_env();
        assert_eq!(config.bencode.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config, TidemarkConfig::default());

        // Cleanup
        unsafe {
            std::env::remove_var("TIDEMARK_MAX_DEPTH");
        }
    }
}
