//! Main torrent parser implementation

use std::path::Path;

use async_trait::async_trait;

use super::super::TorrentError;
use super::extractor::MetadataExtractor;
use super::types::{TorrentMetadata, TorrentParser};
use crate::config::{DEFAULT_MAX_TORRENT_SIZE, TidemarkConfig};

/// Reference implementation backed by the in-crate bencode codec.
///
/// Parses `.torrent` files from memory or disk. Files above the configured
/// size limit are rejected before their contents are read.
#[derive(Debug, Clone)]
pub struct BencodeTorrentParser {
    extractor: MetadataExtractor,
    max_torrent_size: u64,
}

impl Default for BencodeTorrentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BencodeTorrentParser {
    /// Creates new parser with default limits.
    pub fn new() -> Self {
        Self {
            extractor: MetadataExtractor::new(),
            max_torrent_size: DEFAULT_MAX_TORRENT_SIZE,
        }
    }

    pub fn with_config(config: &TidemarkConfig) -> Self {
        Self {
            extractor: MetadataExtractor::with_config(config),
            max_torrent_size: config.torrent.max_torrent_size,
        }
    }
}

#[async_trait]
impl TorrentParser for BencodeTorrentParser {
    async fn parse_torrent_data(
        &self,
        torrent_bytes: &[u8],
    ) -> Result<TorrentMetadata, TorrentError> {
        self.extractor.extract(torrent_bytes)
    }

    async fn parse_torrent_file(&self, path: &Path) -> Result<TorrentMetadata, TorrentError> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > self.max_torrent_size {
            return Err(TorrentError::TorrentTooLarge {
                size,
                limit: self.max_torrent_size,
            });
        }

        let file_contents = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), bytes = file_contents.len(), "Read torrent file");

        self.parse_torrent_data(&file_contents).await
    }
}
