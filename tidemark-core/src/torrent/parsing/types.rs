//! Core types and structures for torrent parsing

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use super::super::{InfoHash, PieceHash, PieceIndex, TorrentError};
use super::extractor::MetadataExtractor;

/// Complete metadata extracted from a torrent file.
///
/// Immutable once built. Every byte it retains is copied out of the source
/// buffer, so it can outlive the file contents it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentMetadata {
    pub(super) announce_url: String,
    pub(super) announce_list: Vec<Vec<String>>,
    pub(super) name: String,
    pub(super) total_length: u64,
    pub(super) piece_length: Option<u64>,
    pub(super) piece_hashes: Vec<PieceHash>,
    pub(super) info_hash: InfoHash,
}

impl TorrentMetadata {
    /// Extracts metadata from raw torrent bytes with the default limits.
    ///
    /// # Errors
    ///
    /// Any `TorrentError` raised by [`MetadataExtractor::extract`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TorrentError> {
        MetadataExtractor::new().extract(bytes)
    }

    /// Primary tracker URL from the root `announce` field.
    pub fn announce_url(&self) -> &str {
        &self.announce_url
    }

    /// Tracker tiers from the optional `announce-list` field.
    ///
    /// Empty when the torrent carries no usable tiers.
    pub fn announce_list(&self) -> &[Vec<String>] {
        &self.announce_list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// Nominal size of each piece, when the info dictionary declares it.
    pub fn piece_length(&self) -> Option<u64> {
        self.piece_length
    }

    /// Expected piece hashes in piece order. Never empty.
    pub fn piece_hashes(&self) -> &[PieceHash] {
        &self.piece_hashes
    }

    pub fn piece_count(&self) -> usize {
        self.piece_hashes.len()
    }

    /// SHA-1 of the info dictionary exactly as it appeared in the file.
    pub fn info_hash(&self) -> InfoHash {
        self.info_hash
    }

    /// Returns the expected hash for `index`, or `None` when out of range.
    pub fn piece_hash(&self, index: PieceIndex) -> Option<&PieceHash> {
        self.piece_hashes.get(index.as_u32() as usize)
    }

    /// Checks downloaded piece data against the piece table.
    ///
    /// Returns `false` for an out-of-range index.
    pub fn verify_piece(&self, index: PieceIndex, data: &[u8]) -> bool {
        self.piece_hash(index)
            .is_some_and(|expected| expected.matches(data))
    }

    /// Flat, serializable view for display and JSON output.
    pub fn summary(&self) -> TorrentSummary {
        TorrentSummary {
            name: self.name.clone(),
            announce: self.announce_url.clone(),
            announce_list: self.announce_list.clone(),
            total_length: self.total_length,
            piece_length: self.piece_length,
            piece_count: self.piece_hashes.len(),
            info_hash: self.info_hash.to_hex(),
        }
    }
}

/// Serializable summary of a torrent's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentSummary {
    pub name: String,
    pub announce: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub announce_list: Vec<Vec<String>>,
    pub total_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_length: Option<u64>,
    pub piece_count: usize,
    pub info_hash: String,
}

/// Abstract torrent parsing interface for multiple implementations.
///
/// Provides a unified interface for loading torrent metadata from memory
/// or from the filesystem.
#[async_trait]
pub trait TorrentParser: Send + Sync {
    /// Parses torrent metadata from raw bencode bytes.
    ///
    /// # Errors
    /// - `TorrentError::Bencode` - Malformed bencode
    /// - `TorrentError::MissingField`, `TypeMismatch`, `CorruptPieceTable` -
    ///   Structurally invalid torrent
    async fn parse_torrent_data(&self, data: &[u8]) -> Result<TorrentMetadata, TorrentError>;

    /// Parses torrent file from filesystem path.
    ///
    /// Reads the file from disk and delegates to `parse_torrent_data`.
    ///
    /// # Errors
    /// - `TorrentError::Io` - File could not be read
    /// - `TorrentError::TorrentTooLarge` - File exceeds the configured limit
    /// - Any error from `parse_torrent_data`
    async fn parse_torrent_file(&self, path: &Path) -> Result<TorrentMetadata, TorrentError>;
}
