//! Torrent metadata types and extraction

pub mod parsing;
#[cfg(test)]
pub mod test_data;

use std::fmt;

use sha1::{Digest, Sha1};

pub use parsing::{
    BencodeTorrentParser, MetadataExtractor, TorrentMetadata, TorrentParser, TorrentSummary,
};

use crate::bencode::{BencodeError, ElementKind};

/// Length in bytes of a SHA-1 digest.
pub const SHA1_LEN: usize = 20;

/// SHA-1 hash identifying a unique torrent.
///
/// 20-byte SHA-1 hash of the info dictionary from a torrent file.
/// Used to uniquely identify torrents across the BitTorrent network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; SHA1_LEN]);

impl InfoHash {
    /// Creates InfoHash from 20-byte SHA-1 hash.
    pub fn new(hash: [u8; SHA1_LEN]) -> Self {
        Self(hash)
    }

    /// Hashes `bytes` with SHA-1.
    pub fn digest(bytes: &[u8]) -> Self {
        Self(sha1_digest(bytes))
    }

    /// Returns reference to underlying 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    /// Parses a 40-character hex string.
    ///
    /// # Errors
    /// - `hex::FromHexError` - Wrong length or non-hex characters
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let mut hash = [0u8; SHA1_LEN];
        hex::decode_to_slice(hex_str, &mut hash)?;
        Ok(Self(hash))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Percent-encodes the raw hash for a tracker announce query string.
    pub fn url_encoded(&self) -> String {
        urlencoding::encode_binary(&self.0).into_owned()
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Expected SHA-1 hash of one piece of torrent content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceHash([u8; SHA1_LEN]);

impl PieceHash {
    pub fn new(hash: [u8; SHA1_LEN]) -> Self {
        Self(hash)
    }

    pub fn as_bytes(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    /// Checks `data` against this hash.
    pub fn matches(&self, data: &[u8]) -> bool {
        sha1_digest(data) == self.0
    }
}

impl fmt::Display for PieceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Zero-based index of a piece within a torrent.
///
/// Torrent files are divided into pieces for downloading and verification.
/// Each piece has a sequential index starting from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceIndex(pub u32);

impl PieceIndex {
    /// Creates PieceIndex from zero-based index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying piece index as u32.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PieceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn sha1_digest(bytes: &[u8]) -> [u8; SHA1_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let mut hash = [0u8; SHA1_LEN];
    hash.copy_from_slice(&result);
    hash
}

/// Errors that can occur while turning torrent bytes into metadata.
///
/// Field names are dotted paths from the root dictionary, for example
/// `announce` or `info.pieces`.
#[derive(Debug, thiserror::Error)]
pub enum TorrentError {
    #[error("Bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Root element must be a dictionary, found {actual}")]
    InvalidRoot { actual: ElementKind },

    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' must be a {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: ElementKind,
        actual: ElementKind,
    },

    #[error("Piece table of {length} bytes is not a non-empty multiple of 20")]
    CorruptPieceTable { length: usize },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Field '{field}' is not valid UTF-8 text")]
    InvalidText { field: String },

    #[error("Torrent file of {size} bytes exceeds the {limit} byte limit")]
    TorrentTooLarge { size: u64, limit: u64 },

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
