//! Tidemark Core - bencode codec and torrent metadata extraction
//!
//! This crate decodes and encodes bencode, extracts the metadata a
//! BitTorrent client needs from `.torrent` files, and computes the info-hash
//! over the exact bytes of the info dictionary.

pub mod bencode;
pub mod config;
pub mod torrent;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use bencode::{BencodeError, Element};
pub use config::TidemarkConfig;
pub use torrent::{InfoHash, MetadataExtractor, TorrentError, TorrentMetadata};

/// Core errors that can bubble up from any Tidemark subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TidemarkError {
    #[error("Torrent error: {0}")]
    Torrent(#[from] TorrentError),

    #[error("Bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TidemarkError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            TidemarkError::Torrent(e) => match e {
                TorrentError::Bencode(inner) => format!("File is not valid bencode: {inner}"),
                TorrentError::MissingField { field } => {
                    format!("Invalid torrent file: missing '{field}'")
                }
                TorrentError::CorruptPieceTable { .. } => {
                    "Invalid torrent file: corrupt piece table".to_string()
                }
                TorrentError::TorrentTooLarge { limit, .. } => {
                    format!("Torrent file is larger than {limit} bytes")
                }
                TorrentError::Io(_) => "Could not read torrent file".to_string(),
                other => format!("Invalid torrent file: {other}"),
            },
            TidemarkError::Bencode(e) => format!("File is not valid bencode: {e}"),
            TidemarkError::Configuration { reason } => format!("Configuration error: {reason}"),
            TidemarkError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to bad user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            TidemarkError::Io(_) | TidemarkError::Torrent(TorrentError::Io(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, TidemarkError>;
