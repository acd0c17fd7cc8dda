//! Torrent file parsing.
//!
//! [`MetadataExtractor`] turns the bytes of a `.torrent` file into
//! [`TorrentMetadata`]. [`TorrentParser`] is the async seam used by callers
//! that load torrents from disk.

pub mod extractor;
pub mod parser;
pub mod types;

// Re-export public API
pub use extractor::MetadataExtractor;
pub use parser::BencodeTorrentParser;
pub use types::{TorrentMetadata, TorrentParser, TorrentSummary};
