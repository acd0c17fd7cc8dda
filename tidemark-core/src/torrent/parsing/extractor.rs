//! Torrent metadata extraction from decoded bencode.

use bytes::Bytes;

use super::super::{InfoHash, PieceHash, SHA1_LEN, TorrentError};
use super::types::TorrentMetadata;
use crate::bencode::{DecodeOptions, Decoder, Dictionary, Element, ElementKind};
use crate::config::TidemarkConfig;

type ParseResult<T> = Result<T, TorrentError>;

/// Builds [`TorrentMetadata`] from the bytes of a `.torrent` file.
///
/// Stateless apart from its decoder options, so one extractor can be shared
/// across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor {
    options: DecodeOptions,
}

impl MetadataExtractor {
    /// Creates an extractor with the default decoder limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TidemarkConfig) -> Self {
        Self::with_options(config.decode_options())
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Extracts torrent metadata from a complete torrent file buffer.
    ///
    /// The info-hash is computed over the raw bytes the `info` value
    /// occupies in `bytes`, never over a re-encoding.
    ///
    /// # Errors
    ///
    /// - `TorrentError::Bencode` - Buffer is not exactly one valid element
    /// - `TorrentError::InvalidRoot` - Root element is not a dictionary
    /// - `TorrentError::MissingField` - `announce`, `info`, `info.name`,
    ///   `info.length` or `info.pieces` is absent
    /// - `TorrentError::TypeMismatch` - A field holds the wrong variant
    /// - `TorrentError::InvalidText` - A text field is not UTF-8
    /// - `TorrentError::InvalidFieldValue` - Negative length or piece length
    /// - `TorrentError::CorruptPieceTable` - `pieces` is empty or not a
    ///   multiple of 20 bytes
    pub fn extract(&self, bytes: &[u8]) -> ParseResult<TorrentMetadata> {
        let decoder = Decoder::with_options(bytes, self.options);
        let root = decoder.decode()?;
        let Element::Dictionary(root_dict) = &root else {
            return Err(TorrentError::InvalidRoot {
                actual: root.kind(),
            });
        };

        let announce_url = extract_text(root_dict, "announce", "announce")?;
        let info = extract_dictionary(root_dict, "info", "info")?;
        let info_hash = Self::calculate_info_hash(&decoder)?;

        let name = extract_text(info, "name", "info.name")?;
        let total_length = extract_length(info, "length", "info.length")?;
        let piece_hashes = extract_piece_hashes(info)?;
        let piece_length = match info.get("piece length") {
            Some(_) => Some(extract_length(info, "piece length", "info.piece length")?),
            None => None,
        };
        let announce_list = extract_announce_list(root_dict);

        tracing::debug!(
            info_hash = %info_hash,
            pieces = piece_hashes.len(),
            total_length,
            "Extracted torrent metadata"
        );

        Ok(TorrentMetadata {
            announce_url,
            announce_list,
            name,
            total_length,
            piece_length,
            piece_hashes,
            info_hash,
        })
    }

    /// Hashes the exact byte range of the root's `info` value.
    fn calculate_info_hash(decoder: &Decoder<'_>) -> ParseResult<InfoHash> {
        let info_offset =
            decoder
                .locate_value(0, "info")?
                .ok_or_else(|| TorrentError::MissingField {
                    field: "info".to_string(),
                })?;
        let (_, span) = decoder.decode_span_at(info_offset)?;

        tracing::trace!(
            start = span.start,
            end = span.end,
            "Captured info dictionary span"
        );

        Ok(InfoHash::digest(span.slice(decoder.input())))
    }
}

fn extract_field<'a>(dict: &'a Dictionary, key: &str, field: &str) -> ParseResult<&'a Element> {
    dict.get(key).ok_or_else(|| TorrentError::MissingField {
        field: field.to_string(),
    })
}

fn type_mismatch(field: &str, expected: ElementKind, actual: &Element) -> TorrentError {
    TorrentError::TypeMismatch {
        field: field.to_string(),
        expected,
        actual: actual.kind(),
    }
}

fn extract_bytes<'a>(dict: &'a Dictionary, key: &str, field: &str) -> ParseResult<&'a Bytes> {
    let element = extract_field(dict, key, field)?;
    element
        .as_bytes()
        .ok_or_else(|| type_mismatch(field, ElementKind::ByteString, element))
}

fn extract_text(dict: &Dictionary, key: &str, field: &str) -> ParseResult<String> {
    let bytes = extract_bytes(dict, key, field)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| TorrentError::InvalidText {
        field: field.to_string(),
    })
}

fn extract_integer(dict: &Dictionary, key: &str, field: &str) -> ParseResult<i64> {
    let element = extract_field(dict, key, field)?;
    element
        .as_integer()
        .ok_or_else(|| type_mismatch(field, ElementKind::Integer, element))
}

fn extract_length(dict: &Dictionary, key: &str, field: &str) -> ParseResult<u64> {
    let value = extract_integer(dict, key, field)?;
    u64::try_from(value).map_err(|_| TorrentError::InvalidFieldValue {
        field: field.to_string(),
        reason: format!("must be non-negative, found {value}"),
    })
}

fn extract_dictionary<'a>(
    dict: &'a Dictionary,
    key: &str,
    field: &str,
) -> ParseResult<&'a Dictionary> {
    let element = extract_field(dict, key, field)?;
    element
        .as_dictionary()
        .ok_or_else(|| type_mismatch(field, ElementKind::Dictionary, element))
}

fn extract_piece_hashes(info: &Dictionary) -> ParseResult<Vec<PieceHash>> {
    let pieces = extract_bytes(info, "pieces", "info.pieces")?;
    if pieces.is_empty() || !pieces.len().is_multiple_of(SHA1_LEN) {
        return Err(TorrentError::CorruptPieceTable {
            length: pieces.len(),
        });
    }

    Ok(pieces
        .chunks_exact(SHA1_LEN)
        .map(|chunk| {
            let mut hash = [0u8; SHA1_LEN];
            hash.copy_from_slice(chunk);
            PieceHash::new(hash)
        })
        .collect())
}

/// Reads the optional `announce-list` tiers.
///
/// Anything malformed is skipped rather than failing the extraction.
fn extract_announce_list(root: &Dictionary) -> Vec<Vec<String>> {
    let Some(element) = root.get("announce-list") else {
        return Vec::new();
    };
    let Some(tiers) = element.as_list() else {
        tracing::debug!(actual = %element.kind(), "Ignoring non-list announce-list");
        return Vec::new();
    };

    let mut result = Vec::with_capacity(tiers.len());
    for (tier_index, tier) in tiers.iter().enumerate() {
        let Some(urls) = tier.as_list() else {
            tracing::debug!(tier = tier_index, "Skipping announce-list tier that is not a list");
            continue;
        };

        let tier_urls: Vec<String> = urls
            .iter()
            .filter_map(|url| {
                let text = url.as_str().map(str::to_string);
                if text.is_none() {
                    tracing::debug!(tier = tier_index, "Skipping non-text announce-list entry");
                }
                text
            })
            .collect();

        if !tier_urls.is_empty() {
            result.push(tier_urls);
        }
    }
    result
}
