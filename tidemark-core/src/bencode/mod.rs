//! Bencode codec.
//!
//! Decodes the length-prefixed bencode format into an owned [`Element`] tree
//! and encodes trees back to bytes. Decoding works on a borrowed buffer with
//! explicit offsets, which lets callers capture the exact byte span of any
//! nested value with [`decode_with_span`].
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Byte string | `<length>:<bytes>` | `4:spam` |
//! | Integer | `i<decimal>e` | `i-42e` |
//! | List | `l<elements>e` | `l4:spami42ee` |
//! | Dictionary | `d<key><value>...e` | `d3:bar4:spam3:fooi42ee` |
//!
//! Dictionaries keep the key order they were decoded with, so
//! `encode(&decode(bytes)?) == bytes` for every valid input.

pub mod decoder;
pub mod element;
pub mod encoder;

pub use decoder::{DEFAULT_MAX_DEPTH, DecodeOptions, Decoder, Span};
pub use element::{Dictionary, Element, ElementKind};
pub use encoder::{encode, encode_into};

/// Syntax errors raised while decoding bencode.
///
/// Offsets are byte positions in the buffer being decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BencodeError {
    #[error("Empty bencode input")]
    EmptyInput,

    #[error("Unrecognized tag byte 0x{tag:02x} at offset {offset}")]
    UnrecognizedTag { tag: u8, offset: usize },

    #[error("Malformed string length at offset {offset}")]
    MalformedLength { offset: usize },

    #[error("Malformed integer at offset {offset}")]
    MalformedInteger { offset: usize },

    #[error("Dictionary key at offset {offset} is not a valid string")]
    MalformedKey { offset: usize },

    #[error("Duplicate dictionary key {key:?} at offset {offset}")]
    DuplicateKey { key: String, offset: usize },

    #[error("Input truncated at offset {offset}")]
    TruncatedInput { offset: usize },

    #[error("Nesting deeper than {max_depth} levels at offset {offset}")]
    NestingTooDeep { max_depth: usize, offset: usize },

    #[error("Trailing data after element at offset {offset}")]
    TrailingData { offset: usize },
}

/// Decodes a buffer holding exactly one element.
///
/// # Errors
///
/// - `BencodeError::TrailingData` - Bytes remain after the element
/// - Any syntax error from [`Decoder::decode_at`]
pub fn decode(input: &[u8]) -> Result<Element, BencodeError> {
    Decoder::new(input).decode()
}

/// Decodes the element at `offset`, returning it with the next offset.
///
/// # Errors
///
/// Any syntax error from [`Decoder::decode_at`].
pub fn decode_at(input: &[u8], offset: usize) -> Result<(Element, usize), BencodeError> {
    Decoder::new(input).decode_at(offset)
}

/// Decodes the element at `offset`, returning it with the span it occupied.
///
/// # Errors
///
/// Any syntax error from [`Decoder::decode_at`].
pub fn decode_with_span(input: &[u8], offset: usize) -> Result<(Element, Span), BencodeError> {
    Decoder::new(input).decode_span_at(offset)
}
