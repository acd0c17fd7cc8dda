//! Test data creation for torrent testing.
//!
//! Builds bencoded torrent files with predictable piece hashes so extractor
//! and parser tests share one set of fixtures.

use bytes::Bytes;

use super::{PieceIndex, SHA1_LEN, sha1_digest};
use crate::bencode::{Dictionary, Element, encode};

pub const TEST_ANNOUNCE: &str = "http://tracker.example.com/announce";
pub const TEST_NAME: &str = "test.txt";
pub const TEST_PIECE_SIZE: usize = 32768;
pub const TEST_PIECE_COUNT: usize = 3;

/// Creates test piece data that matches the expected hash for the given piece index.
pub fn create_test_piece_data(piece_index: PieceIndex, piece_size: usize) -> Vec<u8> {
    vec![piece_index.as_u32() as u8; piece_size]
}

/// Concatenated piece table for [`TEST_PIECE_COUNT`] pieces.
///
/// Piece `i` is [`TEST_PIECE_SIZE`] bytes of value `i`.
pub fn create_test_piece_table() -> Vec<u8> {
    let mut table = Vec::with_capacity(TEST_PIECE_COUNT * SHA1_LEN);
    for index in 0..TEST_PIECE_COUNT {
        let data = create_test_piece_data(PieceIndex::new(index as u32), TEST_PIECE_SIZE);
        table.extend_from_slice(&sha1_digest(&data));
    }
    table
}

/// Single-file info dictionary with sorted keys.
pub fn create_test_info_dictionary() -> Dictionary {
    let mut info = Dictionary::new();
    info.insert(
        "length",
        Element::Integer((TEST_PIECE_SIZE * TEST_PIECE_COUNT) as i64),
    );
    info.insert("name", Element::string(TEST_NAME));
    info.insert("piece length", Element::Integer(TEST_PIECE_SIZE as i64));
    info.insert(
        "pieces",
        Element::ByteString(Bytes::from(create_test_piece_table())),
    );
    info
}

/// Encodes a torrent root from an optional announce value and info value.
pub fn encode_torrent(announce: Option<Element>, info: Option<Element>) -> Vec<u8> {
    let mut root = Dictionary::new();
    if let Some(announce) = announce {
        root.insert("announce", announce);
    }
    if let Some(info) = info {
        root.insert("info", info);
    }
    encode(&Element::Dictionary(root))
}

/// Complete, valid 3-piece torrent file.
pub fn create_test_torrent_bytes() -> Vec<u8> {
    encode_torrent(
        Some(Element::string(TEST_ANNOUNCE)),
        Some(Element::Dictionary(create_test_info_dictionary())),
    )
}

/// Valid torrent whose info dictionary has `key` replaced by `value`.
pub fn create_torrent_with_info_field(key: &'static str, value: Element) -> Vec<u8> {
    let mut info = create_test_info_dictionary();
    info.insert(key, value);
    encode_torrent(
        Some(Element::string(TEST_ANNOUNCE)),
        Some(Element::Dictionary(info)),
    )
}

/// Valid torrent missing the info field `key`.
pub fn create_torrent_without_info_field(key: &'static str) -> Vec<u8> {
    let info: Dictionary = create_test_info_dictionary()
        .iter()
        .filter(|(entry_key, _)| &entry_key[..] != key.as_bytes())
        .map(|(entry_key, value)| (entry_key.clone(), value.clone()))
        .collect();
    encode_torrent(
        Some(Element::string(TEST_ANNOUNCE)),
        Some(Element::Dictionary(info)),
    )
}
