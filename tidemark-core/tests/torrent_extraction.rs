//! End-to-end extraction tests over hand-built torrent files.

use bytes::Bytes;
use proptest::prelude::*;
use tidemark_core::bencode::{Dictionary, Element, encode};
use tidemark_core::torrent::{
    BencodeTorrentParser, InfoHash, PieceIndex, TorrentError, TorrentMetadata, TorrentParser,
};

const ANNOUNCE: &str = "http://tracker.example.com:6969/announce";

fn info_dictionary(name: &str, length: i64, pieces: Vec<u8>) -> Dictionary {
    let mut info = Dictionary::new();
    info.insert("length", Element::Integer(length));
    info.insert("name", Element::from(name));
    info.insert("piece length", Element::Integer(262144));
    info.insert("pieces", Element::ByteString(Bytes::from(pieces)));
    info
}

fn torrent_bytes(announce: &str, info: Dictionary) -> Vec<u8> {
    let mut root = Dictionary::new();
    root.insert("announce", Element::from(announce));
    root.insert("comment", Element::from("built for tests"));
    root.insert("info", Element::Dictionary(info));
    encode(&Element::Dictionary(root))
}

#[test]
fn test_extracts_required_fields() {
    let torrent = torrent_bytes(ANNOUNCE, info_dictionary("ubuntu.iso", 1_000_000, vec![9; 80]));
    let metadata = TorrentMetadata::from_bytes(&torrent).unwrap();

    assert_eq!(metadata.announce_url(), ANNOUNCE);
    assert_eq!(metadata.name(), "ubuntu.iso");
    assert_eq!(metadata.total_length(), 1_000_000);
    assert_eq!(metadata.piece_length(), Some(262144));
    assert_eq!(metadata.piece_count(), 4);
    assert_eq!(
        metadata.piece_hash(PieceIndex::new(3)).map(|hash| *hash.as_bytes()),
        Some([9; 20])
    );
}

#[test]
fn test_same_info_in_different_files_hashes_equal() {
    let info = info_dictionary("same.bin", 42, vec![1; 20]);
    let first = torrent_bytes("http://one.example/announce", info.clone());
    let second = torrent_bytes("udp://two.example:1337", info);

    let first = TorrentMetadata::from_bytes(&first).unwrap();
    let second = TorrentMetadata::from_bytes(&second).unwrap();
    assert_eq!(first.info_hash(), second.info_hash());
}

#[test]
fn test_reordered_info_keys_change_hash() {
    let sorted = info_dictionary("order.bin", 42, vec![1; 20]);
    let mut entries: Vec<(Bytes, Element)> = sorted
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    entries.reverse();
    let reversed: Dictionary = entries.into_iter().collect();

    let sorted_hash = TorrentMetadata::from_bytes(&torrent_bytes(ANNOUNCE, sorted))
        .unwrap()
        .info_hash();
    let reversed_hash = TorrentMetadata::from_bytes(&torrent_bytes(ANNOUNCE, reversed))
        .unwrap()
        .info_hash();
    assert_ne!(sorted_hash, reversed_hash);
}

#[test]
fn test_info_hash_matches_hashing_info_bytes_directly() {
    let info = info_dictionary("direct.bin", 7, vec![3; 40]);
    let info_bytes = encode(&Element::Dictionary(info.clone()));
    let metadata = TorrentMetadata::from_bytes(&torrent_bytes(ANNOUNCE, info)).unwrap();

    assert_eq!(metadata.info_hash(), InfoHash::digest(&info_bytes));
    assert_eq!(metadata.info_hash().to_hex().len(), 40);
}

#[test]
fn test_pieces_of_21_bytes_is_corrupt() {
    let torrent = torrent_bytes(ANNOUNCE, info_dictionary("bad.bin", 10, vec![0; 21]));
    assert!(matches!(
        TorrentMetadata::from_bytes(&torrent),
        Err(TorrentError::CorruptPieceTable { length: 21 })
    ));
}

#[tokio::test]
async fn test_parser_reads_file_from_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("disk.torrent");
    let torrent = torrent_bytes(ANNOUNCE, info_dictionary("disk.bin", 64, vec![5; 20]));
    tokio::fs::write(&path, &torrent).await.unwrap();

    let parser = BencodeTorrentParser::new();
    let from_disk = parser.parse_torrent_file(&path).await.unwrap();
    let from_memory = parser.parse_torrent_data(&torrent).await.unwrap();
    assert_eq!(from_disk, from_memory);
}

proptest! {
    #[test]
    fn test_piece_table_splits_exactly(hashes in prop::collection::vec(any::<[u8; 20]>(), 1..40)) {
        let pieces: Vec<u8> = hashes.iter().flatten().copied().collect();
        let torrent = torrent_bytes(ANNOUNCE, info_dictionary("prop.bin", 1, pieces));
        let metadata = TorrentMetadata::from_bytes(&torrent).unwrap();

        prop_assert_eq!(metadata.piece_count(), hashes.len());
        for (piece_hash, expected) in metadata.piece_hashes().iter().zip(&hashes) {
            prop_assert_eq!(piece_hash.as_bytes(), expected);
        }
    }

    #[test]
    fn test_extraction_is_deterministic(name in "[a-z]{1,12}", length in 0i64..i64::MAX) {
        let torrent = torrent_bytes(ANNOUNCE, info_dictionary(&name, length, vec![2; 20]));
        let first = TorrentMetadata::from_bytes(&torrent).unwrap();
        let second = TorrentMetadata::from_bytes(&torrent).unwrap();

        prop_assert_eq!(first.name(), name.as_str());
        prop_assert_eq!(first.total_length(), length as u64);
        prop_assert_eq!(first.info_hash(), second.info_hash());
    }
}
