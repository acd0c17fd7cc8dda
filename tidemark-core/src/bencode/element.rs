//! Owned bencode element tree.

use std::collections::HashSet;
use std::fmt;

use bytes::Bytes;

/// A decoded bencode value.
///
/// Every variant owns its content. Byte strings are copied out of the input
/// during decode, so an element tree outlives the buffer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Arbitrary bytes, not necessarily UTF-8.
    ByteString(Bytes),
    /// Signed 64-bit integer.
    Integer(i64),
    /// Ordered sequence of elements.
    List(Vec<Element>),
    /// Byte-string keyed mapping that remembers insertion order.
    Dictionary(Dictionary),
}

/// Variant tag of an [`Element`], used when reporting type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    ByteString,
    Integer,
    List,
    Dictionary,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::ByteString => "byte string",
            ElementKind::Integer => "integer",
            ElementKind::List => "list",
            ElementKind::Dictionary => "dictionary",
        };
        f.write_str(name)
    }
}

impl Element {
    /// Creates a byte string element from UTF-8 text.
    pub fn string(text: &str) -> Self {
        Element::ByteString(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Returns the variant tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::ByteString(_) => ElementKind::ByteString,
            Element::Integer(_) => ElementKind::Integer,
            Element::List(_) => ElementKind::List,
            Element::Dictionary(_) => ElementKind::Dictionary,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Element::ByteString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the byte string as text when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Element::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Element]> {
        match self {
            Element::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Element::Dictionary(dictionary) => Some(dictionary),
            _ => None,
        }
    }

    /// Looks up `key` when this element is a dictionary.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Element> {
        self.as_dictionary().and_then(|dictionary| dictionary.get(key))
    }

    /// Appends the bencoded form of this element to `buf`.
    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        super::encoder::encode_into(self, buf);
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::Integer(value)
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::string(text)
    }
}

impl From<&[u8]> for Element {
    fn from(bytes: &[u8]) -> Self {
        Element::ByteString(Bytes::copy_from_slice(bytes))
    }
}

impl From<Bytes> for Element {
    fn from(bytes: Bytes) -> Self {
        Element::ByteString(bytes)
    }
}

impl From<Vec<Element>> for Element {
    fn from(items: Vec<Element>) -> Self {
        Element::List(items)
    }
}

impl From<Dictionary> for Element {
    fn from(dictionary: Dictionary) -> Self {
        Element::Dictionary(dictionary)
    }
}

/// Dictionary with unique byte-string keys kept in insertion order.
///
/// Encoding emits entries in the stored order, so a dictionary decoded from
/// a buffer re-encodes to the same bytes even when the source keys were not
/// sorted. Equality is order-sensitive for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(Bytes, Element)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Element> {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|(entry_key, _)| &entry_key[..] == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`.
    ///
    /// A new key is appended after the existing entries. An existing key
    /// keeps its position and the previous value is returned.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: Element) -> Option<Element> {
        let key = key.into();
        match self
            .entries
            .iter_mut()
            .find(|(entry_key, _)| *entry_key == key)
        {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Iterates entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Element)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Builds a dictionary from entries already known to have unique keys.
    pub(crate) fn from_unique_entries(entries: Vec<(Bytes, Element)>) -> Self {
        debug_assert_eq!(
            entries.iter().map(|(key, _)| key).collect::<HashSet<_>>().len(),
            entries.len()
        );
        Self { entries }
    }
}

impl<K: Into<Bytes>> FromIterator<(K, Element)> for Dictionary {
    /// Later duplicates overwrite earlier values in place.
    fn from_iter<I: IntoIterator<Item = (K, Element)>>(iter: I) -> Self {
        let mut dictionary = Dictionary::new();
        for (key, value) in iter {
            dictionary.insert(key, value);
        }
        dictionary
    }
}
