//! Recursive-descent bencode decoder with explicit offsets.
//!
//! Every decode call takes the offset it starts at and returns the offset
//! just past what it consumed. The decoder itself holds no cursor, so nested
//! calls compose and callers can capture the exact byte range of any value.

use std::collections::HashSet;
use std::ops::Range;

use bytes::Bytes;

use super::BencodeError;
use super::element::{Dictionary, Element};

/// Default nesting limit for lists and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits and strictness switches applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest container nesting accepted before failing.
    pub max_depth: usize,
    /// Reject dictionary keys that are not valid UTF-8.
    pub require_utf8_keys: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            require_utf8_keys: false,
        }
    }
}

/// Half-open byte range `[start, end)` consumed by one decoded element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the bytes this span covers in `input`.
    ///
    /// Panics if the span lies outside `input`; spans returned by a
    /// [`Decoder`] always fit the buffer they were produced from.
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.as_range()]
    }
}

/// Bencode decoder over an immutable byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    input: &'a [u8],
    options: DecodeOptions,
}

type Decoded<T> = Result<(T, usize), BencodeError>;

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, DecodeOptions::default())
    }

    pub fn with_options(input: &'a [u8], options: DecodeOptions) -> Self {
        Self { input, options }
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decodes a single element that must occupy the whole buffer.
    ///
    /// # Errors
    ///
    /// - `BencodeError::EmptyInput` - Buffer is empty
    /// - `BencodeError::TrailingData` - Bytes remain after the first element
    /// - Any syntax error raised by [`Decoder::decode_at`]
    pub fn decode(&self) -> Result<Element, BencodeError> {
        let (element, next) = self.decode_at(0)?;
        if next != self.input.len() {
            return Err(BencodeError::TrailingData { offset: next });
        }
        Ok(element)
    }

    /// Decodes the element starting at `offset`.
    ///
    /// Returns the element and the offset of the first byte after it.
    ///
    /// # Errors
    ///
    /// - `BencodeError::EmptyInput` - Buffer is empty
    /// - `BencodeError::TruncatedInput` - `offset` is past the end or the
    ///   element runs off the end of the buffer
    /// - `BencodeError::UnrecognizedTag`, `MalformedLength`,
    ///   `MalformedInteger`, `MalformedKey`, `DuplicateKey`,
    ///   `NestingTooDeep` - Syntax errors inside the element
    pub fn decode_at(&self, offset: usize) -> Result<(Element, usize), BencodeError> {
        if self.input.is_empty() {
            return Err(BencodeError::EmptyInput);
        }
        self.decode_element(offset, 0)
    }

    /// Decodes the element starting at `offset` and reports its byte range.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::decode_at`].
    pub fn decode_span_at(&self, offset: usize) -> Result<(Element, Span), BencodeError> {
        let (element, end) = self.decode_at(offset)?;
        Ok((element, Span { start: offset, end }))
    }

    /// Finds where the value stored under `key` begins.
    ///
    /// Walks the entries of the dictionary at `dict_offset`, decoding keys
    /// and stepping over values, and returns the offset of the first value
    /// whose key equals `key`. Returns `None` when the key is absent or the
    /// element at `dict_offset` is not a dictionary.
    ///
    /// # Errors
    ///
    /// Any syntax error met while stepping over entries before the match.
    pub fn locate_value(
        &self,
        dict_offset: usize,
        key: impl AsRef<[u8]>,
    ) -> Result<Option<usize>, BencodeError> {
        if self.input.is_empty() {
            return Err(BencodeError::EmptyInput);
        }
        if self.input.get(dict_offset) != Some(&b'd') {
            return Ok(None);
        }

        let key = key.as_ref();
        let mut cursor = dict_offset + 1;
        loop {
            match self.input.get(cursor) {
                None => return Err(BencodeError::TruncatedInput { offset: cursor }),
                Some(b'e') => return Ok(None),
                Some(_) => {}
            }

            let (entry_key, value_offset) = self.decode_key(cursor)?;
            if &entry_key[..] == key {
                tracing::trace!(
                    key = %String::from_utf8_lossy(key),
                    offset = value_offset,
                    "Located dictionary value"
                );
                return Ok(Some(value_offset));
            }

            let (_, next) = self.decode_element(value_offset, 1)?;
            cursor = next;
        }
    }

    fn decode_element(&self, offset: usize, depth: usize) -> Decoded<Element> {
        if depth > self.options.max_depth {
            return Err(BencodeError::NestingTooDeep {
                max_depth: self.options.max_depth,
                offset,
            });
        }

        let Some(&tag) = self.input.get(offset) else {
            return Err(BencodeError::TruncatedInput { offset });
        };

        match tag {
            b'0'..=b'9' => {
                let (bytes, next) = self.decode_byte_string(offset)?;
                Ok((Element::ByteString(bytes), next))
            }
            b'i' => self.decode_integer(offset),
            b'l' => self.decode_list(offset, depth),
            b'd' => self.decode_dictionary(offset, depth),
            other => Err(BencodeError::UnrecognizedTag { tag: other, offset }),
        }
    }

    /// `<length>:<bytes>`; `offset` points at the first length digit.
    fn decode_byte_string(&self, offset: usize) -> Decoded<Bytes> {
        let digits_end = self.input[offset..]
            .iter()
            .position(|byte| !byte.is_ascii_digit())
            .map(|position| offset + position)
            .ok_or(BencodeError::TruncatedInput {
                offset: self.input.len(),
            })?;

        if self.input[digits_end] != b':' {
            return Err(BencodeError::MalformedLength { offset });
        }

        let length = parse_length(&self.input[offset..digits_end])
            .ok_or(BencodeError::MalformedLength { offset })?;

        let start = digits_end + 1;
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.input.len())
            .ok_or(BencodeError::TruncatedInput { offset: start })?;

        Ok((Bytes::copy_from_slice(&self.input[start..end]), end))
    }

    /// `i<decimal>e`; `offset` points at the `i`.
    fn decode_integer(&self, offset: usize) -> Decoded<Element> {
        let start = offset + 1;
        let end = self.input[start..]
            .iter()
            .position(|&byte| byte == b'e')
            .map(|position| start + position)
            .ok_or(BencodeError::MalformedInteger { offset })?;

        let value =
            parse_integer(&self.input[start..end]).ok_or(BencodeError::MalformedInteger { offset })?;

        Ok((Element::Integer(value), end + 1))
    }

    /// `l<element>*e`; `offset` points at the `l`.
    fn decode_list(&self, offset: usize, depth: usize) -> Decoded<Element> {
        let mut items = Vec::new();
        let mut cursor = offset + 1;

        loop {
            match self.input.get(cursor) {
                None => return Err(BencodeError::TruncatedInput { offset: cursor }),
                Some(b'e') => return Ok((Element::List(items), cursor + 1)),
                Some(_) => {
                    let (item, next) = self.decode_element(cursor, depth + 1)?;
                    items.push(item);
                    cursor = next;
                }
            }
        }
    }

    /// `d(<string><element>)*e`; `offset` points at the `d`.
    fn decode_dictionary(&self, offset: usize, depth: usize) -> Decoded<Element> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = offset + 1;

        loop {
            match self.input.get(cursor) {
                None => return Err(BencodeError::TruncatedInput { offset: cursor }),
                Some(b'e') => {
                    let dictionary = Dictionary::from_unique_entries(entries);
                    return Ok((Element::Dictionary(dictionary), cursor + 1));
                }
                Some(_) => {}
            }

            let (key, value_offset) = self.decode_key(cursor)?;
            if !seen.insert(key.clone()) {
                return Err(BencodeError::DuplicateKey {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    offset: cursor,
                });
            }

            let (value, next) = self.decode_element(value_offset, depth + 1)?;
            entries.push((key, value));
            cursor = next;
        }
    }

    fn decode_key(&self, offset: usize) -> Decoded<Bytes> {
        match self.input.get(offset) {
            None => return Err(BencodeError::TruncatedInput { offset }),
            Some(byte) if !byte.is_ascii_digit() => {
                return Err(BencodeError::MalformedKey { offset });
            }
            Some(_) => {}
        }

        let (key, next) = self.decode_byte_string(offset)?;
        if self.options.require_utf8_keys && std::str::from_utf8(&key).is_err() {
            return Err(BencodeError::MalformedKey { offset });
        }
        Ok((key, next))
    }
}

/// Parses a string length. Leading zeros are rejected so the length
/// re-encodes to the same digits.
fn parse_length(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || (digits.len() > 1 && digits[0] == b'0') {
        return None;
    }
    digits.iter().try_fold(0usize, |length, &digit| {
        length
            .checked_mul(10)?
            .checked_add(usize::from(digit - b'0'))
    })
}

/// Parses the body of an integer: optional `-`, then digits with no leading
/// zero. `-0` is rejected.
fn parse_integer(body: &[u8]) -> Option<i64> {
    let digits = body.strip_prefix(b"-").unwrap_or(body);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if digits[0] == b'0' && (digits.len() > 1 || digits.len() != body.len()) {
        return None;
    }
    std::str::from_utf8(body).ok()?.parse().ok()
}
