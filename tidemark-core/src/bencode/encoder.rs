//! Bencode encoder.

use bytes::Bytes;

use super::element::Element;

/// Encodes `element` into a new buffer.
///
/// Dictionary entries are written in their stored order, so an element tree
/// produced by the decoder re-encodes to the bytes it was decoded from.
pub fn encode(element: &Element) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(element, &mut buf);
    buf
}

/// Appends the encoding of `element` to `buf`.
pub fn encode_into(element: &Element, buf: &mut Vec<u8>) {
    match element {
        Element::ByteString(bytes) => encode_byte_string(bytes, buf),
        Element::Integer(value) => {
            let mut digits = itoa::Buffer::new();
            buf.push(b'i');
            buf.extend_from_slice(digits.format(*value).as_bytes());
            buf.push(b'e');
        }
        Element::List(items) => {
            buf.push(b'l');
            for item in items {
                encode_into(item, buf);
            }
            buf.push(b'e');
        }
        Element::Dictionary(dictionary) => {
            buf.push(b'd');
            for (key, value) in dictionary.iter() {
                encode_byte_string(key, buf);
                encode_into(value, buf);
            }
            buf.push(b'e');
        }
    }
}

fn encode_byte_string(bytes: &Bytes, buf: &mut Vec<u8>) {
    let mut digits = itoa::Buffer::new();
    buf.extend_from_slice(digits.format(bytes.len()).as_bytes());
    buf.push(b':');
    buf.extend_from_slice(bytes);
}
