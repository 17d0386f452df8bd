//! Hexadecimal (base16) codec.
//!
//! Encodes to uppercase by default ([`encode`]), lowercase on request
//! ([`encode_lower`]); decoding accepts either case. Input of odd length
//! is rejected up front with [`DecodeError::OddLength`].

use crate::codec::{invalid_char, INVALID};
use crate::error::DecodeError;

const UPPER: &[u8; 16] = b"0123456789ABCDEF";
const LOWER: &[u8; 16] = b"0123456789abcdef";

const DECODE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut digit = 0u8;
    while digit < 16 {
        table[UPPER[digit as usize] as usize] = digit;
        table[LOWER[digit as usize] as usize] = digit;
        digit += 1;
    }
    table
}

/// Encodes bytes as uppercase hex.
///
/// # Example
///
/// ```
/// assert_eq!(datakit::codec::base16::encode(b"Man"), "4D616E");
/// ```
pub fn encode(data: &[u8]) -> String {
    encode_with(data, UPPER)
}

/// Encodes bytes as lowercase hex.
pub fn encode_lower(data: &[u8]) -> String {
    encode_with(data, LOWER)
}

fn encode_with(data: &[u8], table: &[u8; 16]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for &byte in data {
        out.push(table[(byte >> 4) as usize] as char);
        out.push(table[(byte & 0x0F) as usize] as char);
    }
    out
}

/// Decodes hex text of either case.
///
/// Fails with [`DecodeError::OddLength`] for inputs of odd length and
/// [`DecodeError::InvalidChar`] for non-hex characters.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength { len: bytes.len() });
    }

    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (pair, chunk) in bytes.chunks_exact(2).enumerate() {
        let hi = DECODE[chunk[0] as usize];
        if hi == INVALID {
            return Err(invalid_char(text, pair * 2));
        }
        let lo = DECODE[chunk[1] as usize];
        if lo == INVALID {
            return Err(invalid_char(text, pair * 2 + 1));
        }
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "66");
        assert_eq!(encode(b"fo"), "666F");
        assert_eq!(encode(b"foobar"), "666F6F626172");
        assert_eq!(encode(b"Man"), "4D616E");
        assert_eq!(encode(&[0x00, 0xFF]), "00FF");
    }

    #[test]
    fn lowercase_variant() {
        assert_eq!(encode_lower(b"foobar"), "666f6f626172");
        assert_eq!(encode_lower(&[0xAB, 0xCD]), "abcd");
    }

    #[test]
    fn decode_accepts_both_cases() {
        assert_eq!(decode("4D616E"), Ok(b"Man".to_vec()));
        assert_eq!(decode("4d616e"), Ok(b"Man".to_vec()));
        assert_eq!(decode("4d616E"), Ok(b"Man".to_vec()));
    }

    #[test]
    fn empty_roundtrip() {
        assert_eq!(decode("").as_deref(), Ok(&[][..]));
    }

    #[test]
    fn odd_length_rejected() {
        assert_eq!(decode("abc"), Err(DecodeError::OddLength { len: 3 }));
        assert_eq!(decode("f"), Err(DecodeError::OddLength { len: 1 }));
    }

    #[test]
    fn invalid_characters_report_position() {
        assert_eq!(
            decode("0g"),
            Err(DecodeError::InvalidChar { ch: 'g', index: 1 })
        );
        assert_eq!(
            decode("zz"),
            Err(DecodeError::InvalidChar { ch: 'z', index: 0 })
        );
        assert_eq!(
            decode("00 1"),
            Err(DecodeError::InvalidChar { ch: ' ', index: 2 })
        );
    }

    #[test]
    fn non_ascii_reported_as_full_char() {
        // "é" is two bytes, so the input length is even.
        assert_eq!(
            decode("00é"),
            Err(DecodeError::InvalidChar { ch: 'é', index: 2 })
        );
    }

    #[test]
    fn roundtrip_all_byte_values() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&data)), Ok(data.clone()));
        assert_eq!(decode(&encode_lower(&data)), Ok(data));
    }
}
