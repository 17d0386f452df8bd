//! Base32 codec using Crockford's alphabet.
//!
//! The alphabet drops `I`, `L`, `O` and `U` to avoid misreadings; no
//! padding is emitted. Decoding is forgiving the way the alphabet was
//! designed to be:
//!
//! - case-insensitive,
//! - `O`/`o` read as `0`, `I`/`i`/`L`/`l` read as `1`,
//! - `-` separators are skipped anywhere in the input.
//!
//! `U` stays invalid; it exists in no encoder output.

use crate::codec::{invalid_char, INVALID};
use crate::error::DecodeError;

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const SEPARATOR: u8 = b'-';

const DECODE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut value = 0u8;
    while value < 32 {
        let upper = ALPHABET[value as usize];
        table[upper as usize] = value;
        table[upper.to_ascii_lowercase() as usize] = value;
        value += 1;
    }
    // Confusable aliases.
    table[b'O' as usize] = 0;
    table[b'o' as usize] = 0;
    table[b'I' as usize] = 1;
    table[b'i' as usize] = 1;
    table[b'L' as usize] = 1;
    table[b'l' as usize] = 1;
    table
}

/// Encodes bytes as Crockford base32, without padding.
///
/// # Example
///
/// ```
/// assert_eq!(datakit::codec::base32::encode(b"Man"), "9NGPW");
/// ```
pub fn encode(data: &[u8]) -> String {
    // 5 bytes map to 8 symbols; a partial tail of n bytes maps to
    // ceil(8n / 5) symbols.
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);

    let mut chunks = data.chunks_exact(5);
    for block in chunks.by_ref() {
        let [b0, b1, b2, b3, b4] = [block[0], block[1], block[2], block[3], block[4]];
        out.push(ALPHABET[(b0 >> 3) as usize] as char);
        out.push(ALPHABET[(((b0 & 0x07) << 2) | (b1 >> 6)) as usize] as char);
        out.push(ALPHABET[((b1 >> 1) & 0x1F) as usize] as char);
        out.push(ALPHABET[(((b1 & 0x01) << 4) | (b2 >> 4)) as usize] as char);
        out.push(ALPHABET[(((b2 & 0x0F) << 1) | (b3 >> 7)) as usize] as char);
        out.push(ALPHABET[((b3 >> 2) & 0x1F) as usize] as char);
        out.push(ALPHABET[(((b3 & 0x03) << 3) | (b4 >> 5)) as usize] as char);
        out.push(ALPHABET[(b4 & 0x1F) as usize] as char);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let bits = tail.len() * 8;
        let symbols = bits.div_ceil(5);
        let mut acc = 0u64;
        for &byte in tail {
            acc = (acc << 8) | u64::from(byte);
        }
        // Left-align to a whole number of 5-bit symbols.
        acc <<= symbols * 5 - bits;
        for shift in (0..symbols).rev() {
            out.push(ALPHABET[((acc >> (shift * 5)) & 0x1F) as usize] as char);
        }
    }
    out
}

/// Decodes Crockford base32 text.
///
/// Accepts either case, the confusable aliases, and `-` separators at any
/// position. Fails with [`DecodeError::InvalidChar`] at the first
/// character outside the alphabet; trailing bits that do not fill a byte
/// are discarded.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 5 / 8);
    let mut acc = 0u64;
    let mut bits = 0u32;

    for (index, &byte) in bytes.iter().enumerate() {
        if byte == SEPARATOR {
            continue;
        }
        let value = DECODE[byte as usize];
        if value == INVALID {
            return Err(invalid_char(text, index));
        }
        acc = (acc << 5) | u64::from(value);
        bits += 5;
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Ok(out)
}
