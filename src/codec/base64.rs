//! Base64 codec, RFC 4648 standard and URL-safe alphabets.
//!
//! [`encode`] pads with `=` to a multiple of four; [`encode_url`] uses the
//! `-`/`_` alphabet and never pads, matching its usual role in URLs and
//! tokens. Both decoders tolerate missing padding, so either decoder
//! accepts its encoder's output as well as padded and unpadded forms.

use crate::codec::{invalid_char, INVALID};
use crate::error::DecodeError;

const STD: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URL: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const PAD: u8 = b'=';

const DECODE_STD: [u8; 256] = build_decode_table(STD);
const DECODE_URL: [u8; 256] = build_decode_table(URL);

const fn build_decode_table(alphabet: &[u8; 64]) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut value = 0u8;
    while value < 64 {
        table[alphabet[value as usize] as usize] = value;
        value += 1;
    }
    table
}

/// Encodes bytes as standard base64 with `=` padding.
///
/// # Example
///
/// ```
/// assert_eq!(datakit::codec::base64::encode(b"Man"), "TWFu");
/// assert_eq!(datakit::codec::base64::encode(b"Ma"), "TWE=");
/// ```
pub fn encode(data: &[u8]) -> String {
    encode_with(data, STD, true)
}

/// Decodes standard base64, with or without padding.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    decode_with(text, &DECODE_STD)
}

/// Encodes bytes as URL-safe base64, without padding.
pub fn encode_url(data: &[u8]) -> String {
    encode_with(data, URL, false)
}

/// Decodes URL-safe base64, with or without padding.
pub fn decode_url(text: &str) -> Result<Vec<u8>, DecodeError> {
    decode_with(text, &DECODE_URL)
}

fn encode_with(data: &[u8], table: &[u8; 64], pad: bool) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    let mut chunks = data.chunks_exact(3);
    for block in chunks.by_ref() {
        let [g0, g1, g2] = [block[0], block[1], block[2]];
        out.push(table[(g0 >> 2) as usize] as char);
        out.push(table[(((g0 & 0x03) << 4) | (g1 >> 4)) as usize] as char);
        out.push(table[(((g1 & 0x0F) << 2) | (g2 >> 6)) as usize] as char);
        out.push(table[(g2 & 0x3F) as usize] as char);
    }

    match chunks.remainder() {
        [] => {},
        &[a] => {
            out.push(table[(a >> 2) as usize] as char);
            out.push(table[((a & 0x03) << 4) as usize] as char);
            if pad {
                out.push_str("==");
            }
        },
        &[a, b] => {
            out.push(table[(a >> 2) as usize] as char);
            out.push(table[(((a & 0x03) << 4) | (b >> 4)) as usize] as char);
            out.push(table[((b & 0x0F) << 2) as usize] as char);
            if pad {
                out.push('=');
            }
        },
        _ => unreachable!("chunks_exact(3) remainder has at most 2 bytes"),
    }
    out
}

fn decode_with(text: &str, table: &[u8; 256]) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_bytes();

    // Up to two trailing pad characters are ignored; padding anywhere else
    // is an ordinary invalid character.
    let mut body_len = bytes.len();
    while body_len > 0 && bytes[body_len - 1] == PAD && bytes.len() - body_len < 2 {
        body_len -= 1;
    }
    if body_len % 4 == 1 {
        return Err(DecodeError::InvalidLength { len: body_len });
    }

    let mut out = Vec::with_capacity(body_len * 3 / 4);
    let mut block = [0u8; 4];
    let mut filled = 0usize;

    for (index, &byte) in bytes[..body_len].iter().enumerate() {
        let value = table[byte as usize];
        if value == INVALID {
            return Err(invalid_char(text, index));
        }
        block[filled] = value;
        filled += 1;
        if filled == 4 {
            out.push((block[0] << 2) | (block[1] >> 4));
            out.push((block[1] << 4) | (block[2] >> 2));
            out.push((block[2] << 6) | block[3]);
            filled = 0;
        }
    }

    match filled {
        0 => {},
        2 => out.push((block[0] << 2) | (block[1] >> 4)),
        3 => {
            out.push((block[0] << 2) | (block[1] >> 4));
            out.push((block[1] << 4) | (block[2] >> 2));
        },
        _ => return Err(DecodeError::InvalidLength { len: body_len }),
    }
    Ok(out)
}
