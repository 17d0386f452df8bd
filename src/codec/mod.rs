//! Base-N binary-to-text codecs.
//!
//! - [`base16`]: hexadecimal, upper- and lowercase output, case-insensitive
//!   decode.
//! - [`base32`]: Crockford's alphabet, confusable-character tolerant,
//!   separator-aware, no padding.
//! - [`base64`]: RFC 4648 standard and URL-safe alphabets.
//!
//! All decoders report the first bad character with its byte offset via
//! [`DecodeError`](crate::error::DecodeError).

pub mod base16;
pub mod base32;
pub mod base64;

/// Sentinel for "not in the alphabet" in the 256-entry decode tables.
pub(crate) const INVALID: u8 = 0xFF;

/// Builds an [`InvalidChar`](crate::error::DecodeError::InvalidChar) error
/// for the character starting at byte `index` of `text`.
pub(crate) fn invalid_char(text: &str, index: usize) -> crate::error::DecodeError {
    let ch = text[index..]
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    crate::error::DecodeError::InvalidChar { ch, index }
}
