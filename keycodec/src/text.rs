//! Text encodings used inside keys.
//!
//! Two encodings coexist:
//!
//! - **Fixed-unit**: every UTF-16 code unit becomes 2 big-endian bytes. It is
//!   used for a leading text slot of a two-field key, behind a `u16` byte
//!   length, so byte order of the payload equals code-unit order of the text.
//! - **Native**: plain UTF-8. It is used for multi-field keys (where a 14-bit
//!   trailer entry records the byte length) and for a terminal text slot of a
//!   two-field key (where the length is implied by the span).
//!
//! Both encodings have a hard bound imposed by their length headers. Text over
//! the bound is truncated without an error; callers that need to round-trip
//! arbitrarily long text must check the length themselves.

use std::cmp::Ordering;

use crate::error::KeyError;

/// Largest fixed-unit payload in bytes that a `u16` length header can express.
///
/// One byte below `u16::MAX` so the payload stays a whole number of units.
pub const MAX_UTF16_BYTES: usize = 0xFFFE;

/// Largest native payload in bytes that a multi-key trailer entry can express.
pub const MAX_NATIVE_BYTES: usize = 0x3FFF;

/// Number of UTF-16 code units kept when `text` is bounded to
/// [`MAX_UTF16_BYTES`].
fn bounded_utf16_units(text: &str) -> usize {
    let limit = MAX_UTF16_BYTES / 2;
    let mut units = 0;
    for ch in text.chars() {
        let width = ch.len_utf16();
        if units + width > limit {
            break;
        }
        units += width;
    }
    units
}

/// Encoded size of `text` in the fixed-unit form, after bounding.
#[must_use]
pub fn utf16_len(text: &str) -> usize {
    bounded_utf16_units(text) * 2
}

/// Append the fixed-unit form of `text` to `out`, bounded to
/// [`MAX_UTF16_BYTES`]. Returns the number of bytes written.
pub fn put_utf16(text: &str, out: &mut Vec<u8>) -> usize {
    let units = bounded_utf16_units(text);
    let total = text.encode_utf16().count();
    if units < total {
        tracing::debug!(
            total_units = total,
            kept_units = units,
            "text truncated to fit a two-byte length header"
        );
    }
    for unit in text.encode_utf16().take(units) {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    units * 2
}

/// Decode a fixed-unit payload.
pub fn get_utf16(bytes: &[u8]) -> Result<String, KeyError> {
    if bytes.len() % 2 != 0 {
        return Err(KeyError::malformed(format!(
            "utf-16 payload has odd length {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| KeyError::malformed(format!("invalid utf-16: {e}")))
}

/// Order two strings by UTF-16 code units, the order of their fixed-unit form.
///
/// This differs from `str` ordering only between supplementary-plane
/// characters and BMP characters at or above U+E000.
#[must_use]
pub fn cmp_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Longest prefix of `text` that fits in `limit` bytes without splitting a
/// character.
#[must_use]
pub fn bounded_native(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    tracing::debug!(
        original_bytes = text.len(),
        kept_bytes = end,
        "text truncated to the native length bound"
    );
    &text[..end]
}

/// Decode a native payload.
pub fn get_native(bytes: &[u8]) -> Result<String, KeyError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| KeyError::malformed(format!("invalid utf-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_bytes(text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        put_utf16(text, &mut out);
        out
    }

    #[test]
    fn test_utf16_layout() {
        assert_eq!(utf16_bytes("Ab"), vec![0x00, 0x41, 0x00, 0x62]);
        assert_eq!(utf16_bytes(""), Vec::<u8>::new());
        assert_eq!(utf16_len("Ab"), 4);
    }

    #[test]
    fn test_utf16_roundtrip_with_surrogates() {
        let text = "key-\u{3042}-\u{1F600}";
        let bytes = utf16_bytes(text);
        assert_eq!(bytes.len(), utf16_len(text));
        assert_eq!(get_utf16(&bytes).expect("decode"), text);
    }

    #[test]
    fn test_utf16_bound_truncates() {
        let text = "x".repeat(40_000);
        let bytes = utf16_bytes(&text);
        assert_eq!(bytes.len(), MAX_UTF16_BYTES);
        assert_eq!(get_utf16(&bytes).expect("decode").len(), MAX_UTF16_BYTES / 2);
    }

    #[test]
    fn test_utf16_bound_keeps_surrogate_pairs_whole() {
        // One unit short of the limit, then a character needing two units.
        let mut text = "x".repeat(MAX_UTF16_BYTES / 2 - 1);
        text.push('\u{1F600}');
        let bytes = utf16_bytes(&text);
        assert_eq!(bytes.len(), MAX_UTF16_BYTES - 2);
        assert!(get_utf16(&bytes).is_ok());
    }

    #[test]
    fn test_utf16_rejects_bad_payloads() {
        assert!(get_utf16(&[0x00]).is_err());
        // Lone high surrogate.
        assert!(get_utf16(&[0xD8, 0x00]).is_err());
    }

    #[test]
    fn test_cmp_utf16_matches_encoded_bytes() {
        let pairs = [
            ("apple", "banana"),
            ("b", "aa"),
            ("\u{ffff}", "\u{1F600}"),
            ("", "a"),
        ];
        for (a, b) in pairs {
            assert_eq!(cmp_utf16(a, b), utf16_bytes(a).cmp(&utf16_bytes(b)));
        }
        // Code-unit order puts U+FFFF above a surrogate pair; str order does not.
        assert_eq!(cmp_utf16("\u{ffff}", "\u{1F600}"), Ordering::Greater);
        assert_eq!("\u{ffff}".cmp("\u{1F600}"), Ordering::Less);
    }

    #[test]
    fn test_bounded_native_respects_char_boundaries() {
        assert_eq!(bounded_native("abc", 10), "abc");
        assert_eq!(bounded_native("abc", 2), "ab");
        // U+3042 is three bytes.
        assert_eq!(bounded_native("a\u{3042}", 3), "a");
        assert_eq!(bounded_native("a\u{3042}", 4), "a\u{3042}");
    }

    #[test]
    fn test_native_roundtrip() {
        let text = "caf\u{e9}";
        assert_eq!(get_native(text.as_bytes()).expect("decode"), text);
        assert!(get_native(&[0xC3]).is_err());
    }
}
