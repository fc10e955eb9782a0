//! Text leading field, 64-bit integer trailing field.

use std::cmp::Ordering;
use std::fmt;

use super::{TwoFieldKey, decode_i64_slot, fmt_pair, put_prefixed_utf16, split_prefixed};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::numeric::{self, WIDTH_64};
use crate::text;
use crate::value::Value;

/// `(text, i64)` key.
///
/// Layout: `u16 len | utf16(first) | i64(second)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextInt64Key {
    pub first: String,
    pub second: i64,
}

impl TextInt64Key {
    #[must_use]
    pub fn new(first: impl Into<String>, second: i64) -> Self {
        Self {
            first: first.into(),
            second,
        }
    }
}

impl Ord for TextInt64Key {
    fn cmp(&self, other: &Self) -> Ordering {
        text::cmp_utf16(&self.first, &other.first).then_with(|| self.second.cmp(&other.second))
    }
}

impl PartialOrd for TextInt64Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TextInt64Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &self.first, &self.second)
    }
}

impl TwoFieldKey for TextInt64Key {
    type First = String;
    type Second = i64;

    const KEY_TYPE: KeyType = KeyType::TextInt64;
    const ZERO_SECOND: &'static [u8] = &numeric::encode_i64(0);

    fn from_parts(first: String, second: i64) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &String {
        &self.first
    }

    fn second(&self) -> &i64 {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_text()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_i64()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2 + text::utf16_len(&self.first) + WIDTH_64
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        put_prefixed_utf16(&self.first, buf)?;
        buf.put_bytes(&numeric::encode_i64(self.second));
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        split_prefixed(bytes)
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: text::get_utf16(first)?,
            second: decode_i64_slot(second)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::two_key::testing;

    #[test]
    fn test_layout() {
        let bytes = TextInt64Key::new("a", 1).to_bytes().expect("encode");
        assert_eq!(
            bytes,
            vec![0x00, 0x02, 0x00, b'a', 0x80, 0, 0, 0, 0, 0, 0, 0x01]
        );
    }

    #[test]
    fn test_roundtrip() {
        for key in [
            TextInt64Key::default(),
            TextInt64Key::new("user", i64::MIN),
            TextInt64Key::new("user", -1),
            TextInt64Key::new("\u{e9}t\u{e9}", i64::MAX),
        ] {
            testing::assert_roundtrip(&key);
        }
    }

    #[test]
    fn test_encoded_order() {
        let keys = testing::sorted(vec![
            TextInt64Key::new("user", i64::MIN),
            TextInt64Key::new("user", 0),
            TextInt64Key::new("user", i64::MAX),
            TextInt64Key::new("users", -5),
            TextInt64Key::new("z", -5),
            TextInt64Key::new("", 7),
            // U+FFFF sorts above a surrogate pair in code-unit order.
            TextInt64Key::new("\u{ffff}", 0),
            TextInt64Key::new("\u{1F600}", 0),
        ]);
        testing::assert_encoded_order(&keys);
        testing::assert_strictly_increasing(&keys);
        assert!(TextInt64Key::new("\u{1F600}", 0) < TextInt64Key::new("\u{ffff}", 0));
    }

    #[test]
    fn test_partial_bound_accepts_numeric_text() {
        let key = TextInt64Key::new("7", 3);
        testing::assert_partial_bound(&key, &Value::Int64(7));
        assert_eq!(
            key.compare_value(&Value::Int64(7)).expect("compare"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_malformed() {
        // Header claims more bytes than follow.
        assert!(TextInt64Key::decode(&[0x00, 0x10, 0x00]).is_err());
        // Trailing field has the wrong width.
        assert!(TextInt64Key::decode(&[0x00, 0x00, 0x80, 0x00, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_leading_only_span_orders_as_zero_trailing_field() {
        let leading_only = |text: &str| {
            let mut bytes = TextInt64Key::new(text, 0).to_bytes().expect("encode");
            bytes.truncate(bytes.len() - WIDTH_64);
            bytes
        };
        let bound = leading_only("user");
        let below = TextInt64Key::new("user", -1).to_bytes().expect("encode");
        let zero = TextInt64Key::new("user", 0).to_bytes().expect("encode");
        assert_eq!(
            TextInt64Key::compare_encoded(&bound, &below).expect("compare"),
            Ordering::Greater
        );
        assert_eq!(
            TextInt64Key::compare_encoded(&bound, &zero).expect("compare"),
            Ordering::Equal
        );
        testing::assert_decoded_order::<TextInt64Key>(&[
            bound,
            below,
            zero,
            TextInt64Key::new("user", i64::MAX).to_bytes().expect("encode"),
            leading_only("users"),
            TextInt64Key::new("users", i64::MIN).to_bytes().expect("encode"),
        ]);
    }

    #[test]
    fn test_encoded_comparator_rejects_wrong_trailing_width() {
        let short = [0x00, 0x00, 0x80, 0x00, 0x00, 0x00];
        let full = TextInt64Key::default().to_bytes().expect("encode");
        assert!(TextInt64Key::compare_encoded(&short, &full).is_err());
    }
}
