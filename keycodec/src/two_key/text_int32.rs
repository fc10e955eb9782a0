//! Text leading field, 32-bit integer trailing field.

use std::cmp::Ordering;
use std::fmt;

use super::{TwoFieldKey, decode_i32_slot, fmt_pair, put_prefixed_utf16, split_prefixed};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::numeric::{self, WIDTH_32};
use crate::text;
use crate::value::Value;

/// `(text, i32)` key.
///
/// Layout: `u16 len | utf16(first) | i32(second)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextInt32Key {
    pub first: String,
    pub second: i32,
}

impl TextInt32Key {
    #[must_use]
    pub fn new(first: impl Into<String>, second: i32) -> Self {
        Self {
            first: first.into(),
            second,
        }
    }
}

impl Ord for TextInt32Key {
    fn cmp(&self, other: &Self) -> Ordering {
        text::cmp_utf16(&self.first, &other.first).then_with(|| self.second.cmp(&other.second))
    }
}

impl PartialOrd for TextInt32Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TextInt32Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &self.first, &self.second)
    }
}

impl TwoFieldKey for TextInt32Key {
    type First = String;
    type Second = i32;

    const KEY_TYPE: KeyType = KeyType::TextInt32;
    const ZERO_SECOND: &'static [u8] = &numeric::encode_i32(0);

    fn from_parts(first: String, second: i32) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &String {
        &self.first
    }

    fn second(&self) -> &i32 {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_text()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_i32()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2 + text::utf16_len(&self.first) + WIDTH_32
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        put_prefixed_utf16(&self.first, buf)?;
        buf.put_bytes(&numeric::encode_i32(self.second));
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        split_prefixed(bytes)
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: text::get_utf16(first)?,
            second: decode_i32_slot(second)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::compare::byte_compare;
    use crate::two_key::testing;

    #[test]
    fn test_layout() {
        let bytes = TextInt32Key::new("ab", -1).to_bytes().expect("encode");
        assert_eq!(
            bytes,
            vec![0x00, 0x04, 0x00, b'a', 0x00, b'b', 0x7F, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_same_text_orders_by_number() {
        let five = TextInt32Key::new("apple", 5);
        let ten = TextInt32Key::new("apple", 10);
        assert!(five < ten);

        let a = five.to_bytes().expect("encode");
        let b = ten.to_bytes().expect("encode");
        assert_eq!(byte_compare(&a, &b), Ordering::Less);
        assert_eq!(
            TextInt32Key::compare_encoded(&a, &b).expect("compare"),
            Ordering::Less
        );
    }

    #[test]
    fn test_roundtrip() {
        for key in [
            TextInt32Key::default(),
            TextInt32Key::new("", i32::MIN),
            TextInt32Key::new("apple", 0),
            TextInt32Key::new("\u{3042}\u{1F600}", i32::MAX),
        ] {
            testing::assert_roundtrip(&key);
        }
    }

    #[test]
    fn test_encoded_order_with_unequal_text_lengths() {
        // "b" has a shorter header than "aa" but must sort after it.
        let keys = testing::sorted(vec![
            TextInt32Key::new("aa", 1),
            TextInt32Key::new("b", -4),
            TextInt32Key::new("", 3),
            TextInt32Key::new("apple", 5),
            TextInt32Key::new("apple", 10),
        ]);
        testing::assert_encoded_order(&keys);
        testing::assert_strictly_increasing(&keys);
    }

    #[test]
    fn test_random_encoded_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let keys: Vec<TextInt32Key> = (0..60)
            .map(|_| {
                let len = rng.random_range(0..4);
                let first: String = (0..len)
                    .map(|_| char::from(rng.random_range(b'a'..=b'c')))
                    .collect();
                TextInt32Key::new(first, rng.random_range(-3..3))
            })
            .collect();
        testing::assert_encoded_order(&keys);
    }

    #[test]
    fn test_partial_bound() {
        let key = TextInt32Key::new("apple", 5);
        testing::assert_partial_bound(&key, &Value::from("apple"));
        assert_eq!(
            key.compare_value(&Value::from("apple")).expect("compare"),
            Ordering::Greater
        );
        assert_eq!(
            TextInt32Key::new("apple", -1)
                .compare_value(&Value::from("apple"))
                .expect("compare"),
            Ordering::Less
        );
        assert_eq!(
            key.compare_value(&Value::from("banana")).expect("compare"),
            Ordering::Less
        );
        // Numbers are accepted as text.
        testing::assert_partial_bound(&key, &Value::Int32(12));
        assert!(key.compare_value(&Value::from(vec![1u8])).is_err());
    }

    #[test]
    fn test_setters_coerce() {
        let mut key = TextInt32Key::default();
        key.set_first(&Value::Int64(42)).expect("number as text");
        key.set_second(&Value::from("17")).expect("numeric text");
        assert_eq!(key, TextInt32Key::new("42", 17));
        assert!(key.set_second(&Value::from("pear")).is_err());
        assert!(key.set_second(&Value::Int64(i64::MAX)).is_err());
        assert_eq!(key, TextInt32Key::new("42", 17));
    }

    #[test]
    fn test_compare_values() {
        let key = TextInt32Key::new("k", 3);
        assert_eq!(
            key.compare_values(&Value::from("k"), &Value::Int32(3))
                .expect("compare"),
            Ordering::Equal
        );
        assert_eq!(
            key.compare_values(&Value::from("k"), &Value::Float64(3.5))
                .expect("compare"),
            Ordering::Equal
        );
    }

    #[test]
    fn test_decode_edge_cases() {
        assert_eq!(
            TextInt32Key::decode(&[]).expect("empty"),
            TextInt32Key::default()
        );
        // Zero-length trailing field.
        let key = TextInt32Key::decode(&[0x00, 0x02, 0x00, b'x']).expect("short");
        assert_eq!(key, TextInt32Key::new("x", 0));
        assert!(TextInt32Key::decode(&[0x00, 0x02, 0x00, b'x', 0x80]).is_err());
        assert!(TextInt32Key::decode(&[0x00, 0x03, 0x00, b'x', 0x00]).is_err());
    }

    #[test]
    fn test_decode_from_buffer_span() {
        let mut buf = KeyBuffer::new();
        buf.put_bytes(b"junk");
        let key = TextInt32Key::new("span", 9);
        key.encode(&mut buf).expect("encode");
        let decoded = TextInt32Key::decode_from(&buf, 4, key.encoded_len()).expect("decode");
        assert_eq!(decoded, key);
        assert!(TextInt32Key::decode_from(&buf, 5, key.encoded_len()).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TextInt32Key::new("apple", 5).to_string(),
            "[string-number32]apple,5"
        );
    }

    #[test]
    fn test_leading_only_span_orders_as_zero_trailing_field() {
        let leading_only = |text: &str| {
            let mut bytes = TextInt32Key::new(text, 0).to_bytes().expect("encode");
            bytes.truncate(bytes.len() - WIDTH_32);
            bytes
        };
        let bound = leading_only("apple");
        let below = TextInt32Key::new("apple", -1).to_bytes().expect("encode");
        assert_eq!(
            TextInt32Key::compare_encoded(&bound, &below).expect("compare"),
            Ordering::Greater
        );
        testing::assert_decoded_order::<TextInt32Key>(&[
            bound,
            below,
            TextInt32Key::new("apple", 0).to_bytes().expect("encode"),
            TextInt32Key::new("apple", 1).to_bytes().expect("encode"),
            leading_only(""),
            TextInt32Key::new("", i32::MIN).to_bytes().expect("encode"),
            leading_only("b"),
            TextInt32Key::new("aa", i32::MAX).to_bytes().expect("encode"),
        ]);
    }
}
