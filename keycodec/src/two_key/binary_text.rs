//! Binary leading field, text trailing field.

use std::fmt;

use super::{Hex, TwoFieldKey, fmt_pair, put_prefixed_binary, split_prefixed};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::text;
use crate::value::Value;

/// `(binary, text)` key.
///
/// Layout: `u16 len | first | utf8(second)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryTextKey {
    pub first: Vec<u8>,
    pub second: String,
}

impl BinaryTextKey {
    #[must_use]
    pub fn new(first: impl Into<Vec<u8>>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for BinaryTextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &Hex(&self.first), &self.second)
    }
}

impl TwoFieldKey for BinaryTextKey {
    type First = Vec<u8>;
    type Second = String;

    const KEY_TYPE: KeyType = KeyType::BinaryText;

    fn from_parts(first: Vec<u8>, second: String) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &Vec<u8> {
        &self.first
    }

    fn second(&self) -> &String {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_binary()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_text()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2 + self.first.len() + self.second.len()
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        put_prefixed_binary(&self.first, buf)?;
        buf.put_bytes(self.second.as_bytes());
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        split_prefixed(bytes)
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: first.to_vec(),
            second: text::get_native(second)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::two_key::testing;

    #[test]
    fn test_layout() {
        let bytes = BinaryTextKey::new(vec![0x00, 0x01], "hi")
            .to_bytes()
            .expect("encode");
        assert_eq!(bytes, vec![0x00, 0x02, 0x00, 0x01, b'h', b'i']);
    }

    #[test]
    fn test_roundtrip() {
        for key in [
            BinaryTextKey::default(),
            BinaryTextKey::new(vec![0xFE], ""),
            BinaryTextKey::new(Vec::new(), "\u{1F600}"),
        ] {
            testing::assert_roundtrip(&key);
        }
    }

    #[test]
    fn test_encoded_order() {
        let keys = testing::sorted(vec![
            BinaryTextKey::new(vec![0x02], "a"),
            BinaryTextKey::new(vec![0x01, 0xFF], ""),
            BinaryTextKey::new(vec![0x01], "b"),
            BinaryTextKey::new(vec![0x01], "a"),
            BinaryTextKey::new(Vec::new(), "z"),
        ]);
        testing::assert_encoded_order(&keys);
        testing::assert_strictly_increasing(&keys);
    }

    #[test]
    fn test_partial_bound() {
        let key = BinaryTextKey::new(vec![0x01], "");
        assert_eq!(
            key.compare_value(&Value::from(vec![0x01u8]))
                .expect("compare"),
            Ordering::Equal
        );
        testing::assert_partial_bound(&BinaryTextKey::new(vec![0x02], "x"), &Value::Null);
    }

    #[test]
    fn test_bad_utf8_is_malformed() {
        let error = BinaryTextKey::decode(&[0x00, 0x00, 0xFF]).expect_err("bad utf-8");
        assert!(matches!(error, KeyError::MalformedBinary(_)));
    }
}
