//! Text leading field, binary trailing field.

use std::cmp::Ordering;
use std::fmt;

use super::{Hex, TwoFieldKey, fmt_pair, put_prefixed_utf16, split_prefixed};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::text;
use crate::value::Value;

/// `(text, binary)` key.
///
/// Layout: `u16 len | utf16(first) | second`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextBinaryKey {
    pub first: String,
    pub second: Vec<u8>,
}

impl TextBinaryKey {
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<Vec<u8>>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl Ord for TextBinaryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        text::cmp_utf16(&self.first, &other.first).then_with(|| self.second.cmp(&other.second))
    }
}

impl PartialOrd for TextBinaryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TextBinaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &self.first, &Hex(&self.second))
    }
}

impl TwoFieldKey for TextBinaryKey {
    type First = String;
    type Second = Vec<u8>;

    const KEY_TYPE: KeyType = KeyType::TextBinary;

    fn from_parts(first: String, second: Vec<u8>) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &String {
        &self.first
    }

    fn second(&self) -> &Vec<u8> {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_text()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_binary()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2 + text::utf16_len(&self.first) + self.second.len()
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        put_prefixed_utf16(&self.first, buf)?;
        buf.put_bytes(&self.second);
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        split_prefixed(bytes)
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: text::get_utf16(first)?,
            second: second.to_vec(),
        })
    }
}
