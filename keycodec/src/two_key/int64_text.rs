//! 64-bit integer leading field, text trailing field.

use std::fmt;

use super::{TwoFieldKey, fmt_pair};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::numeric::{self, WIDTH_64};
use crate::text;
use crate::value::Value;

/// `(i64, text)` key.
///
/// Layout: `i64(first) | utf8(second)`. The leading field is fixed width so
/// plain byte order of the encoding is key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int64TextKey {
    pub first: i64,
    pub second: String,
}

impl Int64TextKey {
    #[must_use]
    pub fn new(first: i64, second: impl Into<String>) -> Self {
        Self {
            first,
            second: second.into(),
        }
    }
}

impl fmt::Display for Int64TextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &self.first, &self.second)
    }
}

impl TwoFieldKey for Int64TextKey {
    type First = i64;
    type Second = String;

    const KEY_TYPE: KeyType = KeyType::Int64Text;

    fn from_parts(first: i64, second: String) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &i64 {
        &self.first
    }

    fn second(&self) -> &String {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_i64()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_text()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        WIDTH_64 + self.second.len()
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        buf.put_bytes(&numeric::encode_i64(self.first));
        buf.put_bytes(self.second.as_bytes());
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        if bytes.len() < WIDTH_64 {
            return Err(KeyError::malformed(format!(
                "expected at least {WIDTH_64} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(bytes.split_at(WIDTH_64))
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: numeric::read_i64(first, 0)?,
            second: text::get_native(second)?,
        })
    }
}
