//! 32-bit integer leading field, 64-bit integer trailing field.

use std::fmt;

use super::{TwoFieldKey, decode_i64_slot, fmt_pair};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::numeric::{self, WIDTH_32, WIDTH_64};
use crate::value::Value;

/// Encoded size of every key of this variant.
pub const ENCODED_LEN: usize = WIDTH_32 + WIDTH_64;

/// `(i32, i64)` key.
///
/// Layout: `i32(first) | i64(second)`, always 12 bytes. Both fields are fixed
/// width, so plain byte order of the encoding is key order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int32Int64Key {
    pub first: i32,
    pub second: i64,
}

impl Int32Int64Key {
    #[must_use]
    pub const fn new(first: i32, second: i64) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for Int32Int64Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &self.first, &self.second)
    }
}

impl TwoFieldKey for Int32Int64Key {
    type First = i32;
    type Second = i64;

    const KEY_TYPE: KeyType = KeyType::Int32Int64;
    const ZERO_SECOND: &'static [u8] = &numeric::encode_i64(0);

    fn from_parts(first: i32, second: i64) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &i32 {
        &self.first
    }

    fn second(&self) -> &i64 {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_i32()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_i64()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        ENCODED_LEN
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        buf.put_bytes(&numeric::encode_i32(self.first));
        buf.put_bytes(&numeric::encode_i64(self.second));
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        if bytes.len() != ENCODED_LEN && bytes.len() != WIDTH_32 {
            return Err(KeyError::malformed(format!(
                "expected {WIDTH_32} or {ENCODED_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(bytes.split_at(WIDTH_32))
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: numeric::read_i32(first, 0)?,
            second: decode_i64_slot(second)?,
        })
    }
}
