//! Binary leading field, 64-bit integer trailing field.
//!
//! The length of the leading field is written last, as a `u32` trailer, so a
//! reader finds it from the end of the span.

use std::fmt;

use super::{Hex, TwoFieldKey, binary_capacity, decode_i64_slot, fmt_pair};
use crate::buffer::{KeyBuffer, read_u32};
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::numeric::{self, WIDTH_64};
use crate::value::Value;

const TRAILER_LEN: usize = 4;

/// `(binary, i64)` key.
///
/// Layout: `first | i64(second) | u32 len(first)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryInt64Key {
    pub first: Vec<u8>,
    pub second: i64,
}

impl BinaryInt64Key {
    #[must_use]
    pub fn new(first: impl Into<Vec<u8>>, second: i64) -> Self {
        Self {
            first: first.into(),
            second,
        }
    }
}

impl fmt::Display for BinaryInt64Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &Hex(&self.first), &self.second)
    }
}

impl TwoFieldKey for BinaryInt64Key {
    type First = Vec<u8>;
    type Second = i64;

    const KEY_TYPE: KeyType = KeyType::BinaryInt64;
    const ZERO_SECOND: &'static [u8] = &numeric::encode_i64(0);

    fn from_parts(first: Vec<u8>, second: i64) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &Vec<u8> {
        &self.first
    }

    fn second(&self) -> &i64 {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_binary()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_i64()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        self.first.len() + WIDTH_64 + TRAILER_LEN
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        let trailer = u32::try_from(self.first.len()).map_err(|_| {
            binary_capacity(&self.first, usize::try_from(u32::MAX).unwrap_or(usize::MAX))
        })?;
        buf.put_bytes(&self.first);
        buf.put_bytes(&numeric::encode_i64(self.second));
        buf.put_u32(trailer);
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        let body_len = bytes
            .len()
            .checked_sub(TRAILER_LEN)
            .ok_or_else(|| KeyError::malformed("missing four-byte length trailer"))?;
        let first_len = read_u32(bytes, body_len)
            .and_then(|len| usize::try_from(len).ok())
            .filter(|&len| len <= body_len)
            .ok_or_else(|| {
                KeyError::malformed(format!(
                    "leading field length exceeds the {body_len} byte body"
                ))
            })?;
        Ok(bytes[..body_len].split_at(first_len))
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            first: first.to_vec(),
            second: decode_i64_slot(second)?,
        })
    }
}
