//! Binary leading field, binary trailing field.

use std::fmt;

use super::{Hex, TwoFieldKey, fmt_pair, put_prefixed_binary, split_prefixed};
use crate::buffer::KeyBuffer;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::value::Value;

/// `(binary, binary)` key.
///
/// Layout: `u16 len | first | second`. A leading field longer than
/// `u16::MAX` bytes cannot be encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryBinaryKey {
    pub first: Vec<u8>,
    pub second: Vec<u8>,
}

impl BinaryBinaryKey {
    #[must_use]
    pub fn new(first: impl Into<Vec<u8>>, second: impl Into<Vec<u8>>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for BinaryBinaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pair(f, Self::KEY_TYPE, &Hex(&self.first), &Hex(&self.second))
    }
}

impl TwoFieldKey for BinaryBinaryKey {
    type First = Vec<u8>;
    type Second = Vec<u8>;

    const KEY_TYPE: KeyType = KeyType::BinaryBinary;

    fn from_parts(first: Vec<u8>, second: Vec<u8>) -> Self {
        Self { first, second }
    }

    fn first(&self) -> &Vec<u8> {
        &self.first
    }

    fn second(&self) -> &Vec<u8> {
        &self.second
    }

    fn set_first(&mut self, value: &Value) -> Result<(), KeyError> {
        self.first = value.to_binary()?;
        Ok(())
    }

    fn set_second(&mut self, value: &Value) -> Result<(), KeyError> {
        self.second = value.to_binary()?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2 + self.first.len() + self.second.len()
    }

    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        put_prefixed_binary(&self.first, buf)?;
        buf.put_bytes(&self.second);
        Ok(())
    }

    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
        split_prefixed(bytes)
    }

    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::new(first, second))
    }
}
