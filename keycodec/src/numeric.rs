//! Order-preserving fixed-width numeric encoding.
//!
//! Signed values are written big-endian with the sign bit inverted, so that an
//! unsigned byte comparison of the encoded form matches signed numeric order:
//! negative values land below `0x80...` and positive values above it.
//!
//! Floats reuse the integer transform on their IEEE-754 bit pattern. That is
//! only monotonic for non-negative values; negative floats come out in reverse
//! magnitude order and NaN has no defined position. The raw bit-pattern order
//! is kept as-is because existing keys depend on it.

use crate::error::KeyError;

/// Encoded size of a 32-bit value.
pub const WIDTH_32: usize = 4;

/// Encoded size of a 64-bit value.
pub const WIDTH_64: usize = 8;

const SIGN_32: u32 = 0x8000_0000;
const SIGN_64: u64 = 0x8000_0000_0000_0000;

/// Encode an `i32` as 4 sign-flipped big-endian bytes.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn encode_i32(value: i32) -> [u8; WIDTH_32] {
    (value as u32 ^ SIGN_32).to_be_bytes()
}

/// Decode 4 sign-flipped big-endian bytes back into an `i32`.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn decode_i32(bytes: [u8; WIDTH_32]) -> i32 {
    (u32::from_be_bytes(bytes) ^ SIGN_32) as i32
}

/// Encode an `i64` as 8 sign-flipped big-endian bytes.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn encode_i64(value: i64) -> [u8; WIDTH_64] {
    (value as u64 ^ SIGN_64).to_be_bytes()
}

/// Decode 8 sign-flipped big-endian bytes back into an `i64`.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn decode_i64(bytes: [u8; WIDTH_64]) -> i64 {
    (u64::from_be_bytes(bytes) ^ SIGN_64) as i64
}

/// Encode an `f32` through its bit pattern.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn encode_f32(value: f32) -> [u8; WIDTH_32] {
    encode_i32(value.to_bits() as i32)
}

/// Decode an `f32` written by [`encode_f32`].
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn decode_f32(bytes: [u8; WIDTH_32]) -> f32 {
    f32::from_bits(decode_i32(bytes) as u32)
}

/// Encode an `f64` through its bit pattern.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn encode_f64(value: f64) -> [u8; WIDTH_64] {
    encode_i64(value.to_bits() as i64)
}

/// Decode an `f64` written by [`encode_f64`].
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn decode_f64(bytes: [u8; WIDTH_64]) -> f64 {
    f64::from_bits(decode_i64(bytes) as u64)
}

/// Read a sign-flipped `i32` at `offset`, failing if the span is too short.
pub fn read_i32(bytes: &[u8], offset: usize) -> Result<i32, KeyError> {
    read_array(bytes, offset).map(decode_i32)
}

/// Read a sign-flipped `i64` at `offset`, failing if the span is too short.
pub fn read_i64(bytes: &[u8], offset: usize) -> Result<i64, KeyError> {
    read_array(bytes, offset).map(decode_i64)
}

/// Read a fixed-size array at `offset`.
pub(crate) fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], KeyError> {
    offset
        .checked_add(N)
        .and_then(|end| bytes.get(offset..end))
        .and_then(|slice| <[u8; N]>::try_from(slice).ok())
        .ok_or_else(|| {
            KeyError::malformed(format!(
                "need {N} bytes at offset {offset}, span is {} bytes",
                bytes.len()
            ))
        })
}
