//! Two-field composite keys.
//!
//! Every variant stores a `(first, second)` pair with fixed slot types and
//! orders by `first`, then `second`. Each variant has its own byte layout:
//!
//! | Variant          | Layout                                        |
//! |------------------|-----------------------------------------------|
//! | [`TextTextKey`]    | `u16 len \| utf16(first) \| utf8(second)`   |
//! | [`TextInt32Key`]   | `u16 len \| utf16(first) \| i32(second)`    |
//! | [`TextInt64Key`]   | `u16 len \| utf16(first) \| i64(second)`    |
//! | [`TextBinaryKey`]  | `u16 len \| utf16(first) \| second`         |
//! | [`Int32Int64Key`]  | `i32(first) \| i64(second)`                 |
//! | [`Int64TextKey`]   | `i64(first) \| utf8(second)`                |
//! | [`BinaryBinaryKey`]| `u16 len \| first \| second`                |
//! | [`BinaryInt64Key`] | `first \| i64(second) \| u32 len`           |
//! | [`BinaryTextKey`]  | `u16 len \| first \| utf8(second)`          |
//!
//! Integers are sign-flipped big-endian (see [`crate::numeric`]) and length
//! fields are plain big-endian byte counts of the leading field.
//!
//! # Ordering on disk
//!
//! When the leading field has a fixed width, plain unsigned byte comparison of
//! two encodings matches [`Ord`]. When it is variable length, the length header
//! gets compared before the payload, so the storage engine has to use
//! [`TwoFieldKey::compare_encoded`] as its comparator instead. It splits each
//! encoding into its two field spans and compares them in turn without
//! decoding.

mod binary_binary;
mod binary_int64;
mod binary_text;
mod int32_int64;
mod int64_text;
mod text_binary;
mod text_int32;
mod text_int64;
mod text_text;

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

pub use binary_binary::BinaryBinaryKey;
pub use binary_int64::BinaryInt64Key;
pub use binary_text::BinaryTextKey;
pub use int32_int64::Int32Int64Key;
pub use int64_text::Int64TextKey;
pub use text_binary::TextBinaryKey;
pub use text_int32::TextInt32Key;
pub use text_int64::TextInt64Key;
pub use text_text::TextTextKey;

use crate::buffer::{KeyBuffer, read_u16};
use crate::compare::compare_split;
use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::numeric::{self, WIDTH_32, WIDTH_64};
use crate::text;
use crate::value::Value;

/// Shared contract of the two-field key variants.
///
/// Implementors provide slot access, the layout-specific encoder and a splitter
/// that finds the two field spans inside an encoding. Decoding, comparison
/// against dynamic values and the encoded comparator are built on top.
pub trait TwoFieldKey:
    Sized + Default + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync
{
    /// Rust type of the leading slot.
    type First;
    /// Rust type of the trailing slot.
    type Second;

    /// The catalogue entry for this variant.
    const KEY_TYPE: KeyType;

    /// Encoding of the trailing slot's zero value.
    ///
    /// Decoding reads an omitted trailing field as zero, and the encoded
    /// comparator substitutes this span for it. Fixed-width trailing slots
    /// also reject other non-empty widths.
    const ZERO_SECOND: &'static [u8] = &[];

    /// Build a key from already typed slots.
    fn from_parts(first: Self::First, second: Self::Second) -> Self;

    fn first(&self) -> &Self::First;

    fn second(&self) -> &Self::Second;

    /// Replace the leading slot, coercing `value` to the slot type.
    fn set_first(&mut self, value: &Value) -> Result<(), KeyError>;

    /// Replace the trailing slot, coercing `value` to the slot type.
    fn set_second(&mut self, value: &Value) -> Result<(), KeyError>;

    /// Exact number of bytes [`encode`](Self::encode) will append.
    fn encoded_len(&self) -> usize;

    /// Append this key's layout at the buffer position.
    fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError>;

    /// Locate the leading and trailing field payloads inside a non-empty
    /// encoding, after stripping length headers and trailers.
    fn split_encoded(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError>;

    /// Rebuild a key from the two spans [`split_encoded`](Self::split_encoded)
    /// returned.
    fn decode_parts(first: &[u8], second: &[u8]) -> Result<Self, KeyError>;

    /// Build a key from two dynamic values.
    fn from_values(first: &Value, second: &Value) -> Result<Self, KeyError> {
        let mut key = Self::default();
        key.set_first(first)?;
        key.set_second(second)?;
        Ok(key)
    }

    /// Decode a key from a whole encoded span. An empty span is the empty key.
    fn decode(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let (first, second) = Self::split_encoded(bytes).inspect_err(|e| {
            tracing::debug!(key_type = %Self::KEY_TYPE, error = %e, "two-field key decode failed");
        })?;
        Self::decode_parts(first, second)
    }

    /// Decode the key stored at `offset..offset + len` of `buf`.
    fn decode_from(buf: &KeyBuffer, offset: usize, len: usize) -> Result<Self, KeyError> {
        let span = buf.span(offset, len).ok_or_else(|| {
            KeyError::malformed(format!(
                "span {offset}+{len} runs past buffer position {}",
                buf.position()
            ))
        })?;
        Self::decode(span)
    }

    /// Encode into a fresh byte vector.
    fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        let mut buf = KeyBuffer::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf.into_bytes())
    }

    /// Compare against a partial key holding only a leading value.
    ///
    /// `bound` is coerced to the leading slot type and the trailing slot of
    /// the bound takes its zero value, so a key with an equal leading field and
    /// a trailing field above zero compares greater.
    fn compare_value(&self, bound: &Value) -> Result<Ordering, KeyError> {
        let bound = Self::from_values(bound, &Value::Null)?;
        Ok(self.cmp(&bound))
    }

    /// Compare against a full key given as two dynamic values.
    fn compare_values(&self, first: &Value, second: &Value) -> Result<Ordering, KeyError> {
        let other = Self::from_values(first, second)?;
        Ok(self.cmp(&other))
    }

    /// Compare two encodings of this variant in key order.
    ///
    /// An empty span compares as the empty key and an omitted trailing field
    /// compares as zero, so the result always equals `decode(a).cmp(&decode(b))`.
    fn compare_encoded(a: &[u8], b: &[u8]) -> Result<Ordering, KeyError> {
        let empty_a;
        let a = if a.is_empty() {
            empty_a = Self::default().to_bytes()?;
            empty_a.as_slice()
        } else {
            a
        };
        let empty_b;
        let b = if b.is_empty() {
            empty_b = Self::default().to_bytes()?;
            empty_b.as_slice()
        } else {
            b
        };
        Ok(compare_split(
            zero_filled::<Self>(Self::split_encoded(a)?)?,
            zero_filled::<Self>(Self::split_encoded(b)?)?,
        ))
    }
}

/// Substitute [`TwoFieldKey::ZERO_SECOND`] for an empty trailing span.
fn zero_filled<'a, K: TwoFieldKey>(
    (first, second): (&'a [u8], &'a [u8]),
) -> Result<(&'a [u8], &'a [u8]), KeyError> {
    let zero = K::ZERO_SECOND;
    if second.is_empty() {
        return Ok((first, zero));
    }
    if !zero.is_empty() && second.len() != zero.len() {
        return Err(KeyError::malformed(format!(
            "{}-byte field is {} bytes",
            zero.len(),
            second.len()
        )));
    }
    Ok((first, second))
}

// Slot helpers shared by the variant layouts.

/// Append `text` in fixed-unit form behind a `u16` byte length.
fn put_prefixed_utf16(text: &str, buf: &mut KeyBuffer) -> Result<(), KeyError> {
    let len = text::utf16_len(text);
    let header = u16::try_from(len).map_err(|_| KeyError::CapacityExceeded {
        what: "leading text field",
        limit: text::MAX_UTF16_BYTES,
        actual: len,
    })?;
    buf.put_u16(header);
    text::put_utf16(text, buf.vec_mut());
    Ok(())
}

/// Append `bytes` behind a `u16` byte length.
fn put_prefixed_binary(bytes: &[u8], buf: &mut KeyBuffer) -> Result<(), KeyError> {
    let header = u16::try_from(bytes.len())
        .map_err(|_| binary_capacity(bytes, usize::from(u16::MAX)))?;
    buf.put_u16(header);
    buf.put_bytes(bytes);
    Ok(())
}

const fn binary_capacity(bytes: &[u8], limit: usize) -> KeyError {
    KeyError::CapacityExceeded {
        what: "leading binary field",
        limit,
        actual: bytes.len(),
    }
}

/// Split `u16 len | leading | trailing`.
fn split_prefixed(bytes: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
    let len = read_u16(bytes, 0)
        .ok_or_else(|| KeyError::malformed("missing two-byte length header"))?;
    let rest = &bytes[2..];
    let len = usize::from(len);
    if len > rest.len() {
        return Err(KeyError::malformed(format!(
            "leading field length {len} exceeds remaining {} bytes",
            rest.len()
        )));
    }
    Ok(rest.split_at(len))
}

/// Decode a trailing 32-bit slot. An empty span is zero.
fn decode_i32_slot(bytes: &[u8]) -> Result<i32, KeyError> {
    match bytes.len() {
        0 => Ok(0),
        WIDTH_32 => numeric::read_i32(bytes, 0),
        other => Err(KeyError::malformed(format!(
            "32-bit field is {other} bytes"
        ))),
    }
}

/// Decode a trailing 64-bit slot. An empty span is zero.
fn decode_i64_slot(bytes: &[u8]) -> Result<i64, KeyError> {
    match bytes.len() {
        0 => Ok(0),
        WIDTH_64 => numeric::read_i64(bytes, 0),
        other => Err(KeyError::malformed(format!(
            "64-bit field is {other} bytes"
        ))),
    }
}

/// Render a key as `[type]first,second`.
fn fmt_pair(
    f: &mut fmt::Formatter<'_>,
    key_type: KeyType,
    first: &dyn fmt::Display,
    second: &dyn fmt::Display,
) -> fmt::Result {
    write!(f, "[{key_type}]{first},{second}")
}

/// Hex rendering for binary slots in `Display` output.
struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", crate::buffer::to_hex(self.0))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Property checks run against every variant.

    use std::cmp::Ordering;

    use super::TwoFieldKey;
    use crate::compare::byte_compare;

    /// Encode, decode and compare with the original.
    pub fn assert_roundtrip<K: TwoFieldKey>(key: &K) {
        let bytes = key.to_bytes().expect("encode");
        assert_eq!(bytes.len(), key.encoded_len(), "encoded_len for {key}");
        let decoded = K::decode(&bytes).expect("decode");
        assert_eq!(&decoded, key);
    }

    /// Check that the encoded comparator agrees with `Ord` for every pair.
    pub fn assert_encoded_order<K: TwoFieldKey>(keys: &[K]) {
        let encoded: Vec<Vec<u8>> = keys
            .iter()
            .map(|k| k.to_bytes().expect("encode"))
            .collect();
        for (a, ea) in keys.iter().zip(&encoded) {
            for (b, eb) in keys.iter().zip(&encoded) {
                let ordering = K::compare_encoded(ea, eb).expect("compare");
                assert_eq!(ordering, a.cmp(b), "{a} vs {b}");
            }
        }
    }

    /// Check that the encoded comparator agrees with decoded `Ord` for every
    /// pair of raw spans, including spans that omit the trailing field.
    pub fn assert_decoded_order<K: TwoFieldKey>(spans: &[Vec<u8>]) {
        for a in spans {
            for b in spans {
                let expected = K::decode(a)
                    .expect("decode")
                    .cmp(&K::decode(b).expect("decode"));
                assert_eq!(
                    K::compare_encoded(a, b).expect("compare"),
                    expected,
                    "{a:02x?} vs {b:02x?}"
                );
            }
        }
    }

    /// Check that plain byte comparison agrees with `Ord` for every pair.
    pub fn assert_byte_order<K: TwoFieldKey>(keys: &[K]) {
        for a in keys {
            for b in keys {
                let ea = a.to_bytes().expect("encode");
                let eb = b.to_bytes().expect("encode");
                assert_eq!(byte_compare(&ea, &eb), a.cmp(b), "{a} vs {b}");
            }
        }
    }

    /// `compare_value(x)` is `cmp` against `(x, zero)`.
    pub fn assert_partial_bound<K: TwoFieldKey>(key: &K, bound: &crate::Value) {
        let expected = key.cmp(&K::from_values(bound, &crate::Value::Null).expect("bound"));
        assert_eq!(key.compare_value(bound).expect("compare"), expected);
    }

    /// Sort ascending and dedupe so adjacent pairs are strictly increasing.
    pub fn sorted<K: TwoFieldKey>(mut keys: Vec<K>) -> Vec<K> {
        keys.sort();
        keys.dedup();
        keys
    }

    /// Check that sorted keys encode to strictly increasing encodings under
    /// the encoded comparator.
    pub fn assert_strictly_increasing<K: TwoFieldKey>(keys: &[K]) {
        for pair in keys.windows(2) {
            let a = pair[0].to_bytes().expect("encode");
            let b = pair[1].to_bytes().expect("encode");
            assert_eq!(
                K::compare_encoded(&a, &b).expect("compare"),
                Ordering::Less,
                "{} vs {}",
                pair[0],
                pair[1]
            );
        }
    }
}
