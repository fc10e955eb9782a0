//! Variable-arity multi-field keys.
//!
//! # Layout
//!
//! ```text
//! payload(0) | payload(1) | ... | payload(N-1) | trailer(N-1) | ... | trailer(0) | N
//! ```
//!
//! Payloads grow forward from the start of the span and trailer entries grow
//! backward from the count byte, so field `k`'s entry sits at
//! `total - 3 - 2k`. A decoder reads the count, then walks the trailer
//! backward while consuming payloads forward, without lookahead.
//!
//! Each trailer entry is a big-endian `u16`: the top 2 bits are the kind tag
//! (`0` text, `1` 32-bit, `2` 64-bit) and the low 14 bits hold the text byte
//! length, or for numeric kinds a flag whose low bit marks a float.
//!
//! Text is native UTF-8 bounded to [`MAX_NATIVE_BYTES`]; longer text is cut at
//! a character boundary without error. Integers and floats use the
//! sign-flipped fixed-width encoding.
//!
//! The encoding is self-describing but not order-preserving. Order multi keys
//! with [`MultiKey::compare`] or [`MultiKey::compare_encoded`].

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::buffer::{KeyBuffer, read_u16};
use crate::error::KeyError;
use crate::numeric::{self, WIDTH_32, WIDTH_64};
use crate::text::{self, MAX_NATIVE_BYTES};
use crate::value::{Value, ValueKind};

/// Most fields a multi key can hold; the count is stored in one byte.
pub const MAX_FIELDS: usize = 255;

const TRAILER_ENTRY_LEN: usize = 2;
const COUNT_LEN: usize = 1;

const KIND_TEXT: u16 = 0;
const KIND_32: u16 = 1;
const KIND_64: u16 = 2;
const FLAG_FLOAT: u16 = 1;
const LOW_MASK: u16 = 0x3FFF;

/// One field of a [`MultiKey`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl Field {
    /// The value kind this field was built from.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
        }
    }

    /// Convert a dynamic value. `Null` and binary become empty text.
    fn from_value(value: Value) -> Self {
        match value {
            Value::Text(s) => Self::Text(s),
            Value::Int32(n) => Self::Int32(n),
            Value::Int64(n) => Self::Int64(n),
            Value::Float32(n) => Self::Float32(n),
            Value::Float64(n) => Self::Float64(n),
            Value::Null => Self::Text(String::new()),
            Value::Binary(bytes) => {
                tracing::debug!(
                    discarded_bytes = bytes.len(),
                    "binary multi key field stored as empty text"
                );
                Self::Text(String::new())
            }
        }
    }

    /// Payload size after the text bound is applied.
    fn payload_len(&self) -> usize {
        match self {
            Self::Text(s) => text::bounded_native(s, MAX_NATIVE_BYTES).len(),
            Self::Int32(_) | Self::Float32(_) => WIDTH_32,
            Self::Int64(_) | Self::Float64(_) => WIDTH_64,
        }
    }

    /// Order two fields of compatible kinds.
    ///
    /// Integers of either width compare numerically and floats of either width
    /// compare by IEEE total order. Any other pairing is a type mismatch.
    pub fn compare(&self, other: &Self) -> Result<Ordering, KeyError> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Ok(a.cmp(b)),
            _ => match (self.as_integer(), other.as_integer()) {
                (Some(a), Some(b)) => Ok(a.cmp(&b)),
                _ => match (self.as_float(), other.as_float()) {
                    (Some(a), Some(b)) => Ok(a.total_cmp(&b)),
                    _ => Err(KeyError::mismatch(kind_name(self.kind()), other.kind())),
                },
            },
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int32(n) => Some(i64::from(*n)),
            Self::Int64(n) => Some(*n),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float32(n) => Some(f64::from(*n)),
            Self::Float64(n) => Some(*n),
            _ => None,
        }
    }

    /// Hash consistent with [`Field::compare`] equality.
    fn field_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match self {
            Self::Text(s) => {
                0u8.hash(&mut hasher);
                s.hash(&mut hasher);
            }
            Self::Int32(_) | Self::Int64(_) => {
                1u8.hash(&mut hasher);
                self.as_integer().hash(&mut hasher);
            }
            Self::Float32(_) | Self::Float64(_) => {
                2u8.hash(&mut hasher);
                self.as_float().map(f64::to_bits).hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

/// Slot name used in comparison errors.
const fn kind_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "string",
        ValueKind::Int32 | ValueKind::Int64 => "integer",
        ValueKind::Float32 | ValueKind::Float64 => "float",
        ValueKind::Null | ValueKind::Binary => "field",
    }
}

impl From<Field> for Value {
    fn from(field: Field) -> Self {
        match field {
            Field::Text(s) => Self::Text(s),
            Field::Int32(n) => Self::Int32(n),
            Field::Int64(n) => Self::Int64(n),
            Field::Float32(n) => Self::Float32(n),
            Field::Float64(n) => Self::Float64(n),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}"),
            Self::Float32(n) => write!(f, "{n}"),
            Self::Float64(n) => write!(f, "{n}"),
        }
    }
}

/// An ordered tuple of up to [`MAX_FIELDS`] text and numeric fields.
#[derive(Debug, Clone, Default)]
pub struct MultiKey {
    fields: Vec<Field>,
}

impl MultiKey {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build a key from a sequence of values.
    pub fn from_values<I, V>(values: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut key = Self::new();
        key.extend(values)?;
        Ok(key)
    }

    /// Append a field.
    ///
    /// `Null` and binary values are stored as empty text.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), KeyError> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(KeyError::CapacityExceeded {
                what: "multi key arity",
                limit: MAX_FIELDS,
                actual: self.fields.len() + 1,
            });
        }
        self.fields.push(Field::from_value(value.into()));
        Ok(())
    }

    /// Append every value in order, stopping at the first failure.
    pub fn extend<I, V>(&mut self, values: I) -> Result<(), KeyError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Exact number of bytes [`encode`](Self::encode) will append.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        if self.fields.is_empty() {
            return 0;
        }
        let payload: usize = self.fields.iter().map(Field::payload_len).sum();
        payload + self.fields.len() * TRAILER_ENTRY_LEN + COUNT_LEN
    }

    /// Append the encoding at the buffer position. An empty key appends
    /// nothing.
    pub fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        if self.fields.is_empty() {
            return Ok(());
        }
        let count = u8::try_from(self.fields.len()).map_err(|_| KeyError::CapacityExceeded {
            what: "multi key arity",
            limit: MAX_FIELDS,
            actual: self.fields.len(),
        })?;
        let total = self.encoded_len();
        let span = buf.put_span(total);

        let mut front = 0;
        let mut back = total - COUNT_LEN;
        span[back] = count;

        for field in &self.fields {
            let entry = match field {
                Field::Text(s) => {
                    let bytes = text::bounded_native(s, MAX_NATIVE_BYTES).as_bytes();
                    span[front..front + bytes.len()].copy_from_slice(bytes);
                    front += bytes.len();
                    #[allow(clippy::cast_possible_truncation)] // bounded to 14 bits above
                    let len = bytes.len() as u16;
                    trailer_entry(KIND_TEXT, len)
                }
                Field::Int32(n) => {
                    front = put_fixed(span, front, &numeric::encode_i32(*n));
                    trailer_entry(KIND_32, 0)
                }
                Field::Float32(n) => {
                    front = put_fixed(span, front, &numeric::encode_f32(*n));
                    trailer_entry(KIND_32, FLAG_FLOAT)
                }
                Field::Int64(n) => {
                    front = put_fixed(span, front, &numeric::encode_i64(*n));
                    trailer_entry(KIND_64, 0)
                }
                Field::Float64(n) => {
                    front = put_fixed(span, front, &numeric::encode_f64(*n));
                    trailer_entry(KIND_64, FLAG_FLOAT)
                }
            };
            back -= TRAILER_ENTRY_LEN;
            span[back..back + TRAILER_ENTRY_LEN].copy_from_slice(&entry);
        }
        Ok(())
    }

    /// Encode into a fresh byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        let mut buf = KeyBuffer::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf.into_bytes())
    }

    /// Decode a whole encoded span. Empty input is the empty key.
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyError> {
        decode_fields(bytes)
            .map(|fields| Self { fields })
            .inspect_err(|e| tracing::debug!(error = %e, "multi key decode failed"))
    }

    /// Decode the key stored at `offset..offset + len` of `buf`.
    pub fn decode_from(buf: &KeyBuffer, offset: usize, len: usize) -> Result<Self, KeyError> {
        let span = buf.span(offset, len).ok_or_else(|| {
            KeyError::malformed(format!(
                "span {offset}+{len} runs past buffer position {}",
                buf.position()
            ))
        })?;
        Self::decode(span)
    }

    /// Compare field by field.
    ///
    /// The first unequal pair decides. When every shared field is equal the
    /// key with fewer fields is less.
    pub fn compare(&self, other: &Self) -> Result<Ordering, KeyError> {
        for (a, b) in self.fields.iter().zip(&other.fields) {
            match a.compare(b)? {
                Ordering::Equal => {}
                unequal => return Ok(unequal),
            }
        }
        Ok(self.fields.len().cmp(&other.fields.len()))
    }

    /// Compare two encodings in key order.
    pub fn compare_encoded(a: &[u8], b: &[u8]) -> Result<Ordering, KeyError> {
        Self::decode(a)?.compare(&Self::decode(b)?)
    }
}

const fn trailer_entry(kind: u16, low: u16) -> [u8; TRAILER_ENTRY_LEN] {
    ((kind << 14) | (low & LOW_MASK)).to_be_bytes()
}

fn put_fixed(span: &mut [u8], front: usize, bytes: &[u8]) -> usize {
    span[front..front + bytes.len()].copy_from_slice(bytes);
    front + bytes.len()
}

fn decode_fields(bytes: &[u8]) -> Result<Vec<Field>, KeyError> {
    let Some((&count, _)) = bytes.split_last() else {
        return Ok(Vec::new());
    };
    let count = usize::from(count);
    let trailer_len = count * TRAILER_ENTRY_LEN + COUNT_LEN;
    let payload_end = bytes.len().checked_sub(trailer_len).ok_or_else(|| {
        KeyError::malformed(format!(
            "{count} fields need a {trailer_len} byte trailer, span is {} bytes",
            bytes.len()
        ))
    })?;
    let payload = &bytes[..payload_end];

    let mut fields = Vec::with_capacity(count);
    let mut front = 0;
    let mut back = bytes.len() - COUNT_LEN;
    for index in 0..count {
        back -= TRAILER_ENTRY_LEN;
        let entry = read_u16(bytes, back)
            .ok_or_else(|| KeyError::malformed("trailer entry out of bounds"))?;
        let low = entry & LOW_MASK;
        let field = match entry >> 14 {
            KIND_TEXT => {
                let len = usize::from(low);
                let slice = payload.get(front..front + len).ok_or_else(|| {
                    KeyError::malformed(format!(
                        "text field {index} of {len} bytes overruns the payload"
                    ))
                })?;
                front += len;
                Field::Text(text::get_native(slice)?)
            }
            KIND_32 => {
                let raw = numeric::read_array::<WIDTH_32>(payload, front)?;
                front += WIDTH_32;
                if low & FLAG_FLOAT == 0 {
                    Field::Int32(numeric::decode_i32(raw))
                } else {
                    Field::Float32(numeric::decode_f32(raw))
                }
            }
            KIND_64 => {
                let raw = numeric::read_array::<WIDTH_64>(payload, front)?;
                front += WIDTH_64;
                if low & FLAG_FLOAT == 0 {
                    Field::Int64(numeric::decode_i64(raw))
                } else {
                    Field::Float64(numeric::decode_f64(raw))
                }
            }
            tag => {
                return Err(KeyError::malformed(format!(
                    "unknown kind tag {tag} for field {index}"
                )));
            }
        };
        fields.push(field);
    }

    if front != payload_end {
        return Err(KeyError::malformed(format!(
            "{} payload bytes left after {count} fields",
            payload_end - front
        )));
    }
    Ok(fields)
}

impl PartialEq for MultiKey {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl Eq for MultiKey {}

impl PartialOrd for MultiKey {
    /// `None` when a field pair has incompatible kinds.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl Hash for MultiKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let sum = self
            .fields
            .iter()
            .fold(0u64, |acc, field| acc.wrapping_add(field.field_hash()));
        state.write_u64(sum);
    }
}

impl<'a> IntoIterator for &'a MultiKey {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for MultiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[multi]")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
