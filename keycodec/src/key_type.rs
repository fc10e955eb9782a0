//! Key type catalogue and runtime-selected keys.
//!
//! A store is configured with one key type for its whole keyspace. The typed
//! keys in [`crate::two_key`] and [`crate::multi`] cover code that knows the
//! type at compile time; [`AnyKey`] covers tools and comparators that only
//! learn it from configuration.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::buffer::KeyBuffer;
use crate::compare::byte_compare;
use crate::error::KeyError;
use crate::multi::MultiKey;
use crate::numeric::{self, WIDTH_32, WIDTH_64};
use crate::text;
use crate::two_key::{
    BinaryBinaryKey, BinaryInt64Key, BinaryTextKey, Int32Int64Key, Int64TextKey, TextBinaryKey,
    TextInt32Key, TextInt64Key, TextTextKey, TwoFieldKey,
};
use crate::value::Value;

/// Every key type a keyspace can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Text,
    Int32,
    Int64,
    TextText,
    TextInt32,
    TextInt64,
    TextBinary,
    Int32Int64,
    Int64Text,
    BinaryBinary,
    BinaryInt64,
    BinaryText,
    Multi,
}

impl KeyType {
    pub const ALL: [Self; 13] = [
        Self::Text,
        Self::Int32,
        Self::Int64,
        Self::TextText,
        Self::TextInt32,
        Self::TextInt64,
        Self::TextBinary,
        Self::Int32Int64,
        Self::Int64Text,
        Self::BinaryBinary,
        Self::BinaryInt64,
        Self::BinaryText,
        Self::Multi,
    ];

    /// Canonical name, e.g. `string-number32`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Int32 => "number32",
            Self::Int64 => "number64",
            Self::TextText => "string-string",
            Self::TextInt32 => "string-number32",
            Self::TextInt64 => "string-number64",
            Self::TextBinary => "string-binary",
            Self::Int32Int64 => "number32-number64",
            Self::Int64Text => "number64-string",
            Self::BinaryBinary => "binary-binary",
            Self::BinaryInt64 => "binary-number64",
            Self::BinaryText => "binary-string",
            Self::Multi => "multi",
        }
    }

    /// Stable numeric id stored alongside a keyspace.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Int32 => 1,
            Self::Int64 => 2,
            Self::TextText => 3,
            Self::TextInt32 => 4,
            Self::TextInt64 => 5,
            Self::Int32Int64 => 8,
            Self::Int64Text => 9,
            Self::TextBinary => 12,
            Self::BinaryText => 15,
            Self::BinaryInt64 => 17,
            Self::BinaryBinary => 18,
            Self::Multi => 19,
        }
    }

    /// Look up a key type by [`id`](Self::id).
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Whether keys of this type hold exactly two fields.
    #[must_use]
    pub const fn is_two_field(self) -> bool {
        !matches!(self, Self::Text | Self::Int32 | Self::Int64 | Self::Multi)
    }

    /// Whether plain unsigned byte comparison of full encodings is key order.
    ///
    /// Spans that omit a trailing number still need the comparator.
    /// Other types need [`AnyKey::compare_encoded`] as the store comparator.
    #[must_use]
    pub const fn byte_ordered(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Int32 | Self::Int64 | Self::Int32Int64 | Self::Int64Text
        )
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a key type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyTypeError {
    pub name: String,
}

impl fmt::Display for ParseKeyTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key type: {:?}", self.name)
    }
}

impl std::error::Error for ParseKeyTypeError {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Text,
    Int32,
    Int64,
    Binary,
}

fn parse_slot(name: &str) -> Option<Slot> {
    match name {
        "str" | "string" | "char" | "text" => Some(Slot::Text),
        "n32" | "int" | "integer" | "number32" | "i32" => Some(Slot::Int32),
        "n64" | "long" | "number64" | "bigint" | "i64" => Some(Slot::Int64),
        "bin" | "binary" | "bytes" => Some(Slot::Binary),
        _ => None,
    }
}

impl FromStr for KeyType {
    type Err = ParseKeyTypeError;

    /// Parse a canonical name or an alias such as `str-int` or `bin_long`.
    /// Matching ignores case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let unknown = || ParseKeyTypeError {
            name: s.to_owned(),
        };
        if name == "multi" {
            return Ok(Self::Multi);
        }
        match name.split_once(['-', '_']) {
            None => match parse_slot(&name).ok_or_else(unknown)? {
                Slot::Text => Ok(Self::Text),
                Slot::Int32 => Ok(Self::Int32),
                Slot::Int64 => Ok(Self::Int64),
                Slot::Binary => Err(unknown()),
            },
            Some((first, second)) => {
                let first = parse_slot(first).ok_or_else(unknown)?;
                let second = parse_slot(second).ok_or_else(unknown)?;
                match (first, second) {
                    (Slot::Text, Slot::Text) => Ok(Self::TextText),
                    (Slot::Text, Slot::Int32) => Ok(Self::TextInt32),
                    (Slot::Text, Slot::Int64) => Ok(Self::TextInt64),
                    (Slot::Text, Slot::Binary) => Ok(Self::TextBinary),
                    (Slot::Int32, Slot::Int64) => Ok(Self::Int32Int64),
                    (Slot::Int64, Slot::Text) => Ok(Self::Int64Text),
                    (Slot::Binary, Slot::Binary) => Ok(Self::BinaryBinary),
                    (Slot::Binary, Slot::Int64) => Ok(Self::BinaryInt64),
                    (Slot::Binary, Slot::Text) => Ok(Self::BinaryText),
                    _ => Err(unknown()),
                }
            }
        }
    }
}

/// A key of any catalogued type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyKey {
    Text(String),
    Int32(i32),
    Int64(i64),
    TextText(TextTextKey),
    TextInt32(TextInt32Key),
    TextInt64(TextInt64Key),
    TextBinary(TextBinaryKey),
    Int32Int64(Int32Int64Key),
    Int64Text(Int64TextKey),
    BinaryBinary(BinaryBinaryKey),
    BinaryInt64(BinaryInt64Key),
    BinaryText(BinaryTextKey),
    Multi(MultiKey),
}

fn two_field<K: TwoFieldKey>(values: &[Value]) -> Result<K, KeyError> {
    match values {
        [] => Ok(K::default()),
        [first] => K::from_values(first, &Value::Null),
        [first, second] => K::from_values(first, second),
        _ => Err(KeyError::CapacityExceeded {
            what: "two-field key arity",
            limit: 2,
            actual: values.len(),
        }),
    }
}

static NULL: Value = Value::Null;

fn single(values: &[Value]) -> Result<&Value, KeyError> {
    match values {
        [] => Ok(&NULL),
        [value] => Ok(value),
        _ => Err(KeyError::CapacityExceeded {
            what: "single-field key arity",
            limit: 1,
            actual: values.len(),
        }),
    }
}

fn fixed_width<const N: usize>(bytes: &[u8]) -> Result<Option<[u8; N]>, KeyError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    if bytes.len() != N {
        return Err(KeyError::malformed(format!(
            "expected {N} bytes, got {}",
            bytes.len()
        )));
    }
    numeric::read_array(bytes, 0).map(Some)
}

impl AnyKey {
    /// Build a key of `key_type` from dynamic values.
    ///
    /// Missing trailing values take their slot's zero value, so a single value
    /// for a two-field type builds a partial-key bound.
    pub fn from_values(key_type: KeyType, values: &[Value]) -> Result<Self, KeyError> {
        Ok(match key_type {
            KeyType::Text => Self::Text(single(values)?.to_text()?),
            KeyType::Int32 => Self::Int32(single(values)?.to_i32()?),
            KeyType::Int64 => Self::Int64(single(values)?.to_i64()?),
            KeyType::TextText => Self::TextText(two_field(values)?),
            KeyType::TextInt32 => Self::TextInt32(two_field(values)?),
            KeyType::TextInt64 => Self::TextInt64(two_field(values)?),
            KeyType::TextBinary => Self::TextBinary(two_field(values)?),
            KeyType::Int32Int64 => Self::Int32Int64(two_field(values)?),
            KeyType::Int64Text => Self::Int64Text(two_field(values)?),
            KeyType::BinaryBinary => Self::BinaryBinary(two_field(values)?),
            KeyType::BinaryInt64 => Self::BinaryInt64(two_field(values)?),
            KeyType::BinaryText => Self::BinaryText(two_field(values)?),
            KeyType::Multi => Self::Multi(MultiKey::from_values(values.iter().cloned())?),
        })
    }

    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Text(_) => KeyType::Text,
            Self::Int32(_) => KeyType::Int32,
            Self::Int64(_) => KeyType::Int64,
            Self::TextText(_) => KeyType::TextText,
            Self::TextInt32(_) => KeyType::TextInt32,
            Self::TextInt64(_) => KeyType::TextInt64,
            Self::TextBinary(_) => KeyType::TextBinary,
            Self::Int32Int64(_) => KeyType::Int32Int64,
            Self::Int64Text(_) => KeyType::Int64Text,
            Self::BinaryBinary(_) => KeyType::BinaryBinary,
            Self::BinaryInt64(_) => KeyType::BinaryInt64,
            Self::BinaryText(_) => KeyType::BinaryText,
            Self::Multi(_) => KeyType::Multi,
        }
    }

    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            Self::Int32(_) => WIDTH_32,
            Self::Int64(_) => WIDTH_64,
            Self::TextText(k) => k.encoded_len(),
            Self::TextInt32(k) => k.encoded_len(),
            Self::TextInt64(k) => k.encoded_len(),
            Self::TextBinary(k) => k.encoded_len(),
            Self::Int32Int64(k) => k.encoded_len(),
            Self::Int64Text(k) => k.encoded_len(),
            Self::BinaryBinary(k) => k.encoded_len(),
            Self::BinaryInt64(k) => k.encoded_len(),
            Self::BinaryText(k) => k.encoded_len(),
            Self::Multi(k) => k.encoded_len(),
        }
    }

    pub fn encode(&self, buf: &mut KeyBuffer) -> Result<(), KeyError> {
        match self {
            Self::Text(s) => {
                buf.put_bytes(s.as_bytes());
                Ok(())
            }
            Self::Int32(n) => {
                buf.put_bytes(&numeric::encode_i32(*n));
                Ok(())
            }
            Self::Int64(n) => {
                buf.put_bytes(&numeric::encode_i64(*n));
                Ok(())
            }
            Self::TextText(k) => k.encode(buf),
            Self::TextInt32(k) => k.encode(buf),
            Self::TextInt64(k) => k.encode(buf),
            Self::TextBinary(k) => k.encode(buf),
            Self::Int32Int64(k) => k.encode(buf),
            Self::Int64Text(k) => k.encode(buf),
            Self::BinaryBinary(k) => k.encode(buf),
            Self::BinaryInt64(k) => k.encode(buf),
            Self::BinaryText(k) => k.encode(buf),
            Self::Multi(k) => k.encode(buf),
        }
    }

    /// Encode into a fresh byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        let mut buf = KeyBuffer::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf.into_bytes())
    }

    /// Decode an encoding of `key_type`. An empty span is the empty key.
    pub fn decode(key_type: KeyType, bytes: &[u8]) -> Result<Self, KeyError> {
        Ok(match key_type {
            KeyType::Text => Self::Text(text::get_native(bytes)?),
            KeyType::Int32 => Self::Int32(fixed_width(bytes)?.map_or(0, numeric::decode_i32)),
            KeyType::Int64 => Self::Int64(fixed_width(bytes)?.map_or(0, numeric::decode_i64)),
            KeyType::TextText => Self::TextText(TextTextKey::decode(bytes)?),
            KeyType::TextInt32 => Self::TextInt32(TextInt32Key::decode(bytes)?),
            KeyType::TextInt64 => Self::TextInt64(TextInt64Key::decode(bytes)?),
            KeyType::TextBinary => Self::TextBinary(TextBinaryKey::decode(bytes)?),
            KeyType::Int32Int64 => Self::Int32Int64(Int32Int64Key::decode(bytes)?),
            KeyType::Int64Text => Self::Int64Text(Int64TextKey::decode(bytes)?),
            KeyType::BinaryBinary => Self::BinaryBinary(BinaryBinaryKey::decode(bytes)?),
            KeyType::BinaryInt64 => Self::BinaryInt64(BinaryInt64Key::decode(bytes)?),
            KeyType::BinaryText => Self::BinaryText(BinaryTextKey::decode(bytes)?),
            KeyType::Multi => Self::Multi(MultiKey::decode(bytes)?),
        })
    }

    /// Compare two encodings of `key_type` in key order.
    ///
    /// This is the comparator a store configured with `key_type` must use. It
    /// agrees with comparing the decoded keys, so an empty number sorts as zero.
    pub fn compare_encoded(key_type: KeyType, a: &[u8], b: &[u8]) -> Result<Ordering, KeyError> {
        match key_type {
            KeyType::Text => Ok(byte_compare(a, b)),
            KeyType::Int32 => {
                let decode = |bytes: &[u8]| {
                    fixed_width(bytes).map(|n| n.map_or(0, numeric::decode_i32))
                };
                Ok(decode(a)?.cmp(&decode(b)?))
            }
            KeyType::Int64 => {
                let decode = |bytes: &[u8]| {
                    fixed_width(bytes).map(|n| n.map_or(0, numeric::decode_i64))
                };
                Ok(decode(a)?.cmp(&decode(b)?))
            }
            KeyType::TextText => TextTextKey::compare_encoded(a, b),
            KeyType::TextInt32 => TextInt32Key::compare_encoded(a, b),
            KeyType::TextInt64 => TextInt64Key::compare_encoded(a, b),
            KeyType::TextBinary => TextBinaryKey::compare_encoded(a, b),
            KeyType::Int32Int64 => Int32Int64Key::compare_encoded(a, b),
            KeyType::Int64Text => Int64TextKey::compare_encoded(a, b),
            KeyType::BinaryBinary => BinaryBinaryKey::compare_encoded(a, b),
            KeyType::BinaryInt64 => BinaryInt64Key::compare_encoded(a, b),
            KeyType::BinaryText => BinaryTextKey::compare_encoded(a, b),
            KeyType::Multi => MultiKey::compare_encoded(a, b),
        }
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "[{}]{s}", KeyType::Text),
            Self::Int32(n) => write!(f, "[{}]{n}", KeyType::Int32),
            Self::Int64(n) => write!(f, "[{}]{n}", KeyType::Int64),
            Self::TextText(k) => write!(f, "{k}"),
            Self::TextInt32(k) => write!(f, "{k}"),
            Self::TextInt64(k) => write!(f, "{k}"),
            Self::TextBinary(k) => write!(f, "{k}"),
            Self::Int32Int64(k) => write!(f, "{k}"),
            Self::Int64Text(k) => write!(f, "{k}"),
            Self::BinaryBinary(k) => write!(f, "{k}"),
            Self::BinaryInt64(k) => write!(f, "{k}"),
            Self::BinaryText(k) => write!(f, "{k}"),
            Self::Multi(k) => write!(f, "{k}"),
        }
    }
}
