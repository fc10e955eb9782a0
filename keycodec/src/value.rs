//! Dynamically typed key input and the coercion rules into typed slots.
//!
//! Typed key constructors take concrete Rust types. `Value` exists for the
//! places where the slot type is only known at runtime: setters on a
//! [`TwoFieldKey`](crate::TwoFieldKey), partial-key bounds, multi-key fields
//! and the command-line front end.
//!
//! # Coercion rules
//!
//! | Slot    | Accepted                                               | `Null` |
//! |---------|--------------------------------------------------------|--------|
//! | text    | text, any number (decimal form)                        | `""`   |
//! | integer | integers in range, finite floats (truncated), numeric text | `0` |
//! | binary  | binary                                                 | empty  |
//!
//! Anything else is a [`KeyError::TypeMismatch`].

use crate::error::KeyError;

/// A dynamically typed key field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent input; coerces to the zero value of the target slot.
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Binary(Vec<u8>),
}

/// The kind of a [`Value`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Binary,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Text => "string",
            Self::Int32 => "number32",
            Self::Int64 => "number64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}

pub(crate) const TEXT_SLOT: &str = "string";
pub(crate) const INT32_SLOT: &str = "number32";
pub(crate) const INT64_SLOT: &str = "number64";
pub(crate) const BINARY_SLOT: &str = "binary";

impl Value {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Text(_) => ValueKind::Text,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
            Self::Binary(_) => ValueKind::Binary,
        }
    }

    /// Check if this is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coerce into a text slot.
    pub fn to_text(&self) -> Result<String, KeyError> {
        match self {
            Self::Null => Ok(String::new()),
            Self::Text(s) => Ok(s.as_str().to_owned()),
            Self::Int32(n) => Ok(n.to_string()),
            Self::Int64(n) => Ok(n.to_string()),
            Self::Float32(n) => Ok(n.to_string()),
            Self::Float64(n) => Ok(n.to_string()),
            Self::Binary(_) => Err(KeyError::mismatch(TEXT_SLOT, self.kind())),
        }
    }

    /// Coerce into a 32-bit integer slot.
    pub fn to_i32(&self) -> Result<i32, KeyError> {
        let wide = self.to_integer(INT32_SLOT)?;
        i32::try_from(wide).map_err(|_| KeyError::mismatch(INT32_SLOT, self.kind()))
    }

    /// Coerce into a 64-bit integer slot.
    pub fn to_i64(&self) -> Result<i64, KeyError> {
        self.to_integer(INT64_SLOT)
    }

    /// Coerce into a binary slot.
    pub fn to_binary(&self) -> Result<Vec<u8>, KeyError> {
        match self {
            Self::Null => Ok(Vec::new()),
            Self::Binary(b) => Ok(b.as_slice().to_vec()),
            _ => Err(KeyError::mismatch(BINARY_SLOT, self.kind())),
        }
    }

    fn to_integer(&self, slot: &'static str) -> Result<i64, KeyError> {
        let mismatch = || KeyError::mismatch(slot, self.kind());
        match self {
            Self::Null => Ok(0),
            Self::Int32(n) => Ok(i64::from(*n)),
            Self::Int64(n) => Ok(*n),
            Self::Float32(n) => float_to_i64(f64::from(*n)).ok_or_else(mismatch),
            Self::Float64(n) => float_to_i64(*n).ok_or_else(mismatch),
            Self::Text(s) => parse_numeric(s).ok_or_else(mismatch),
            Self::Binary(_) => Err(mismatch()),
        }
    }
}

/// Truncate a finite float toward zero if it fits in an `i64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(value: f64) -> Option<i64> {
    // i64::MAX is not representable; 2^63 is the first value out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= -LIMIT && truncated < LIMIT {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Parse a numeric string: an integer, or a decimal that is truncated.
fn parse_numeric(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    text.parse::<f64>().ok().and_then(float_to_i64)
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Binary(value.to_vec())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}L"),
            Self::Float32(n) => write!(f, "{n}f"),
            Self::Float64(n) => write!(f, "{n}d"),
            Self::Binary(b) => write!(f, "0x{}", crate::buffer::to_hex(b)),
        }
    }
}
