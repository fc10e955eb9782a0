//! Error type shared by every key codec.
//!
//! Failures at this layer are permanent for a given input: the codecs are pure
//! transforms, so the caller gets the error back unchanged and there is nothing
//! to retry.

use crate::value::ValueKind;

/// Errors produced while building, encoding, decoding or comparing keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A value could not be coerced into the slot or field type it was
    /// assigned to or compared against.
    TypeMismatch {
        /// The slot type the codec wanted.
        expected: &'static str,
        /// The kind of value it was given.
        found: ValueKind,
    },
    /// Encoded bytes could not be interpreted.
    MalformedBinary(String),
    /// A value does not fit the fixed-size header the format reserves for it.
    CapacityExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },
}

impl KeyError {
    pub(crate) const fn mismatch(expected: &'static str, found: ValueKind) -> Self {
        Self::TypeMismatch { expected, found }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedBinary(reason.into())
    }
}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "wrong field type: expected {expected}, got {found}")
            }
            Self::MalformedBinary(reason) => write!(f, "malformed key binary: {reason}"),
            Self::CapacityExceeded {
                what,
                limit,
                actual,
            } => write!(f, "{what} exceeds capacity: {actual} > {limit}"),
        }
    }
}

impl std::error::Error for KeyError {}
