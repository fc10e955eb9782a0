//! Composite key codecs for ordered key-value stores.
//!
//! A store that compares keys as raw bytes can only range-scan a composite
//! keyspace if the encoding keeps the tuple order. This crate provides:
//!
//! - two-field keys with fixed slot types ([`TwoFieldKey`] and its nine
//!   variants) plus an encoded-key comparator for each,
//! - variable-arity [`MultiKey`]s with a self-describing trailer,
//! - the sign-flipped numeric and two text encodings they share,
//! - [`KeyType`] and [`AnyKey`] for keyspaces whose key type is chosen at
//!   runtime.
//!
//! Encoders append into a caller-owned [`KeyBuffer`] and decoders read from a
//! span of one. Nothing is retained between calls.

pub mod buffer;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod key_type;
pub mod multi;
pub mod numeric;
pub mod text;
pub mod two_key;
pub mod value;

pub use buffer::KeyBuffer;
pub use compare::byte_compare;
pub use error::KeyError;
pub use key_type::{AnyKey, KeyType, ParseKeyTypeError};
pub use multi::{Field, MultiKey};
pub use two_key::{
    BinaryBinaryKey, BinaryInt64Key, BinaryTextKey, Int32Int64Key, Int64TextKey, TextBinaryKey,
    TextInt32Key, TextInt64Key, TextTextKey, TwoFieldKey,
};
pub use value::{Value, ValueKind};
