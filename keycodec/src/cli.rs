//! Command-line front end for inspecting keys.
//!
//! Fields are written as `prefix:value`:
//!
//! | Prefix | Value            |
//! |--------|------------------|
//! | `i:`   | 32-bit integer   |
//! | `l:`   | 64-bit integer   |
//! | `f:`   | 32-bit float     |
//! | `d:`   | 64-bit float     |
//! | `x:`   | hex binary       |
//! | `s:`   | text             |
//! | `n:`   | null             |
//!
//! Anything without a known prefix is text.

use clap::{Args, Parser, Subcommand};

use crate::buffer::from_hex;
use crate::compare::compare_sign;
use crate::config::ToolConfig;
use crate::error::KeyError;
use crate::key_type::{AnyKey, KeyType};
use crate::value::Value;

/// Encode, decode and compare composite keys.
#[derive(Parser, Debug)]
#[command(name = "keycodec", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode fields into a key and print it as hex.
    Encode(EncodeArgs),

    /// Decode a hex key and print its fields.
    Decode(DecodeArgs),

    /// Compare two hex keys in key order and print -1, 0 or 1.
    Compare(CompareArgs),

    /// List the key type catalogue.
    Types,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Key type; defaults to KEYCODEC_KEY_TYPE.
    #[arg(long = "type", short = 't')]
    pub key_type: Option<KeyType>,

    /// Fields, e.g. `apple i:5`.
    pub fields: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Key type; defaults to KEYCODEC_KEY_TYPE.
    #[arg(long = "type", short = 't')]
    pub key_type: Option<KeyType>,

    /// Encoded key as hex.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Key type; defaults to KEYCODEC_KEY_TYPE.
    #[arg(long = "type", short = 't')]
    pub key_type: Option<KeyType>,

    /// First encoded key as hex.
    pub left: String,

    /// Second encoded key as hex.
    pub right: String,
}

/// Errors surfaced by the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A field argument could not be parsed.
    InvalidField { field: String, message: String },
    /// A hex argument is not valid hex.
    InvalidHex(String),
    /// The codec rejected the key.
    Key(KeyError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, message } => {
                write!(f, "invalid field '{field}': {message}")
            }
            Self::InvalidHex(text) => write!(f, "invalid hex: '{text}'"),
            Self::Key(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<KeyError> for CliError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}

/// Parse one field argument into a value.
pub fn parse_field(field: &str) -> Result<Value, CliError> {
    let invalid = |message: String| CliError::InvalidField {
        field: field.to_string(),
        message,
    };
    let Some((prefix, body)) = field.split_once(':') else {
        return Ok(Value::from(field));
    };
    match prefix {
        "i" => body
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|e| invalid(e.to_string())),
        "l" => body
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| invalid(e.to_string())),
        "f" => body
            .parse::<f32>()
            .map(Value::Float32)
            .map_err(|e| invalid(e.to_string())),
        "d" => body
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| invalid(e.to_string())),
        "x" => from_hex(body)
            .map(Value::Binary)
            .ok_or_else(|| invalid("not valid hex".to_string())),
        "s" => Ok(Value::from(body)),
        "n" if body.is_empty() => Ok(Value::Null),
        _ => Ok(Value::from(field)),
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    from_hex(text).ok_or_else(|| CliError::InvalidHex(text.to_string()))
}

/// Run a command and return the text to print.
pub fn run(command: &Command, config: &ToolConfig) -> Result<String, CliError> {
    let resolve = |key_type: Option<KeyType>| key_type.unwrap_or(config.default_key_type);
    match command {
        Command::Encode(args) => {
            let key_type = resolve(args.key_type);
            let values = args
                .fields
                .iter()
                .map(|f| parse_field(f))
                .collect::<Result<Vec<_>, _>>()?;
            let key = AnyKey::from_values(key_type, &values)?;
            tracing::debug!(%key, "encoding key");
            Ok(config.hex(&key.to_bytes()?))
        }
        Command::Decode(args) => {
            let key_type = resolve(args.key_type);
            let bytes = parse_hex(&args.hex)?;
            Ok(AnyKey::decode(key_type, &bytes)?.to_string())
        }
        Command::Compare(args) => {
            let key_type = resolve(args.key_type);
            let left = parse_hex(&args.left)?;
            let right = parse_hex(&args.right)?;
            let ordering = AnyKey::compare_encoded(key_type, &left, &right)?;
            Ok(compare_sign(ordering).to_string())
        }
        Command::Types => Ok(KeyType::ALL
            .iter()
            .map(|t| {
                let order = if t.byte_ordered() {
                    "byte order"
                } else {
                    "key comparator"
                };
                format!("{:>2}  {:<18} {order}", t.id(), t.name())
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("keycodec").chain(args.iter().copied()))
            .expect("arguments parse");
        run(&cli.command, &ToolConfig::default())
    }

    #[test]
    fn test_parse_field_prefixes() {
        assert_eq!(parse_field("i:-5"), Ok(Value::Int32(-5)));
        assert_eq!(parse_field("l:7"), Ok(Value::Int64(7)));
        assert_eq!(parse_field("d:1.5"), Ok(Value::Float64(1.5)));
        assert_eq!(parse_field("x:0aFF"), Ok(Value::Binary(vec![0x0A, 0xFF])));
        assert_eq!(parse_field("s:i:5"), Ok(Value::from("i:5")));
        assert_eq!(parse_field("n:"), Ok(Value::Null));
        assert_eq!(parse_field("apple"), Ok(Value::from("apple")));
        assert_eq!(parse_field("http://x"), Ok(Value::from("http://x")));
        assert!(parse_field("i:five").is_err());
        assert!(parse_field("x:abc").is_err());
    }

    #[test]
    fn test_encode_multi_by_default() {
        let hex = run_args(&["encode", "a", "i:1", "l:2"]).expect("encode");
        assert_eq!(hex, "6180000001800000000000000280004000000103");
    }

    #[test]
    fn test_encode_decode_two_field() {
        let hex = run_args(&["encode", "-t", "string-number32", "apple", "i:5"]).expect("encode");
        assert_eq!(hex, "000a006100700070006c006580000005");
        let text = run_args(&["decode", "--type", "str-int", &hex]).expect("decode");
        assert_eq!(text, "[string-number32]apple,5");
    }

    #[test]
    fn test_compare_uses_key_order() {
        let b = run_args(&["encode", "-t", "str-int", "b", "i:0"]).expect("encode");
        let aa = run_args(&["encode", "-t", "str-int", "aa", "i:0"]).expect("encode");
        assert_eq!(
            run_args(&["compare", "-t", "str-int", &b, &aa]).expect("compare"),
            "1"
        );
        assert_eq!(
            run_args(&["compare", "-t", "str-int", &aa, &aa]).expect("compare"),
            "0"
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            run_args(&["decode", "zz"]),
            Err(CliError::InvalidHex("zz".to_string()))
        );
        let error = run_args(&["encode", "-t", "n32-n64", "apple"]).expect_err("not a number");
        assert!(matches!(error, CliError::Key(KeyError::TypeMismatch { .. })));
    }

    #[test]
    fn test_types_lists_catalogue() {
        let listing = run_args(&["types"]).expect("types");
        assert_eq!(listing.lines().count(), KeyType::ALL.len());
        assert!(listing.contains("binary-number64"));
    }
}
