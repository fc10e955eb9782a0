//! Command-line tool configuration.
//!
//! Loaded from environment variables so a shell session can pin the key type
//! of the keyspace it is inspecting.
//!
//! # Environment Variables
//!
//! - `KEYCODEC_KEY_TYPE`: key type used when a command omits one (default: `multi`)
//! - `KEYCODEC_HEX_UPPERCASE`: `true` to print hex in upper case (default: `false`)

use crate::key_type::KeyType;

const KEY_TYPE_VAR: &str = "KEYCODEC_KEY_TYPE";
const HEX_UPPERCASE_VAR: &str = "KEYCODEC_HEX_UPPERCASE";

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Key type for commands that do not name one.
    pub default_key_type: KeyType,
    /// Print encoded keys as upper-case hex.
    pub hex_uppercase: bool,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_key_type: Self::DEFAULT_KEY_TYPE,
            hex_uppercase: false,
        }
    }
}

impl ToolConfig {
    pub const DEFAULT_KEY_TYPE: KeyType = KeyType::Multi;

    /// Load configuration from environment variables.
    ///
    /// Unset variables take their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_key_type = match lookup(KEY_TYPE_VAR) {
            Some(value) => value
                .parse::<KeyType>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: KEY_TYPE_VAR.to_string(),
                    message: e.to_string(),
                })?,
            None => Self::DEFAULT_KEY_TYPE,
        };
        let hex_uppercase = match lookup(HEX_UPPERCASE_VAR) {
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                name: HEX_UPPERCASE_VAR.to_string(),
                message: format!("'{value}' is not a boolean (use true or false)"),
            })?,
            None => false,
        };
        Ok(Self {
            default_key_type,
            hex_uppercase,
        })
    }

    /// Render bytes as hex in the configured case.
    #[must_use]
    pub fn hex(&self, bytes: &[u8]) -> String {
        let hex = crate::buffer::to_hex(bytes);
        if self.hex_uppercase {
            hex.to_ascii_uppercase()
        } else {
            hex
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ToolConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ToolConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        assert_eq!(load(&[]), Ok(ToolConfig::default()));
        assert_eq!(ToolConfig::default().default_key_type, KeyType::Multi);
    }

    #[test]
    fn test_reads_key_type_and_hex_case() {
        let config = load(&[
            ("KEYCODEC_KEY_TYPE", "str-int"),
            ("KEYCODEC_HEX_UPPERCASE", "TRUE"),
        ])
        .expect("valid config");
        assert_eq!(config.default_key_type, KeyType::TextInt32);
        assert!(config.hex_uppercase);
        assert_eq!(config.hex(&[0xAB, 0x01]), "AB01");
    }

    #[test]
    fn test_invalid_key_type() {
        let error = load(&[("KEYCODEC_KEY_TYPE", "widget")]).expect_err("invalid");
        assert_eq!(
            error.to_string(),
            "invalid value for KEYCODEC_KEY_TYPE: unknown key type: \"widget\""
        );
    }

    #[test]
    fn test_invalid_boolean() {
        let error = load(&[("KEYCODEC_HEX_UPPERCASE", "maybe")]).expect_err("invalid");
        assert_eq!(
            error,
            ConfigError::InvalidValue {
                name: "KEYCODEC_HEX_UPPERCASE".to_string(),
                message: "'maybe' is not a boolean (use true or false)".to_string(),
            }
        );
    }
}
