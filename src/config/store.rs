//! Key-value persistence contract consumed by the synchronizers

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence failures. Always recoverable: callers report them and carry on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The value would not read back unchanged from the file
    #[error("cannot save [{section}] {key}: {reason}")]
    Unrepresentable {
        section: String,
        key: String,
        reason: &'static str,
    },
}

/// Section/key/value store with write-through semantics.
///
/// Readers never fail: a missing or unparseable value yields the caller's fallback.
/// `write` persists the whole store before returning.
pub trait SettingsStore {
    /// All entries of a section, empty when the section does not exist
    fn read_section(&self, section: &str) -> BTreeMap<String, String>;

    /// Raw stored value; key matching is case-insensitive
    fn get_raw(&self, section: &str, key: &str) -> Option<String>;

    /// Upsert `key` in `section`, creating the section if needed, then flush to disk
    fn write(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError>;

    /// Names of every non-empty section, in file order
    fn sections(&self) -> Vec<String>;

    fn get(&self, section: &str, key: &str, default: &str) -> String {
        self.get_raw(section, key)
            .unwrap_or_else(|| default.to_string())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_raw(section, key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_float(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_raw(section, key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_raw(section, key)
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(default)
    }
}

/// configparser boolean grammar (case-insensitive, whitespace tolerant)
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_grammar() {
        for raw in ["1", "yes", "TRUE", " On ", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "No", "false", "OFF"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("2"), None);
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("enabled"), None);
    }
}
