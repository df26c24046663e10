//! INI-file backed settings store
//!
//! Parsing and formatting are delegated to `rust-ini`. Quote and escape handling
//! are disabled in both directions so values such as `C:\CoreCycler\configs\a.ini`
//! round-trip byte for byte.

use ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::store::{SettingsStore, StoreError};

/// Settings store persisted to an INI file on every write.
///
/// Without a path the store lives only in memory; writes always succeed.
pub struct IniStore {
    path: Option<PathBuf>,
    ini: Ini,
}

fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn write_option() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        kv_separator: " = ",
        ..WriteOption::default()
    }
}

impl IniStore {
    /// Open the settings file at `path`. A missing file yields an empty store;
    /// the file is created by the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let ini = match fs::read_to_string(&path) {
            Ok(contents) => {
                let ini = Ini::load_from_str_opt(&contents, parse_option()).map_err(|e| {
                    StoreError::Parse {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                })?;
                info!(path = %path.display(), "Loaded settings file");
                ini
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Settings file not found, starting empty");
                Ini::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path: Some(path),
            ini,
        })
    }

    /// Store that is never flushed to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            ini: Ini::new(),
        }
    }

    /// In-memory store seeded from INI text
    pub fn parse(contents: &str) -> Result<Self, StoreError> {
        let ini = Ini::load_from_str_opt(contents, parse_option()).map_err(|e| StoreError::Parse {
            path: PathBuf::from("<memory>"),
            message: e.to_string(),
        })?;
        Ok(Self { path: None, ini })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render the store exactly as it would be written to disk
    pub fn to_ini_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.ini.write_to_opt(&mut buf, write_option());
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Key spelling already present in `section` for a case-insensitive match
    fn existing_key(&self, section: &str, key: &str) -> Option<String> {
        self.ini.section(Some(section)).and_then(|props| {
            props
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(k, _)| k.to_string())
        })
    }

    /// Values the INI grammar would misread on the next load
    fn check_value(section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let reason = if value.contains(['\n', '\r']) {
            "value contains a line break"
        } else if value.ends_with('\\') {
            "value ends with a backslash"
        } else {
            return Ok(());
        };
        Err(StoreError::Unrepresentable {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.ini
            .write_to_file_opt(path, write_option())
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })
    }
}

impl SettingsStore for IniStore {
    fn read_section(&self, section: &str) -> BTreeMap<String, String> {
        self.ini
            .section(Some(section))
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_raw(&self, section: &str, key: &str) -> Option<String> {
        self.ini.section(Some(section)).and_then(|props| {
            props
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.to_string())
        })
    }

    fn write(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        Self::check_value(section, key, value)?;
        let key = self
            .existing_key(section, key)
            .unwrap_or_else(|| key.to_string());
        self.ini.with_section(Some(section)).set(key.as_str(), value);
        debug!(section, key = %key, value, "Updated settings entry in memory");
        self.flush()
    }

    fn sections(&self) -> Vec<String> {
        self.ini
            .sections()
            .flatten()
            .filter(|name| {
                self.ini
                    .section(Some(*name))
                    .is_some_and(|props| props.iter().next().is_some())
            })
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_starts_empty_and_write_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut store = IniStore::open(&path).unwrap();
        assert!(store.read_section("General").is_empty());
        assert!(!path.exists());

        store.write("General", "stressTestProgram", "LINPACK").unwrap();
        assert!(path.exists());

        let reopened = IniStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("General", "stressTestProgram", "PRIME95"),
            "LINPACK"
        );
    }

    #[test]
    fn test_key_lookup_is_case_insensitive() {
        let store = IniStore::parse("[General]\nstresstestprogram = AIDA64\n").unwrap();
        assert_eq!(
            store.get_raw("General", "stressTestProgram").as_deref(),
            Some("AIDA64")
        );
        // Section names stay case-sensitive
        assert_eq!(store.get_raw("general", "stressTestProgram"), None);
    }

    #[test]
    fn test_upsert_keeps_existing_key_spelling() {
        let mut store = IniStore::parse("[Prime95]\nfftsize = Huge\n").unwrap();
        store.write("Prime95", "fftSize", "Small").unwrap();

        let section = store.read_section("Prime95");
        assert_eq!(section.len(), 1);
        assert_eq!(section.get("fftsize").map(String::as_str), Some("Small"));
    }

    #[test]
    fn test_windows_paths_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut store = IniStore::open(&path).unwrap();
        store
            .write("General", "useConfigFile", r"C:\CoreCycler\configs\ycruncher.ini")
            .unwrap();

        let reopened = IniStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("General", "useConfigFile", ""),
            r"C:\CoreCycler\configs\ycruncher.ini"
        );
    }

    #[test]
    fn test_typed_getters_fall_back() {
        let store = IniStore::parse(
            "[yCruncher]\ntestDuration = abc\nmemory = 512.5\n\n[Aida64]\nuseavx = Yes\nmaxmemory = 75\n",
        )
        .unwrap();

        assert_eq!(store.get_int("yCruncher", "testDuration", 60), 60);
        assert_eq!(store.get_float("yCruncher", "memory", 256.0), 512.5);
        assert!(store.get_bool("Aida64", "useavx", false));
        assert_eq!(store.get_int("Aida64", "maxmemory", 90), 75);
        assert_eq!(store.get_int("Aida64", "missing", 90), 90);
        assert_eq!(store.get("Nope", "missing", "fallback"), "fallback");
    }

    #[test]
    fn test_write_failure_is_reported_and_memory_updated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("config.ini");

        let mut store = IniStore::open(&path).unwrap();
        let err = store.write("Linpack", "mode", "Fast").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        // In-memory view reflects the attempted change
        assert_eq!(store.get("Linpack", "mode", "Medium"), "Fast");
    }

    #[test]
    fn test_trailing_backslash_is_refused_and_next_key_survives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut store = IniStore::open(&path).unwrap();
        store
            .write("General", "useConfigFile", r"C:\CoreCycler\configs\a.ini")
            .unwrap();
        let err = store
            .write("General", "useConfigFile", r"C:\CoreCycler\configs\")
            .unwrap_err();
        assert!(matches!(err, StoreError::Unrepresentable { .. }));
        store.write("General", "maxIterations", "7").unwrap();

        let reopened = IniStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_raw("General", "useConfigFile").as_deref(),
            Some(r"C:\CoreCycler\configs\a.ini")
        );
        assert_eq!(reopened.get_raw("General", "maxIterations").as_deref(), Some("7"));
    }

    #[test]
    fn test_line_breaks_cannot_inject_keys() {
        let mut store = IniStore::in_memory();
        for value in ["1, 2\nstopOnError = 1", "3\r"] {
            let err = store.write("General", "coresToIgnore", value).unwrap_err();
            assert!(matches!(err, StoreError::Unrepresentable { .. }), "{value:?}");
        }
        assert_eq!(store.get_raw("General", "coresToIgnore"), None);
        assert_eq!(store.get_raw("General", "stopOnError"), None);
    }

    #[test]
    fn test_sections_lists_written_sections_in_order() {
        let mut store = IniStore::in_memory();
        store.write("Update", "enableUpdateCheck", "1").unwrap();
        store.write("General", "maxIterations", "5").unwrap();

        assert_eq!(store.sections(), vec!["Update".to_string(), "General".to_string()]);
        assert!(store.to_ini_string().contains("maxIterations = 5"));
    }
}
