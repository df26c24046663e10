//! Settings persistence for CoreCycler
//!
//! - **store**: the `SettingsStore` contract every synchronizer writes through
//! - **ini_file**: `IniStore`, the `config.ini` implementation

pub mod ini_file;
pub mod store;

// Re-export commonly used types
pub use ini_file::IniStore;
pub use store::{parse_bool, SettingsStore, StoreError};
