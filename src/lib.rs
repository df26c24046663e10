//! Settings synchronization core for the CoreCycler front-end
//!
//! - **config**: `config.ini` persistence behind the `SettingsStore` trait
//! - **field**: observable controls and the registry a deployment fills
//! - **sync**: the binding kinds that keep fields and store in step
//! - **profiles**: one synchronizer per settings section, bound by `Session`
//! - **launcher**: helper program launching

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod field;
pub mod launcher;
pub mod profiles;
pub mod sync;
