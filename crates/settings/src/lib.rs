//! Persisted tray settings.
//!
//! Settings live in a small JSON file:
//!
//! ```json
//! { "logging_enabled": true, "volume": 0.5 }
//! ```
//!
//! The file is read once at startup and rewritten whole after every change.
//! Menu actions reach the store as [`SettingsMessage`]s, so nothing outside
//! [`ConfigStore`] holds a mutable copy.

mod config;
mod error;
pub mod paths;
mod store;

pub use config::{Config, DEFAULT_VOLUME, VOLUME_PRESETS};
pub use error::SettingsError;
pub use store::{ConfigStore, SettingsMessage};
