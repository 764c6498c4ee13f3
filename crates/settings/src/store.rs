use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::config::clamp_volume;
use crate::{Config, SettingsError};

/// Discrete settings changes produced by tray menu actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsMessage {
    SetVolume(f32),
    ToggleLogging,
}

/// In-memory settings plus the file they persist to.
///
/// Reads are late-binding: callers ask for the value at the moment they
/// need it rather than caching it at startup.
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Config>,
}

impl ConfigStore {
    /// Loads settings from `path`.
    ///
    /// A missing file yields defaults, which are written out. An unreadable
    /// or malformed file yields defaults and is left untouched.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let config = if path.exists() {
            match Config::read_from(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "settings loaded");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to load settings, using defaults: {e}");
                    Config::default()
                }
            }
        } else {
            let config = Config::default();
            tracing::info!(path = %path.display(), "no settings file, writing defaults");
            if let Err(e) = config.write_to(&path) {
                tracing::warn!(path = %path.display(), "failed to write default settings: {e}");
            }
            config
        };

        Self::with_config(path, config)
    }

    /// Creates a store with an explicit starting value; nothing is read.
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(config.normalized()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Config {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn logging_enabled(&self) -> bool {
        self.current().logging_enabled
    }

    pub fn volume(&self) -> f32 {
        self.current().volume
    }

    /// Applies one change and rewrites the file.
    ///
    /// The in-memory value is updated even when the write fails.
    pub fn apply(&self, msg: SettingsMessage) -> Config {
        let updated = {
            let mut config = self.current.write().unwrap_or_else(PoisonError::into_inner);
            match msg {
                SettingsMessage::SetVolume(level) => {
                    config.volume = clamp_volume(level);
                    tracing::info!(volume = config.volume, "volume set");
                }
                SettingsMessage::ToggleLogging => {
                    config.logging_enabled = !config.logging_enabled;
                    tracing::info!(enabled = config.logging_enabled, "event logging toggled");
                }
            }
            *config
        };

        if let Err(e) = updated.write_to(&self.path) {
            tracing::error!(path = %self.path.display(), "failed to save settings: {e}");
        }
        updated
    }

    /// Writes the current settings to disk.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.current().write_to(&self.path)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");

        let store = ConfigStore::load(&path);
        assert_eq!(store.current(), Config::default());
        assert!(path.exists());
        assert_eq!(Config::read_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn load_malformed_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::load(&path);
        assert_eq!(store.current(), Config::default());
        // The broken file is not overwritten on load.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn toggle_logging_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let store = ConfigStore::load(&path);

        let updated = store.apply(SettingsMessage::ToggleLogging);
        assert!(!updated.logging_enabled);
        assert!(!store.logging_enabled());
        assert!(!Config::read_from(&path).unwrap().logging_enabled);

        store.apply(SettingsMessage::ToggleLogging);
        assert!(Config::read_from(&path).unwrap().logging_enabled);
    }

    #[test]
    fn set_volume_clamps_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let store = ConfigStore::load(&path);

        store.apply(SettingsMessage::SetVolume(0.25));
        assert_eq!(store.volume(), 0.25);
        assert_eq!(ConfigStore::load(&path).volume(), 0.25);

        store.apply(SettingsMessage::SetVolume(7.0));
        assert_eq!(store.volume(), 1.0);
    }

    #[test]
    fn reload_reproduces_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let store = ConfigStore::with_config(
            &path,
            Config {
                logging_enabled: false,
                volume: 0.1,
            },
        );
        store.save().unwrap();

        let reloaded = ConfigStore::load(&path);
        assert_eq!(reloaded.current(), store.current());
    }

    #[test]
    fn write_failure_keeps_memory_value() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = tmp.path().join("config.json");
        std::fs::create_dir(&path).unwrap();

        let store = ConfigStore::with_config(&path, Config::default());
        let updated = store.apply(SettingsMessage::SetVolume(0.75));
        assert_eq!(updated.volume, 0.75);
        assert_eq!(store.volume(), 0.75);
        assert!(store.save().is_err());
    }
}
