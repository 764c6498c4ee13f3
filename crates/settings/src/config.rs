use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Volume used when the file has none.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Volume levels offered by the tray menu, loudest first.
pub const VOLUME_PRESETS: [f32; 5] = [1.0, 0.75, 0.5, 0.25, 0.1];

/// Tray settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Whether the hook appends to the event log.
    #[serde(default = "default_true", alias = "logging")]
    pub logging_enabled: bool,

    /// Notification volume in `[0, 1]`.
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging_enabled: default_true(),
            volume: default_volume(),
        }
    }
}

impl Config {
    /// Clamps the volume into `[0, 1]`; NaN falls back to the default.
    pub fn normalized(mut self) -> Self {
        self.volume = clamp_volume(self.volume);
        self
    }

    /// Reads and parses a settings file.
    pub fn read_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Writes the whole file, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether `preset` is the selected volume (radio-button check state).
    pub fn volume_is(&self, preset: f32) -> bool {
        (self.volume - preset).abs() < 0.001
    }
}

pub(crate) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        DEFAULT_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}
