//! Platform-specific settings locations.
//!
//! - Linux: `~/.config/pulsetray/`
//! - Windows: `%APPDATA%/pulsetray/`

use std::path::PathBuf;

/// Directory holding `config.json`, `hook.toml`, and `events.log`.
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config").join("pulsetray")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("pulsetray")
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("/tmp/pulsetray")
    }
}

/// Tray settings file.
pub fn config_file() -> PathBuf {
    config_dir().join("config.json")
}

/// Hook-side settings file (policy table, sink selection).
pub fn hook_config_file() -> PathBuf {
    config_dir().join("hook.toml")
}

/// Append-only hook event log.
pub fn event_log_file() -> PathBuf {
    config_dir().join("events.log")
}

/// Default notification sound.
pub fn default_sound_file() -> PathBuf {
    config_dir().join("sounds").join("task_complete.wav")
}
