//! Append-only hook event log.
//!
//! One line per entry:
//!
//! ```text
//! 2025-01-01 12:00:00 [INFO] Event: PreToolUse, Tool: Bash - Setting status to working
//! ```
//!
//! Writes are best-effort: the file is opened in append mode for every
//! entry and flushed immediately, and failures never reach the caller.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged hook event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Local>,
    pub event_name: String,
    pub tool_name: Option<String>,
    pub message: String,
    pub level: Level,
}

impl EventLogEntry {
    /// Entry stamped with the current local time.
    pub fn new(level: Level, event_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            event_name: event_name.into(),
            tool_name: None,
            message: message.into(),
            level,
        }
    }

    pub fn with_tool(mut self, tool_name: Option<impl Into<String>>) -> Self {
        self.tool_name = tool_name.map(Into::into).filter(|t: &String| !t.is_empty());
        self
    }
}

impl fmt::Display for EventLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] Event: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.event_name
        )?;
        if let Some(tool) = &self.tool_name {
            write!(f, ", Tool: {tool}")?;
        }
        if !self.message.is_empty() {
            write!(f, " - {}", self.message)?;
        }
        Ok(())
    }
}

/// Best-effort appender for [`EventLogEntry`] lines.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
    enabled: bool,
}

impl EventLog {
    pub fn open(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Appends one line. Returns `false` if disabled or the write failed.
    pub fn append(&self, entry: &EventLogEntry) -> bool {
        if !self.enabled {
            return false;
        }
        match self.write_line(entry) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to write event log: {e}");
                false
            }
        }
    }

    fn write_line(&self, entry: &EventLogEntry) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")?;
        file.flush()
    }
}
