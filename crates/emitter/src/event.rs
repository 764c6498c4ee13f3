use serde::Deserialize;

use crate::EmitError;

/// Event name used when the payload carries none.
pub const UNKNOWN_EVENT: &str = "Unknown";

/// One lifecycle event from the automation tool.
///
/// Only the fields pulsetray needs are kept; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
}

impl HookEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            hook_event_name: Some(name.into()),
            tool_name: None,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, EmitError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Event name, or `Unknown` if absent or empty.
    pub fn name(&self) -> &str {
        self.hook_event_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_EVENT)
    }

    pub fn tool(&self) -> Option<&str> {
        self.tool_name.as_deref().filter(|t| !t.is_empty())
    }
}
