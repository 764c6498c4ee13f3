//! Event → status mapping table.

use std::collections::HashMap;

use pulsetray_protocol::Status;
use serde::{Deserialize, Serialize};

/// What an event does to the tray status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Working,
    Standby,
    /// Leave the status as it is.
    Keep,
}

impl PolicyAction {
    /// Command to send, or `None` for [`PolicyAction::Keep`].
    pub fn status(self) -> Option<Status> {
        match self {
            PolicyAction::Working => Some(Status::Working),
            PolicyAction::Standby => Some(Status::Standby),
            PolicyAction::Keep => None,
        }
    }
}

const DEFAULT_TABLE: &[(&str, PolicyAction)] = &[
    ("UserPromptSubmit", PolicyAction::Working),
    ("PreToolUse", PolicyAction::Working),
    ("ToolUse", PolicyAction::Working),
    ("SubagentStart", PolicyAction::Working),
    ("Stop", PolicyAction::Standby),
    ("SubagentStop", PolicyAction::Standby),
    ("Notification", PolicyAction::Standby),
    // More tools may follow, so the tray stays yellow.
    ("PostToolUse", PolicyAction::Keep),
];

/// Maps lifecycle event names onto status commands.
///
/// Unlisted events map to [`PolicyAction::Keep`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPolicy {
    table: HashMap<String, PolicyAction>,
}

impl Default for EventPolicy {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE
                .iter()
                .map(|(name, action)| (name.to_string(), *action))
                .collect(),
        }
    }
}

impl EventPolicy {
    /// Default table with `overrides` applied on top.
    pub fn with_overrides(overrides: &HashMap<String, PolicyAction>) -> Self {
        let mut policy = Self::default();
        for (name, action) in overrides {
            policy.table.insert(name.clone(), *action);
        }
        policy
    }

    pub fn resolve(&self, event_name: &str) -> PolicyAction {
        self.table
            .get(event_name)
            .copied()
            .unwrap_or(PolicyAction::Keep)
    }
}
