use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Whether the monitored tool is busy or idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Working,
    #[default]
    Standby,
}

impl Status {
    /// Wire name of the status, also the command that selects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Working => "working",
            Status::Standby => "standby",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working" => Ok(Status::Working),
            "standby" => Ok(Status::Standby),
            other => Err(ProtocolError::UnknownStatus(other.to_string())),
        }
    }
}

/// Current status together with the value it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub status: Status,
    pub previous: Status,
}

/// A committed status mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Status,
    pub to: Status,
}

impl Transition {
    /// `true` for the Working→Standby edge (a task just finished).
    pub fn is_completion(&self) -> bool {
        self.from == Status::Working && self.to == Status::Standby
    }

    /// `true` when the status did not change.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}
