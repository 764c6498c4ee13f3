//! Request decoding and the `get_config` reply.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Status};

/// A decoded control-channel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install a new status (`working` / `standby`).
    SetStatus(Status),
    /// Ask for the tray's current settings (`get_config`).
    GetConfig,
}

impl Command {
    pub const GET_CONFIG: &'static str = "get_config";

    /// Decodes one raw receive. Surrounding whitespace is ignored.
    pub fn parse(raw: &[u8]) -> Result<Self, ProtocolError> {
        let text = String::from_utf8_lossy(raw);
        let text = text.trim();
        match text {
            Self::GET_CONFIG => Ok(Command::GetConfig),
            other => other
                .parse::<Status>()
                .map(Command::SetStatus)
                .map_err(|_| ProtocolError::UnknownCommand(other.to_string())),
        }
    }

    /// Payload to put on the wire for this command.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Command::SetStatus(status) => status.as_str(),
            Command::GetConfig => Self::GET_CONFIG,
        }
    }
}

/// JSON body sent back for `get_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigReply {
    #[serde(default = "default_true")]
    pub logging_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConfigReply {
    fn default() -> Self {
        Self {
            logging_enabled: true,
        }
    }
}

impl ConfigReply {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(raw)?)
    }
}
