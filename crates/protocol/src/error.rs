//! Protocol error types.

/// Errors produced while decoding control-channel payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("unknown status: {0:?}")]
    UnknownStatus(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
