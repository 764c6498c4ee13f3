//! Error types for status delivery.

/// Errors produced while delivering a status or reading hook settings.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection timed out")]
    Timeout,

    #[error("bridge failed: {0}")]
    Bridge(String),

    #[error("invalid hook config: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] pulsetray_protocol::ProtocolError),
}
