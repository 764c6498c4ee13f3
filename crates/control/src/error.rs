//! Error types for the control listener.

use std::net::SocketAddr;

/// Errors produced by the control listener.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("{0} is already in use; is another pulsetray instance running?")]
    AlreadyRunning(SocketAddr),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection timed out")]
    Timeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] pulsetray_protocol::ProtocolError),
}

impl ControlError {
    pub(crate) fn from_bind(addr: SocketAddr, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            ControlError::AlreadyRunning(addr)
        } else {
            ControlError::Bind { addr, source }
        }
    }
}
