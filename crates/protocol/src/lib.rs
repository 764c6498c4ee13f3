//! Wire types shared by the pulsetray daemon and the hook.
//!
//! The control channel is plain text over loopback TCP. Each connection
//! carries exactly one request; a single receive is the whole message.

pub mod command;
pub mod constants;
pub mod error;
pub mod status;

pub use command::{Command, ConfigReply};
pub use error::ProtocolError;
pub use status::{Status, StatusSnapshot, Transition};
