//! Control listener.
//!
//! Accepts short-lived loopback connections, decodes one command per
//! connection, and applies it to the shared [`StatusStore`] or answers a
//! settings query.
//!
//! [`StatusStore`]: pulsetray_status::StatusStore

pub mod error;
pub mod listener;

pub use error::ControlError;
pub use listener::{ControlListener, Outcome};
