//! Process-wide status holder.
//!
//! [`StatusStore`] is the only shared mutable status in the daemon. It is
//! created once, wrapped in an `Arc`, and handed to the control listener,
//! the animation loop, and the transition notifier.

mod store;

pub use pulsetray_protocol::{Status, StatusSnapshot, Transition};
pub use store::{Completions, StatusStore, TRANSITION_CAPACITY};
