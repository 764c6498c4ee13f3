//! Hook-side half of pulsetray.
//!
//! The automation tool runs the hook binary with one JSON event on stdin.
//! This crate maps the event through a configurable [`EventPolicy`] onto a
//! `working`/`standby` command and delivers it through a [`StatusSink`]:
//! directly over loopback, or through a helper process when the tray runs
//! on the other side of an OS/VM boundary.

pub mod client;
pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod policy;
pub mod sink;

pub use config::{HookConfig, SinkKind};
pub use emitter::Emitter;
pub use error::EmitError;
pub use event::HookEvent;
pub use policy::{EventPolicy, PolicyAction};
pub use sink::{BridgeSink, FallbackSink, LoopbackSink, SinkFuture, StatusSink};
