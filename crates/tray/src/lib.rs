//! System tray interface for the pulsetray daemon.
//!
//! The tray widget itself lives with the platform GUI toolkit. This crate
//! defines what the daemon and the widget exchange:
//! - [`TrayEvent`]: from the tray to the daemon (menu clicks)
//! - [`TrayUpdate`]: from the daemon to the tray (icon frames, menu state)
//!
//! # Platform notes
//! - The tray event loop must run on the main thread on some platforms
//! - Icon frames arrive at the animation rate; the widget should replace
//!   the icon in place rather than rebuild the menu

mod menu;
mod tray;

pub use menu::{MenuAction, MenuItem, MenuItemKind, MenuState};
pub use tray::{TrayConfig, TrayEvent, TrayHandle, TraySurface, TrayUpdate};
