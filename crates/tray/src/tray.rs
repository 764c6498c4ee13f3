//! Tray handle, events, and update types.
//!
//! This module defines the channel-based interface between the daemon and
//! the tray widget, independent of the GUI backend.

use std::sync::mpsc;

use pulsetray_animation::{DisplaySurface, Frame, ICON_SIZE};
use pulsetray_protocol::Status;
use pulsetray_settings::Config;

use crate::menu::{MenuAction, MenuState};

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Name shown as the notification title.
    pub app_name: String,
    /// Edge length of the rasterized icon in pixels.
    pub icon_size: u32,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            app_name: "pulsetray".into(),
            icon_size: ICON_SIZE,
        }
    }
}

/// Events emitted by the tray to the daemon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrayEvent {
    /// User clicked a menu item.
    Menu(MenuAction),
}

/// Updates sent from the daemon to the tray.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// Replace the icon and tooltip with this frame.
    Frame(Frame),
    /// Rebuild the context menu from this state.
    Menu(MenuState),
    /// Show a desktop notification.
    Notify { title: String, body: String },
    /// Request tray shutdown.
    Shutdown,
}

/// Frame sink handed to the animation loop.
///
/// Cheap to clone; every clone feeds the same tray.
#[derive(Debug, Clone)]
pub struct TraySurface {
    update_tx: mpsc::Sender<TrayUpdate>,
}

impl DisplaySurface for TraySurface {
    fn show(&self, frame: &Frame) {
        // The tray may already be gone during shutdown.
        let _ = self.update_tx.send(TrayUpdate::Frame(*frame));
    }
}

/// Handle for communicating with the system tray from the daemon.
///
/// The tray event loop runs on the main thread and communicates via
/// channels.
pub struct TrayHandle {
    config: TrayConfig,
    /// Send updates to the tray.
    update_tx: mpsc::Sender<TrayUpdate>,
    /// Receive events from the tray.
    event_rx: mpsc::Receiver<TrayEvent>,
    /// Current menu state (for tracking).
    state: MenuState,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`; the sender/receiver
    /// pair is given to the tray event loop running on the main thread.
    pub fn new(
        config: TrayConfig,
        settings: Config,
    ) -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            config,
            update_tx,
            event_rx,
            state: MenuState::new(Status::Standby, settings),
        };
        let _ = handle.update_tx.send(TrayUpdate::Menu(handle.state));

        (handle, event_tx, update_rx)
    }

    pub fn config(&self) -> &TrayConfig {
        &self.config
    }

    /// A frame sink for the animation loop.
    pub fn surface(&self) -> TraySurface {
        TraySurface {
            update_tx: self.update_tx.clone(),
        }
    }

    /// Updates the status header. No-op if unchanged.
    pub fn set_status(&mut self, status: Status) {
        if self.state.status != status {
            self.state.status = status;
            self.push_menu();
        }
    }

    /// Refreshes volume and logging check marks.
    pub fn set_settings(&mut self, settings: Config) {
        self.state.volume = settings.volume;
        self.state.logging_enabled = settings.logging_enabled;
        self.push_menu();
    }

    /// Shows a desktop notification titled with the app name.
    pub fn notify(&self, body: impl Into<String>) {
        let _ = self.update_tx.send(TrayUpdate::Notify {
            title: self.config.app_name.clone(),
            body: body.into(),
        });
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        let _ = self.update_tx.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Returns the current menu state.
    pub fn state(&self) -> &MenuState {
        &self.state
    }

    fn push_menu(&self) {
        if self.update_tx.send(TrayUpdate::Menu(self.state)).is_err() {
            tracing::debug!("tray update dropped, tray is gone");
        }
    }
}
