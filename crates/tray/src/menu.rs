//! Dynamic context menu for the system tray.

use pulsetray_protocol::Status;
use pulsetray_settings::{Config, SettingsMessage, VOLUME_PRESETS};

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    /// Select a notification volume.
    SetVolume(f32),
    /// Play the notification sound at the current volume.
    TestSound,
    /// Flip the hook's event logging.
    ToggleLogging,
    /// Pop a notification with the current status.
    ShowStatus,
    /// User requested to quit the application.
    Quit,
}

impl MenuAction {
    /// The settings change this action stands for, if any.
    pub fn settings_message(&self) -> Option<SettingsMessage> {
        match self {
            MenuAction::SetVolume(level) => Some(SettingsMessage::SetVolume(*level)),
            MenuAction::ToggleLogging => Some(SettingsMessage::ToggleLogging),
            MenuAction::TestSound | MenuAction::ShowStatus | MenuAction::Quit => None,
        }
    }
}

/// How a menu item is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Label,
    Separator,
    Check { checked: bool },
    Radio { checked: bool },
}

/// A single menu item.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    pub kind: MenuItemKind,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
    /// Nested items (the volume submenu).
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn label(label: impl Into<String>, action: Option<MenuAction>) -> Self {
        Self {
            label: label.into(),
            kind: MenuItemKind::Label,
            enabled: action.is_some(),
            action,
            children: Vec::new(),
        }
    }

    fn separator() -> Self {
        Self {
            label: String::new(),
            kind: MenuItemKind::Separator,
            enabled: false,
            action: None,
            children: Vec::new(),
        }
    }
}

/// Current state used to build the context menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuState {
    pub status: Status,
    pub volume: f32,
    pub logging_enabled: bool,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new(Status::Standby, Config::default())
    }
}

impl MenuState {
    pub fn new(status: Status, config: Config) -> Self {
        Self {
            status,
            volume: config.volume,
            logging_enabled: config.logging_enabled,
        }
    }

    /// Builds the menu items from the current state.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        let config = Config {
            logging_enabled: self.logging_enabled,
            volume: self.volume,
        };

        let volumes = VOLUME_PRESETS
            .iter()
            .map(|&level| MenuItem {
                label: format!("{}%", (level * 100.0).round() as u32),
                kind: MenuItemKind::Radio {
                    checked: config.volume_is(level),
                },
                enabled: true,
                action: Some(MenuAction::SetVolume(level)),
                children: Vec::new(),
            })
            .collect();

        vec![
            // Header: current status, informational only.
            MenuItem::label(format!("Status: {}", self.status), None),
            MenuItem::separator(),
            MenuItem {
                label: "Volume".into(),
                kind: MenuItemKind::Label,
                enabled: true,
                action: None,
                children: volumes,
            },
            MenuItem::label("Test Sound", Some(MenuAction::TestSound)),
            MenuItem::label("Show Status", Some(MenuAction::ShowStatus)),
            MenuItem::separator(),
            MenuItem {
                label: "Logging".into(),
                kind: MenuItemKind::Check {
                    checked: self.logging_enabled,
                },
                enabled: true,
                action: Some(MenuAction::ToggleLogging),
                children: Vec::new(),
            },
            MenuItem::label("Quit", Some(MenuAction::Quit)),
        ]
    }
}
