//! Headless tray front-end.
//!
//! Stands in for a GUI tray: update messages go to the log, and menu
//! actions are read as text commands from stdin (`volume 50`, `test`,
//! `logging`, `status`, `menu`, `quit`).

use std::io::BufRead;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use pulsetray_tray::{
    MenuAction, MenuItem, MenuItemKind, MenuState, TrayConfig, TrayEvent, TrayUpdate,
};

/// Starts the presenter and stdin reader threads.
pub fn spawn(
    config: &TrayConfig,
    event_tx: mpsc::Sender<TrayEvent>,
    update_rx: mpsc::Receiver<TrayUpdate>,
) {
    let menu = Arc::new(Mutex::new(MenuState::default()));

    let mut presenter = Presenter::new(config.icon_size, Arc::clone(&menu));
    std::thread::spawn(move || {
        while let Ok(update) = update_rx.recv() {
            if !presenter.apply(update) {
                break;
            }
        }
    });
    std::thread::spawn(move || read_commands(event_tx, &menu));
}

/// What a GUI tray would be showing right now.
struct Presenter {
    icon_size: u32,
    /// RGBA pixels of the current icon.
    icon: Vec<u8>,
    tooltip: &'static str,
    menu: Arc<Mutex<MenuState>>,
}

impl Presenter {
    fn new(icon_size: u32, menu: Arc<Mutex<MenuState>>) -> Self {
        Self {
            icon_size,
            icon: Vec::new(),
            tooltip: "",
            menu,
        }
    }

    /// Applies one update. Returns `false` on shutdown.
    fn apply(&mut self, update: TrayUpdate) -> bool {
        match update {
            TrayUpdate::Frame(frame) => {
                self.icon = frame.to_rgba(self.icon_size);
                if frame.tooltip != self.tooltip {
                    tracing::info!(tooltip = frame.tooltip, "tray icon");
                    self.tooltip = frame.tooltip;
                }
                tracing::trace!(
                    phase = frame.phase,
                    level = frame.level,
                    bytes = self.icon.len(),
                    "frame"
                );
            }
            TrayUpdate::Menu(state) => {
                *self.menu.lock().unwrap_or_else(PoisonError::into_inner) = state;
                tracing::debug!(?state, "menu rebuilt");
            }
            TrayUpdate::Notify { title, body } => {
                tracing::info!(%title, "{}", body.replace('\n', ", "));
            }
            TrayUpdate::Shutdown => return false,
        }
        true
    }
}

fn read_commands(event_tx: mpsc::Sender<TrayEvent>, menu: &Mutex<MenuState>) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "menu" {
            let state = *menu.lock().unwrap_or_else(PoisonError::into_inner);
            println!("{}", render_menu(&state.build_menu(), 0));
            continue;
        }
        match parse_command(line) {
            Some(action) => {
                if event_tx.send(TrayEvent::Menu(action)).is_err() {
                    break;
                }
            }
            None => tracing::warn!(command = line, "unknown tray command"),
        }
    }
}

/// Maps a text command onto a menu action.
pub fn parse_command(line: &str) -> Option<MenuAction> {
    let mut words = line.split_whitespace();
    let action = match words.next()? {
        "volume" => {
            let pct: u32 = words.next()?.trim_end_matches('%').parse().ok()?;
            MenuAction::SetVolume(pct.min(100) as f32 / 100.0)
        }
        "test" => MenuAction::TestSound,
        "logging" => MenuAction::ToggleLogging,
        "status" => MenuAction::ShowStatus,
        "quit" => MenuAction::Quit,
        _ => return None,
    };
    Some(action)
}

fn render_menu(items: &[MenuItem], depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let mut out = Vec::new();
    for item in items {
        let line = match item.kind {
            MenuItemKind::Separator => format!("{indent}----"),
            MenuItemKind::Check { checked } | MenuItemKind::Radio { checked } => {
                format!("{indent}[{}] {}", if checked { 'x' } else { ' ' }, item.label)
            }
            MenuItemKind::Label => format!("{indent}{}", item.label),
        };
        out.push(line);
        if !item.children.is_empty() {
            out.push(render_menu(&item.children, depth + 1));
        }
    }
    out.join("\n")
}
