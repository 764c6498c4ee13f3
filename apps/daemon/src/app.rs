//! Wires the daemon components together.

use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::console;
use pulsetray_animation::{AnimationEngine, DEFAULT_PERIOD};
use pulsetray_control::ControlListener;
use pulsetray_notifier::{CommandPlayer, TransitionNotifier};
use pulsetray_protocol::constants::default_control_addr;
use pulsetray_settings::{ConfigStore, paths};
use pulsetray_status::StatusStore;
use pulsetray_tray::{MenuAction, TrayConfig, TrayEvent, TrayHandle};
use tokio_util::sync::CancellationToken;

/// Overrides the notification sound file.
pub const SOUND_ENV: &str = "PULSETRAY_SOUND";

const DISPATCH_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the daemon until Ctrl-C or tray Quit.
pub async fn run() -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // -- Settings --
    let settings = Arc::new(ConfigStore::load(paths::config_file()));
    let config = settings.current();
    tracing::info!(
        path = %settings.path().display(),
        volume = config.volume,
        logging_enabled = config.logging_enabled,
        "settings loaded"
    );

    // -- Status + control channel --
    let store = Arc::new(StatusStore::new());
    let addr = default_control_addr();
    let listener = ControlListener::bind(
        addr,
        Arc::clone(&store),
        Arc::clone(&settings),
        cancel.clone(),
    )
    .await
    .with_context(|| format!("cannot listen on {addr}; is another pulsetray running?"))?;

    let listener_task = tokio::spawn(listener.run());

    // -- Tray --
    let (mut tray, event_tx, update_rx) = TrayHandle::new(TrayConfig::default(), config);
    console::spawn(tray.config(), event_tx, update_rx);

    // -- Animation --
    let surface = Arc::new(tray.surface());
    let animation_task = tokio::spawn(AnimationEngine::default().run(
        Arc::clone(&store),
        surface,
        DEFAULT_PERIOD,
        cancel.clone(),
    ));

    // -- Completion sound --
    let player = CommandPlayer::new(sound_file());
    tracing::info!(sound = %player.sound_file().display(), "notification sound");
    let notifier = TransitionNotifier::new(Arc::new(player), Arc::clone(&settings));
    let notifier_task = tokio::spawn(notifier.clone().run(store.completions(), cancel.clone()));

    tracing::info!(%addr, "pulsetray ready");

    // -- Main loop: tray events until shutdown --
    event_loop(
        tokio::signal::ctrl_c(),
        &cancel,
        &mut tray,
        &settings,
        &notifier,
        &store,
    )
    .await;

    // -- Graceful shutdown --
    cancel.cancel();
    tray.shutdown();
    match listener_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("control listener error: {e}"),
        Err(e) => tracing::error!("control listener task failed: {e}"),
    }
    let _ = animation_task.await;
    let _ = notifier_task.await;

    Ok(())
}

/// Dispatches tray events until `shutdown` resolves, the token is
/// cancelled, or Quit is chosen.
///
/// `shutdown` is polled in place across iterations, so a signal arriving
/// while an action is being dispatched is still seen.
async fn event_loop<F>(
    shutdown: F,
    cancel: &CancellationToken,
    tray: &mut TrayHandle,
    settings: &ConfigStore,
    notifier: &TransitionNotifier,
    store: &StatusStore,
) where
    F: Future,
{
    let mut shutdown = pin!(shutdown);
    let mut ticker = tokio::time::interval(DISPATCH_INTERVAL);
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            _ = &mut shutdown => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
            _ = ticker.tick() => {
                tray.set_status(store.status());
                while let Some(TrayEvent::Menu(action)) = tray.try_recv_event() {
                    if !dispatch(action, tray, settings, notifier, store) {
                        tracing::info!("quit requested via tray");
                        cancel.cancel();
                    }
                }
            }
        }
    }
}

/// Applies one menu action. Returns `false` for Quit.
fn dispatch(
    action: MenuAction,
    tray: &mut TrayHandle,
    settings: &ConfigStore,
    notifier: &TransitionNotifier,
    store: &StatusStore,
) -> bool {
    if let Some(msg) = action.settings_message() {
        let config = settings.apply(msg);
        tray.set_settings(config);
    }

    match action {
        MenuAction::SetVolume(level) => {
            tracing::info!(volume_pct = (level * 100.0).round() as u32, "volume changed");
            notifier.play_now();
        }
        MenuAction::ToggleLogging => {
            let state = if settings.logging_enabled() { "enabled" } else { "disabled" };
            tray.notify(format!("Logging {state}"));
        }
        MenuAction::TestSound => notifier.play_now(),
        MenuAction::ShowStatus => {
            let status = store.status();
            tray.notify(format!(
                "Status: {status}\nVolume: {}%",
                (settings.volume() * 100.0).round() as u32
            ));
        }
        MenuAction::Quit => return false,
    }
    true
}

fn sound_file() -> PathBuf {
    std::env::var_os(SOUND_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(paths::default_sound_file)
}
