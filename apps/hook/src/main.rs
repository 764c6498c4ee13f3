//! pulsetray hook entry point.
//!
//! Invoked by the automation tool with one JSON event on stdin. Whatever
//! happens, the process exits 0 so the tool is never blocked by pulsetray.

use std::io::Read;

use anyhow::Context;
use pulsetray_emitter::event::UNKNOWN_EVENT;
use pulsetray_emitter::{Emitter, HookConfig, HookEvent};
use pulsetray_event_log::{EventLog, EventLogEntry, Level};
use pulsetray_settings::paths;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout belongs to the automation tool.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        tracing::error!("hook failed: {e:#}");
        record_failure(&EventLog::open(paths::event_log_file(), true), &e);
    }
}

/// Best-effort event-log line for a failure before any event was handled.
fn record_failure(log: &EventLog, error: &anyhow::Error) -> bool {
    let entry = EventLogEntry::new(
        Level::Error,
        UNKNOWN_EVENT,
        format!("Hook handler error: {error:#}"),
    );
    log.append(&entry)
}

fn run() -> anyhow::Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading event from stdin")?;
    let event = HookEvent::from_json(&input).context("parsing event")?;

    let config_path = paths::hook_config_file();
    let config = HookConfig::load(&config_path).unwrap_or_else(|e| {
        tracing::warn!(path = %config_path.display(), "ignoring hook config: {e}");
        HookConfig::default()
    });

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut emitter = Emitter::from_config(&config, paths::event_log_file())?;
        emitter.refresh_logging().await;
        let action = emitter.handle(&event).await;
        tracing::debug!(event = event.name(), ?action, "event handled");
        anyhow::Ok(())
    })
}
