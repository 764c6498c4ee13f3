//! Event handling: log, map, deliver.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use pulsetray_event_log::{EventLog, EventLogEntry, Level};
use pulsetray_protocol::constants::CLIENT_TIMEOUT;

use crate::EmitError;
use crate::client::query_config;
use crate::config::HookConfig;
use crate::event::HookEvent;
use crate::policy::{EventPolicy, PolicyAction};
use crate::sink::StatusSink;

pub struct Emitter {
    sink: Box<dyn StatusSink>,
    policy: EventPolicy,
    log: EventLog,
    autostart: Vec<String>,
    control_addr: Option<SocketAddr>,
    timeout: Duration,
}

impl Emitter {
    pub fn new(sink: Box<dyn StatusSink>, policy: EventPolicy, log: EventLog) -> Self {
        Self {
            sink,
            policy,
            log,
            autostart: Vec::new(),
            control_addr: None,
            timeout: CLIENT_TIMEOUT,
        }
    }

    /// Builds the emitter described by `config`, logging to `log_path`.
    ///
    /// The tray address is only required by the loopback paths; a bridge-only
    /// setup with an unresolvable host still gets an emitter.
    pub fn from_config(
        config: &HookConfig,
        log_path: impl Into<PathBuf>,
    ) -> Result<Self, EmitError> {
        let sink = config.build_sink()?;
        let mut emitter = Self::new(sink, config.event_policy(), EventLog::open(log_path, true))
            .with_autostart(config.autostart.clone());
        emitter.timeout = config.timeout();
        emitter.control_addr = config.control_addr().ok();
        Ok(emitter)
    }

    /// Command started detached when delivery fails.
    pub fn with_autostart(mut self, command: Vec<String>) -> Self {
        self.autostart = command;
        self
    }

    /// Tray address used for `get_config`.
    pub fn with_control_addr(mut self, addr: SocketAddr, timeout: Duration) -> Self {
        self.control_addr = Some(addr);
        self.timeout = timeout;
        self
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Asks the tray whether to write the event log.
    ///
    /// An unreachable tray leaves logging on so failures are still recorded.
    pub async fn refresh_logging(&mut self) -> bool {
        let Some(addr) = self.control_addr else {
            return self.log.enabled();
        };
        let enabled = match query_config(addr, self.timeout).await {
            Ok(reply) => reply.logging_enabled,
            Err(e) => {
                tracing::debug!("get_config failed, keeping event log on: {e}");
                true
            }
        };
        self.log.set_enabled(enabled);
        enabled
    }

    /// Handles one event and returns what the policy decided.
    ///
    /// Delivery failures are logged, never returned.
    pub async fn handle(&self, event: &HookEvent) -> PolicyAction {
        let name = event.name();
        self.record(
            event,
            Level::Info,
            format!("Received event: {name}, Tool: {}", event.tool().unwrap_or("none")),
        );

        let action = self.policy.resolve(name);
        let Some(status) = action.status() else {
            self.record(event, Level::Info, format!("Keeping status for event: {name}"));
            return action;
        };

        self.record(event, Level::Info, format!("Setting status to {status} for event: {name}"));

        match self.sink.send(status).await {
            Ok(()) => {
                self.record(
                    event,
                    Level::Info,
                    format!("Status sent via {}: {status}", self.sink.name()),
                );
            }
            Err(e) => {
                tracing::warn!(sink = self.sink.name(), "failed to send {status}: {e}");
                self.record(event, Level::Error, format!("Failed to send status: {e}"));
                self.spawn_autostart(event);
            }
        }
        action
    }

    fn spawn_autostart(&self, event: &HookEvent) {
        let Some((program, args)) = self.autostart.split_first() else {
            return;
        };
        let spawned = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => self.record(event, Level::Info, format!("Attempted to start tray: {program}")),
            Err(e) => self.record(event, Level::Error, format!("Failed to start tray: {e}")),
        }
    }

    fn record(&self, event: &HookEvent, level: Level, message: String) {
        let entry = EventLogEntry::new(level, event.name(), message).with_tool(event.tool());
        self.log.append(&entry);
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::sink::LoopbackSink;

    async fn capture_one(listener: TcpListener) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = String::new();
        stream.read_to_string(&mut received).await.unwrap();
        received
    }

    fn emitter_for(addr: SocketAddr, dir: &tempfile::TempDir) -> Emitter {
        Emitter::new(
            Box::new(LoopbackSink::new(addr)),
            EventPolicy::default(),
            EventLog::open(dir.path().join("events.log"), true),
        )
    }

    fn log_text(dir: &tempfile::TempDir) -> String {
        std::fs::read_to_string(dir.path().join("events.log")).unwrap_or_default()
    }

    #[tokio::test]
    async fn stop_sends_standby_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(capture_one(listener));

        let action = emitter_for(addr, &dir).handle(&HookEvent::new("Stop")).await;
        assert_eq!(action, PolicyAction::Standby);
        assert_eq!(server.await.unwrap(), "standby");

        let log = log_text(&dir);
        assert!(log.contains("[INFO] Event: Stop"));
        assert!(log.contains("Status sent via loopback: standby"));
    }

    #[tokio::test]
    async fn keep_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let event = HookEvent {
            hook_event_name: Some("PostToolUse".into()),
            tool_name: Some("Bash".into()),
        };
        let action = emitter_for(addr, &dir).handle(&event).await;
        assert_eq!(action, PolicyAction::Keep);

        let accepted =
            tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
        assert!(accepted.is_err(), "no connection expected");
        assert!(log_text(&dir).contains("Event: PostToolUse, Tool: Bash"));
    }

    #[tokio::test]
    async fn delivery_failure_is_logged_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let action = emitter_for(addr, &dir)
            .handle(&HookEvent::new("UserPromptSubmit"))
            .await;
        assert_eq!(action, PolicyAction::Working);
        assert!(log_text(&dir).contains("[ERROR] Event: UserPromptSubmit - Failed to send status"));
    }

    #[tokio::test]
    async fn refresh_logging_follows_tray() {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = stream.read(&mut buf).await.unwrap();
            stream.write_all(br#"{"logging_enabled": false}"#).await.unwrap();
        });

        let mut emitter =
            emitter_for(addr, &dir).with_control_addr(addr, Duration::from_millis(500));
        assert!(!emitter.refresh_logging().await);
        assert!(!emitter.log().enabled());

        // Disabled log: nothing written even though handling still runs.
        emitter.handle(&HookEvent::new("Notification")).await;
        assert!(log_text(&dir).is_empty());
    }

    #[tokio::test]
    async fn unreachable_tray_keeps_logging_on() {
        let dir = tempfile::tempdir().unwrap();
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let mut emitter =
            emitter_for(addr, &dir).with_control_addr(addr, Duration::from_millis(200));
        assert!(emitter.refresh_logging().await);
    }
}
