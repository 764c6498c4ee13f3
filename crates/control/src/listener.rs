//! Accept loop and per-connection dispatch.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pulsetray_protocol::constants::{READ_BUFFER_SIZE, READ_TIMEOUT};
use pulsetray_protocol::{Command, ConfigReply, Transition};
use pulsetray_settings::ConfigStore;
use pulsetray_status::StatusStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::ControlError;

/// Pending connections the OS may queue while one is being handled.
const BACKLOG: u32 = 16;

/// Pause after a failed `accept` so a persistent error cannot spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// What a single connection did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A status command was applied.
    Status(Transition),
    /// The settings reply was written back.
    ConfigSent(ConfigReply),
    /// The payload was not a known command.
    Ignored(String),
}

/// Long-lived loopback listener for status commands.
///
/// Connections are handled one at a time, in accept order, so status
/// mutations are ordered the same way clients connected.
pub struct ControlListener {
    listener: TcpListener,
    local_addr: SocketAddr,
    store: Arc<StatusStore>,
    settings: Arc<ConfigStore>,
    cancel: CancellationToken,
}

impl ControlListener {
    /// Binds the listening socket.
    ///
    /// Failing to bind is the main operational error: it usually means
    /// another instance already owns the port.
    pub async fn bind(
        addr: SocketAddr,
        store: Arc<StatusStore>,
        settings: Arc<ConfigStore>,
        cancel: CancellationToken,
    ) -> Result<Self, ControlError> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };

        // Lets the port be rebound while closed connections sit in TIME_WAIT.
        // Not set on Windows, where it would allow two live listeners.
        #[cfg(unix)]
        socket.set_reuseaddr(true)?;

        socket
            .bind(addr)
            .map_err(|e| ControlError::from_bind(addr, e))?;
        let listener = socket
            .listen(BACKLOG)
            .map_err(|e| ControlError::from_bind(addr, e))?;
        let local_addr = listener.local_addr()?;

        tracing::info!(%local_addr, "control listener bound");

        Ok(Self {
            listener,
            local_addr,
            store,
            settings,
            cancel,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop until the cancellation token fires.
    ///
    /// The listening socket is closed before this returns.
    pub async fn run(self) -> Result<(), ControlError> {
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    tracing::info!("control listener shutting down");
                    break;
                }

                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            match self.handle_connection(stream).await {
                                Ok(outcome) => tracing::debug!(%peer, ?outcome, "request handled"),
                                Err(e) => tracing::warn!(%peer, "connection error: {e}"),
                            }
                        }
                        Err(e) => {
                            tracing::error!("accept error: {e}");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }
            }
        }

        drop(self.listener);
        tracing::info!(addr = %self.local_addr, "control listener closed");
        Ok(())
    }

    /// Reads one request, applies it, and writes the reply if any.
    async fn handle_connection(&self, mut stream: TcpStream) -> Result<Outcome, ControlError> {
        let mut buf = [0u8; READ_BUFFER_SIZE];

        let n = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ControlError::Timeout),
            result = tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf)) => {
                match result {
                    Ok(Ok(n)) => n,
                    Ok(Err(e)) => return Err(e.into()),
                    Err(_) => return Err(ControlError::Timeout),
                }
            }
        };

        let outcome = self.dispatch(&buf[..n]);

        if let Outcome::ConfigSent(reply) = &outcome {
            let body = reply.to_bytes()?;
            stream.write_all(&body).await?;
            stream.shutdown().await?;
        }

        Ok(outcome)
    }

    /// Applies a raw payload. Unknown payloads change nothing.
    pub fn dispatch(&self, raw: &[u8]) -> Outcome {
        match Command::parse(raw) {
            Ok(Command::SetStatus(status)) => Outcome::Status(self.store.set_status(status)),
            Ok(Command::GetConfig) => Outcome::ConfigSent(ConfigReply {
                logging_enabled: self.settings.logging_enabled(),
            }),
            Err(e) => {
                tracing::debug!("ignoring request: {e}");
                Outcome::Ignored(String::from_utf8_lossy(raw).trim().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pulsetray_protocol::{Status, StatusSnapshot};
    use pulsetray_settings::{Config, SettingsMessage};

    use super::*;

    struct Fixture {
        store: Arc<StatusStore>,
        settings: Arc<ConfigStore>,
        cancel: CancellationToken,
        addr: SocketAddr,
        task: tokio::task::JoinHandle<Result<(), ControlError>>,
        _dir: tempfile::TempDir,
    }

    async fn start() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StatusStore::new());
        let settings = Arc::new(ConfigStore::with_config(
            dir.path().join("config.json"),
            Config::default(),
        ));
        let cancel = CancellationToken::new();

        let listener = ControlListener::bind(
            "127.0.0.1:0".parse().unwrap(),
            Arc::clone(&store),
            Arc::clone(&settings),
            cancel.clone(),
        )
        .await
        .unwrap();
        let addr = listener.local_addr();
        let task = tokio::spawn(listener.run());

        Fixture {
            store,
            settings,
            cancel,
            addr,
            task,
            _dir: dir,
        }
    }

    /// Sends one payload and reads until the server closes.
    async fn send(addr: SocketAddr, payload: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(payload).await.unwrap();
        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.unwrap();
        reply
    }

    #[tokio::test]
    async fn status_commands_update_store() {
        let fx = start().await;

        assert!(send(fx.addr, b"working").await.is_empty());
        let snap = fx.store.read();
        assert_eq!(snap.status, Status::Working);
        assert_eq!(snap.previous, Status::Standby);

        assert!(send(fx.addr, b"standby\n").await.is_empty());
        let snap = fx.store.read();
        assert_eq!(snap.status, Status::Standby);
        assert_eq!(snap.previous, Status::Working);

        fx.cancel.cancel();
        fx.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn ordered_commands_last_one_wins() {
        let fx = start().await;
        let sequence = [
            Status::Working,
            Status::Standby,
            Status::Standby,
            Status::Working,
            Status::Working,
            Status::Standby,
            Status::Working,
        ];

        for status in sequence {
            send(fx.addr, status.as_str().as_bytes()).await;
            assert_eq!(fx.store.status(), status);
        }

        fx.cancel.cancel();
        fx.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn get_config_reflects_latest_toggle() {
        let fx = start().await;

        let reply = send(fx.addr, b"get_config").await;
        let value: serde_json::Value = serde_json::from_slice(&reply).unwrap();
        assert_eq!(value, serde_json::json!({ "logging_enabled": true }));

        fx.settings.apply(SettingsMessage::ToggleLogging);
        let reply = send(fx.addr, b"get_config").await;
        let reply = ConfigReply::from_bytes(&reply).unwrap();
        assert!(!reply.logging_enabled);

        // Status is untouched by queries.
        assert_eq!(fx.store.read(), StatusSnapshot::default());

        fx.cancel.cancel();
        fx.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn unknown_payload_is_ignored() {
        let fx = start().await;
        send(fx.addr, b"working").await;

        assert!(send(fx.addr, b"bogus").await.is_empty());
        assert!(send(fx.addr, b"").await.is_empty());
        assert_eq!(fx.store.status(), Status::Working);
        assert_eq!(fx.store.read().previous, Status::Standby);

        fx.cancel.cancel();
        fx.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn silent_client_does_not_block_shutdown() {
        let fx = start().await;

        // Connect but never send anything.
        let _idle = TcpStream::connect(fx.addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        fx.cancel.cancel();
        let joined = tokio::time::timeout(Duration::from_secs(1), fx.task).await;
        assert!(joined.is_ok(), "listener did not stop within 1s");
    }

    #[tokio::test]
    async fn port_is_released_after_shutdown() {
        let fx = start().await;
        send(fx.addr, b"working").await;

        fx.cancel.cancel();
        fx.task.await.unwrap().unwrap();

        let rebound = ControlListener::bind(
            fx.addr,
            Arc::clone(&fx.store),
            Arc::clone(&fx.settings),
            CancellationToken::new(),
        )
        .await;
        assert!(rebound.is_ok(), "rebind failed: {:?}", rebound.err());
    }

    #[tokio::test]
    async fn second_bind_reports_already_running() {
        let fx = start().await;

        let second = ControlListener::bind(
            fx.addr,
            Arc::clone(&fx.store),
            Arc::clone(&fx.settings),
            CancellationToken::new(),
        )
        .await;
        match second {
            Err(ControlError::AlreadyRunning(addr)) => assert_eq!(addr, fx.addr),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("second bind succeeded"),
        }

        fx.cancel.cancel();
        fx.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn dispatch_ignores_unknown_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StatusStore::new());
        let settings = Arc::new(ConfigStore::with_config(
            dir.path().join("config.json"),
            Config::default(),
        ));
        let listener = ControlListener::bind(
            "127.0.0.1:0".parse().unwrap(),
            Arc::clone(&store),
            settings,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(listener.dispatch(b"nope"), Outcome::Ignored("nope".into()));
        assert_eq!(store.read(), StatusSnapshot::default());
        assert!(matches!(
            listener.dispatch(b"working"),
            Outcome::Status(t) if t.to == Status::Working
        ));
        assert!(matches!(
            listener.dispatch(b"get_config"),
            Outcome::ConfigSent(ConfigReply { logging_enabled: true })
        ));
    }
}
