fn main() {
    println!("Run `cargo test -p relay-e2e` to execute the end-to-end relay tests.");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use pulsetray_control::{ControlError, ControlListener};
    use pulsetray_emitter::client::{query_config, send_command};
    use pulsetray_emitter::{Emitter, EventPolicy, HookEvent, LoopbackSink, PolicyAction};
    use pulsetray_event_log::EventLog;
    use pulsetray_notifier::{PlayFuture, SoundPlayer, TransitionNotifier};
    use pulsetray_protocol::constants::{CLIENT_TIMEOUT, default_control_addr};
    use pulsetray_protocol::{Command, Status, StatusSnapshot};
    use pulsetray_settings::{Config, ConfigStore};
    use pulsetray_status::StatusStore;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio_util::sync::CancellationToken;

    /// Records the volume of every playback request.
    struct RecordingPlayer(mpsc::UnboundedSender<f32>);

    impl SoundPlayer for RecordingPlayer {
        fn play(&self, volume: f32) -> PlayFuture<'_> {
            let _ = self.0.send(volume);
            Box::pin(async { Ok(()) })
        }
    }

    struct Relay {
        addr: SocketAddr,
        store: Arc<StatusStore>,
        cancel: CancellationToken,
        listener: JoinHandle<Result<(), ControlError>>,
        plays: mpsc::UnboundedReceiver<f32>,
        _dir: tempfile::TempDir,
    }

    /// Starts the daemon's listener and notifier on `addr`.
    async fn start_relay(addr: SocketAddr) -> Relay {
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(ConfigStore::with_config(
            dir.path().join("config.json"),
            Config {
                logging_enabled: true,
                volume: 0.75,
            },
        ));
        let store = Arc::new(StatusStore::new());
        let cancel = CancellationToken::new();

        let listener = ControlListener::bind(
            addr,
            Arc::clone(&store),
            Arc::clone(&settings),
            cancel.clone(),
        )
        .await
        .unwrap();
        let addr = listener.local_addr();

        let (tx, plays) = mpsc::unbounded_channel();
        let notifier = TransitionNotifier::new(Arc::new(RecordingPlayer(tx)), settings);
        tokio::spawn(notifier.run(store.completions(), cancel.clone()));

        Relay {
            addr,
            store,
            cancel,
            listener: tokio::spawn(listener.run()),
            plays,
            _dir: dir,
        }
    }

    /// Waits until every earlier connection has been handled.
    ///
    /// Connections are served in accept order, so a `get_config` reply means
    /// everything sent before it has been applied.
    async fn barrier(addr: SocketAddr) {
        query_config(addr, Duration::from_secs(2)).await.unwrap();
    }

    async fn send_raw(addr: SocketAddr, payload: &[u8]) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(payload).await.unwrap();
    }

    async fn no_more_plays(plays: &mut mpsc::UnboundedReceiver<f32>) -> bool {
        tokio::time::timeout(Duration::from_millis(150), plays.recv())
            .await
            .is_err()
    }

    #[tokio::test]
    async fn relay_on_default_port() {
        let mut relay = start_relay(default_control_addr()).await;
        assert_eq!(relay.addr.port(), 12345);

        send_command(relay.addr, Command::SetStatus(Status::Working), CLIENT_TIMEOUT)
            .await
            .unwrap();
        barrier(relay.addr).await;
        assert_eq!(
            relay.store.read(),
            StatusSnapshot {
                status: Status::Working,
                previous: Status::Standby,
            }
        );

        send_command(relay.addr, Command::SetStatus(Status::Standby), CLIENT_TIMEOUT)
            .await
            .unwrap();
        barrier(relay.addr).await;
        assert_eq!(
            relay.store.read(),
            StatusSnapshot {
                status: Status::Standby,
                previous: Status::Working,
            }
        );

        let volume = tokio::time::timeout(Duration::from_secs(1), relay.plays.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(volume, 0.75);
        assert!(no_more_plays(&mut relay.plays).await);

        send_raw(relay.addr, b"bogus").await;
        barrier(relay.addr).await;
        assert_eq!(relay.store.status(), Status::Standby);
        assert_eq!(relay.store.read().previous, Status::Working);
        assert!(no_more_plays(&mut relay.plays).await);

        relay.cancel.cancel();
        relay.listener.await.unwrap().unwrap();

        // The port is free again straight after shutdown.
        let rebound = ControlListener::bind(
            default_control_addr(),
            Arc::new(StatusStore::new()),
            Arc::new(ConfigStore::with_config(
                relay._dir.path().join("config.json"),
                Config::default(),
            )),
            CancellationToken::new(),
        )
        .await;
        assert!(rebound.is_ok(), "rebind failed: {:?}", rebound.err());
    }

    #[tokio::test]
    async fn standby_while_standby_is_silent() {
        let mut relay = start_relay("127.0.0.1:0".parse().unwrap()).await;

        send_command(relay.addr, Command::SetStatus(Status::Standby), CLIENT_TIMEOUT)
            .await
            .unwrap();
        barrier(relay.addr).await;

        assert_eq!(relay.store.read(), StatusSnapshot::default());
        assert!(no_more_plays(&mut relay.plays).await);
        relay.cancel.cancel();
    }

    #[tokio::test]
    async fn hook_events_drive_the_tray() {
        let mut relay = start_relay("127.0.0.1:0".parse().unwrap()).await;
        let log_dir = tempfile::tempdir().unwrap();

        let mut emitter = Emitter::new(
            Box::new(LoopbackSink::new(relay.addr)),
            EventPolicy::default(),
            EventLog::open(log_dir.path().join("events.log"), false),
        )
        .with_control_addr(relay.addr, CLIENT_TIMEOUT);
        assert!(emitter.refresh_logging().await);

        let steps = [
            ("UserPromptSubmit", PolicyAction::Working, Status::Working),
            ("PreToolUse", PolicyAction::Working, Status::Working),
            ("PostToolUse", PolicyAction::Keep, Status::Working),
            ("Stop", PolicyAction::Standby, Status::Standby),
        ];
        for (name, action, expected) in steps {
            assert_eq!(emitter.handle(&HookEvent::new(name)).await, action, "{name}");
            barrier(relay.addr).await;
            assert_eq!(relay.store.status(), expected, "after {name}");
        }

        tokio::time::timeout(Duration::from_secs(1), relay.plays.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(no_more_plays(&mut relay.plays).await);

        let log = std::fs::read_to_string(log_dir.path().join("events.log")).unwrap();
        assert_eq!(log.lines().filter(|l| l.contains("Event: Stop")).count(), 3);

        relay.cancel.cancel();
        relay.listener.await.unwrap().unwrap();
    }
}
