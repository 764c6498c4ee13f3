//! Status delivery backends.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use pulsetray_protocol::constants::CLIENT_TIMEOUT;
use pulsetray_protocol::{Command, Status};

use crate::EmitError;
use crate::client::send_command;

/// A boxed future returned by [`StatusSink::send`].
pub type SinkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), EmitError>> + Send + 'a>>;

/// Upper bound on a bridge helper's runtime.
pub const BRIDGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder replaced by the status name in bridge arguments.
pub const STATUS_PLACEHOLDER: &str = "{status}";

/// Delivers a status command to the tray.
pub trait StatusSink: Send + Sync {
    fn send(&self, status: Status) -> SinkFuture<'_>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

/// Direct loopback TCP delivery.
#[derive(Debug, Clone)]
pub struct LoopbackSink {
    addr: SocketAddr,
    timeout: Duration,
}

impl LoopbackSink {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: CLIENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl StatusSink for LoopbackSink {
    fn send(&self, status: Status) -> SinkFuture<'_> {
        Box::pin(async move {
            send_command(self.addr, Command::SetStatus(status), self.timeout).await?;
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "loopback"
    }
}

/// Delivery through a helper process on the far side of an OS/VM boundary,
/// e.g. `powershell.exe -File bridge.ps1 -Status {status}` from WSL.
#[derive(Debug, Clone)]
pub struct BridgeSink {
    program: String,
    args: Vec<String>,
}

impl BridgeSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a sink from `[program, args...]`.
    pub fn from_command_line(command: &[String]) -> Result<Self, EmitError> {
        match command.split_first() {
            Some((program, args)) if !program.is_empty() => Ok(Self::new(program, args.to_vec())),
            _ => Err(EmitError::Config("bridge command is empty".into())),
        }
    }

    /// Arguments with the status substituted in.
    pub fn args_for(&self, status: Status) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(STATUS_PLACEHOLDER, status.as_str()))
            .collect()
    }
}

impl StatusSink for BridgeSink {
    fn send(&self, status: Status) -> SinkFuture<'_> {
        Box::pin(async move {
            let run = tokio::process::Command::new(&self.program)
                .args(self.args_for(status))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status();

            let exit = tokio::time::timeout(BRIDGE_TIMEOUT, run)
                .await
                .map_err(|_| EmitError::Timeout)?
                .map_err(|e| EmitError::Bridge(format!("failed to run {}: {e}", self.program)))?;

            if !exit.success() {
                return Err(EmitError::Bridge(format!("{} exited with {exit}", self.program)));
            }
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "bridge"
    }
}

/// Tries `primary`, then `secondary` if the first one failed.
pub struct FallbackSink {
    primary: Box<dyn StatusSink>,
    secondary: Box<dyn StatusSink>,
}

impl FallbackSink {
    pub fn new(primary: Box<dyn StatusSink>, secondary: Box<dyn StatusSink>) -> Self {
        Self { primary, secondary }
    }
}

impl StatusSink for FallbackSink {
    fn send(&self, status: Status) -> SinkFuture<'_> {
        Box::pin(async move {
            match self.primary.send(status).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    tracing::debug!(
                        primary = self.primary.name(),
                        "primary sink failed, falling back: {e}"
                    );
                    self.secondary.send(status).await
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
