//! Hook-side settings (`hook.toml`).
//!
//! Every field is optional; a missing file yields the defaults, which talk
//! to the tray over loopback on port 12345.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use pulsetray_protocol::constants::{CLIENT_TIMEOUT, CONTROL_PORT};
use serde::Deserialize;

use crate::EmitError;
use crate::policy::{EventPolicy, PolicyAction};
use crate::sink::{BridgeSink, FallbackSink, LoopbackSink, StatusSink};

/// `host` value that resolves the Windows host from inside WSL.
pub const WSL_HOST: &str = "wsl";

const RESOLV_CONF: &str = "/etc/resolv.conf";

/// How status commands leave the hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Loopback,
    Bridge,
    /// Loopback first, bridge if that fails.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
    pub sink: SinkKind,
    /// `[program, args...]`; `{status}` is substituted.
    pub bridge: Vec<String>,
    /// Started detached when delivery fails, e.g. to launch the tray.
    pub autostart: Vec<String>,
    pub policy: HashMap<String, PolicyAction>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::LOCALHOST.to_string(),
            port: CONTROL_PORT,
            timeout_ms: CLIENT_TIMEOUT.as_millis() as u64,
            sink: SinkKind::default(),
            bridge: Vec::new(),
            autostart: Vec::new(),
            policy: HashMap::new(),
        }
    }
}

impl HookConfig {
    /// Loads `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, EmitError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, EmitError> {
        Ok(toml::from_str(content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolves `host`/`port` into the tray's control address.
    pub fn control_addr(&self) -> Result<SocketAddr, EmitError> {
        let ip = match self.host.trim() {
            WSL_HOST => {
                let resolv = std::fs::read_to_string(RESOLV_CONF)?;
                nameserver_from_resolv_conf(&resolv).ok_or_else(|| {
                    EmitError::Config(format!("no nameserver in {RESOLV_CONF}"))
                })?
            }
            "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
            other => other
                .parse()
                .map_err(|_| EmitError::Config(format!("invalid host: {other}")))?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn event_policy(&self) -> EventPolicy {
        EventPolicy::with_overrides(&self.policy)
    }

    /// Builds the configured delivery path.
    pub fn build_sink(&self) -> Result<Box<dyn StatusSink>, EmitError> {
        let loopback = || -> Result<Box<dyn StatusSink>, EmitError> {
            Ok(Box::new(
                LoopbackSink::new(self.control_addr()?).with_timeout(self.timeout()),
            ))
        };

        match self.sink {
            SinkKind::Loopback => loopback(),
            SinkKind::Bridge => Ok(Box::new(BridgeSink::from_command_line(&self.bridge)?)),
            SinkKind::Fallback => Ok(Box::new(FallbackSink::new(
                loopback()?,
                Box::new(BridgeSink::from_command_line(&self.bridge)?),
            ))),
        }
    }
}

/// First `nameserver` entry of a resolv.conf.
pub fn nameserver_from_resolv_conf(content: &str) -> Option<IpAddr> {
    content.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("nameserver") => fields.next()?.parse().ok(),
            _ => None,
        }
    })
}
