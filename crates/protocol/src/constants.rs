use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// Fixed loopback port of the control channel.
pub const CONTROL_PORT: u16 = 12345;

/// Receive buffer for one request. Every defined command fits.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Upper bound on how long the listener waits for a client's payload.
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// How long the hook waits on connect and on the `get_config` reply.
pub const CLIENT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default address of the control channel (`127.0.0.1:12345`).
pub fn default_control_addr() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, CONTROL_PORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_is_loopback() {
        let addr = default_control_addr();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 12345);
    }
}
