//! Control-channel client: one request per connection.

use std::net::SocketAddr;
use std::time::Duration;

use pulsetray_protocol::constants::READ_BUFFER_SIZE;
use pulsetray_protocol::{Command, ConfigReply};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::EmitError;

/// Sends `command` and returns whatever the tray wrote back before closing.
///
/// `timeout` bounds the connect and the reply read separately.
pub async fn send_command(
    addr: SocketAddr,
    command: Command,
    timeout: Duration,
) -> Result<Vec<u8>, EmitError> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| EmitError::Timeout)??;

    stream.write_all(command.as_wire().as_bytes()).await?;

    let mut reply = Vec::new();
    if command == Command::GetConfig {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = tokio::time::timeout(timeout, stream.read(&mut buf))
            .await
            .map_err(|_| EmitError::Timeout)??;
        reply.extend_from_slice(&buf[..n]);
    }
    Ok(reply)
}

/// Asks the tray for its settings (`get_config`).
pub async fn query_config(addr: SocketAddr, timeout: Duration) -> Result<ConfigReply, EmitError> {
    let reply = send_command(addr, Command::GetConfig, timeout).await?;
    Ok(ConfigReply::from_bytes(&reply)?)
}
