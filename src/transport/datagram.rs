//! One-way datagram command transport over UDP.

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use super::Transport;
use crate::error::{AlinkError, Result};

/// Sends one UDP datagram per command record to a fixed destination.
///
/// The channel is unidirectional: there is no inbound path and no
/// acknowledgement. A lost datagram is never retransmitted; control state
/// self-heals on the next periodic tick or heartbeat.
pub struct DatagramTransport {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl DatagramTransport {
    /// Resolve the destination and bind an ephemeral local socket.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the destination does not resolve or the
    /// local socket cannot be bound.
    pub async fn open(host: &str, port: u16) -> Result<Self> {
        let destination = lookup_host((host, port))
            .await
            .map_err(|e| {
                AlinkError::Transport(format!("Failed to resolve {}:{}: {}", host, port, e))
            })?
            .next()
            .ok_or_else(|| {
                AlinkError::Transport(format!("No address found for {}:{}", host, port))
            })?;

        let bind_addr = if destination.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| AlinkError::Transport(format!("Failed to bind UDP socket: {}", e)))?;

        Ok(Self {
            socket,
            destination,
        })
    }

    /// The resolved destination address.
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

#[async_trait]
impl Transport for DatagramTransport {
    async fn send_record(&mut self, record: &str) -> io::Result<()> {
        // Append a newline so line-oriented receivers (e.g. netcat) see a
        // complete line per datagram
        let mut datagram = String::with_capacity(record.len() + 1);
        datagram.push_str(record);
        if !datagram.ends_with('\n') {
            datagram.push('\n');
        }

        self.socket
            .send_to(datagram.as_bytes(), self.destination)
            .await?;

        debug!("Sent {} byte datagram to {}", datagram.len(), self.destination);
        Ok(())
    }
}
