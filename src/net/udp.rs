use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::{info, instrument, trace};

use super::transport::Transport;
use crate::error::TransportError;

/// Broadcast-capable UDP socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds `address` and enables broadcast sends.
    ///
    /// # Errors
    ///
    /// Returns an error when the socket cannot be bound or configured.
    #[instrument(level = "info")]
    pub async fn bind(address: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(address)
            .await
            .map_err(|source| TransportError::Bind { address, source })?;
        socket
            .set_broadcast(true)
            .map_err(|source| TransportError::Broadcast { source })?;
        info!(local = ?socket.local_addr().ok(), "listening for Art-Net");
        Ok(Self { socket })
    }

    /// Address the socket is bound to.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>, TransportError> {
        let (len, peer) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(|source| TransportError::Receive { source })?;
        trace!(len, %peer, "received datagram");
        Ok(Some(len))
    }

    async fn send(&mut self, bytes: &[u8], destination: SocketAddr) -> Result<(), TransportError> {
        self.socket
            .send_to(bytes, destination)
            .await
            .map_err(|source| TransportError::Send {
                destination,
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn loopback_datagrams_round_trip() -> anyhow::Result<()> {
        let any_port = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let mut receiver = UdpTransport::bind(any_port).await?;
        let mut sender = UdpTransport::bind(any_port).await?;
        let destination = receiver
            .local_addr()
            .ok_or_else(|| anyhow::anyhow!("receiver has no local address"))?;

        sender.send(b"Art-Net\0", destination).await?;
        let mut buf = [0_u8; 32];
        let len = receiver.receive(&mut buf).await?;

        assert_eq!(Some(8), len);
        assert_eq!(b"Art-Net\0", &buf[..8]);
        Ok(())
    }
}
