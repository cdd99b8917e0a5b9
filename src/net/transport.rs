use std::net::SocketAddr;

use async_trait::async_trait;

use crate::error::TransportError;

/// Datagram transport the node receives from and replies through.
#[async_trait]
pub trait Transport: Send {
    /// Waits for the next datagram and copies it into `buf`.
    ///
    /// Returns `Ok(None)` once the transport is closed. Datagrams longer than
    /// `buf` are truncated.
    async fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>, TransportError>;

    /// Sends one datagram to `destination`.
    async fn send(&mut self, bytes: &[u8], destination: SocketAddr) -> Result<(), TransportError>;
}
