use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::time::sleep;

use super::transport::Transport;
use crate::error::TransportError;

/// Datagram handed to [`FakeTransport::send`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SentDatagram {
    pub bytes: Vec<u8>,
    pub destination: SocketAddr,
}

/// Scripted transport used in tests and dry runs.
///
/// Hands out the scripted datagrams in order, waiting `interval` before each,
/// then reports the transport closed (or blocks forever when `hold_open` is
/// set, leaving shutdown to cancellation).
#[derive(Debug, Builder)]
pub struct FakeTransport {
    #[builder(default, into)]
    datagrams: VecDeque<Vec<u8>>,
    #[builder(default)]
    interval: Duration,
    #[builder(default)]
    hold_open: bool,
    #[builder(skip)]
    sent: Vec<SentDatagram>,
}

impl FakeTransport {
    /// Datagrams sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[SentDatagram] {
        &self.sent
    }

    /// Scripted datagrams not yet received.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.datagrams.len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>, TransportError> {
        if self.datagrams.is_empty() {
            if self.hold_open {
                std::future::pending::<()>().await;
            }
            return Ok(None);
        }
        // Dequeue only after the wait; receive must stay cancel-safe.
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
        let Some(datagram) = self.datagrams.pop_front() else {
            return Ok(None);
        };

        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok(Some(len))
    }

    async fn send(&mut self, bytes: &[u8], destination: SocketAddr) -> Result<(), TransportError> {
        self.sent.push(SentDatagram {
            bytes: bytes.to_vec(),
            destination,
        });
        Ok(())
    }
}
