use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use bon::Builder;
use serde::Deserialize;
use strum_macros::{Display, EnumString};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, trace, warn};

use crate::artnet::{Classification, DatagramLimits};
use crate::engine::Engine;
use crate::error::NodeError;
use crate::hw::OutputDriver;
use crate::net::Transport;
use crate::protocol::ARTNET_PORT;
use crate::strip::{SelfTest, SelfTestConfig};

/// Receive buffer size; one Ethernet MTU, so oversized datagrams still reach
/// the dispatcher's size check instead of being silently cut to fit.
const RECEIVE_BUFFER_LEN: usize = 1500;
const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(1);
const LIMITED_BROADCAST: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::BROADCAST), ARTNET_PORT);

/// When an accepted DMX frame reaches the LEDs.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Redisplay on every accepted frame.
    #[default]
    Immediate,
    /// Hold accepted frames until an ArtSync arrives.
    Deferred,
}

/// Totals for one node run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct NodeSummary {
    /// Datagrams received.
    pub packets: u64,
    /// ArtDmx frames accepted.
    pub dmx_frames: u64,
    /// Discovery replies sent.
    pub poll_replies: u64,
    /// ArtSync packets received.
    pub syncs: u64,
    /// Datagrams ignored for any reason.
    pub ignored: u64,
    /// Frames pushed to the output driver.
    pub redisplays: u64,
}

/// Traffic logged once per stats interval.
#[derive(Debug, Default, Eq, PartialEq)]
struct IntervalCounters {
    /// Datagrams inside the size window.
    packets: u64,
    dmx_frames: u64,
}

impl IntervalCounters {
    fn record_datagram(&mut self, len: usize, limits: DatagramLimits) {
        if limits.contains(len) {
            self.packets += 1;
        }
    }
}

enum Event {
    Cancelled,
    StatsDue,
    Received(Option<usize>),
}

/// Art-Net node: receives datagrams, drives the engine and the LEDs.
#[derive(Debug, Builder)]
pub struct Node<T, D> {
    engine: Engine,
    transport: T,
    driver: D,
    /// Where poll replies are sent.
    #[builder(default = LIMITED_BROADCAST)]
    reply_destination: SocketAddr,
    #[builder(default)]
    sync_mode: SyncMode,
    /// How often traffic counters are logged and reset.
    #[builder(default = DEFAULT_STATS_INTERVAL)]
    stats_interval: Duration,
    /// Self-test shown before live data; skipped by default.
    #[builder(default = SelfTestConfig::disabled())]
    self_test: SelfTestConfig,
}

impl<T, D> Node<T, D>
where
    T: Transport,
    D: OutputDriver,
{
    /// Initialises the driver, runs the self-test and then serves Art-Net
    /// until `cancel` fires or the transport closes.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport or output driver fails.
    #[instrument(
        skip_all,
        level = "info",
        name = "node",
        fields(universe = self.engine.universe(), sync_mode = %self.sync_mode)
    )]
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<NodeSummary, NodeError> {
        self.driver.begin()?;
        if self.self_test.enabled() {
            SelfTest::new(self.self_test)
                .run(self.engine.mapper_mut(), &mut self.driver)
                .await?;
            self.engine.mapper_mut().reset();
        }

        let mut buf = vec![0_u8; RECEIVE_BUFFER_LEN];
        let mut summary = NodeSummary::default();
        let mut counters = IntervalCounters::default();
        let mut frame_pending = false;
        let period = if self.stats_interval.is_zero() {
            warn!(
                fallback = ?DEFAULT_STATS_INTERVAL,
                "stats interval must be non-zero"
            );
            DEFAULT_STATS_INTERVAL
        } else {
            self.stats_interval
        };
        let mut stats = interval(period);
        stats.set_missed_tick_behavior(MissedTickBehavior::Delay);
        stats.tick().await;

        info!(destination = %self.reply_destination, "node running");
        loop {
            let event = tokio::select! {
                biased;
                () = cancel.cancelled() => Event::Cancelled,
                _ = stats.tick() => Event::StatsDue,
                received = self.transport.receive(&mut buf) => Event::Received(received?),
            };

            let len = match event {
                Event::Cancelled => {
                    info!("node cancelled");
                    break;
                }
                Event::StatsDue => {
                    info!(
                        packets = counters.packets,
                        dmx_frames = counters.dmx_frames,
                        "traffic"
                    );
                    counters = IntervalCounters::default();
                    continue;
                }
                Event::Received(None) => {
                    info!("transport closed");
                    break;
                }
                Event::Received(Some(len)) => len,
            };

            summary.packets += 1;
            counters.record_datagram(len, self.engine.datagram_limits());
            match self.engine.classify(&buf[..len]) {
                Classification::NeedsPollReply => {
                    self.transport
                        .send(self.engine.discovery_reply(), self.reply_destination)
                        .await?;
                    summary.poll_replies += 1;
                    trace!("answered poll");
                }
                Classification::DmxAccepted => {
                    summary.dmx_frames += 1;
                    counters.dmx_frames += 1;
                    self.engine.update_frame();
                    match self.sync_mode {
                        SyncMode::Immediate => {
                            self.driver.redisplay(self.engine.frame_buffer())?;
                            summary.redisplays += 1;
                        }
                        SyncMode::Deferred => frame_pending = true,
                    }
                }
                Classification::NeedsSyncAction => {
                    summary.syncs += 1;
                    if self.sync_mode == SyncMode::Deferred && frame_pending {
                        self.driver.redisplay(self.engine.frame_buffer())?;
                        summary.redisplays += 1;
                        frame_pending = false;
                    }
                }
                Classification::Ignored(reason) => {
                    summary.ignored += 1;
                    trace!(%reason, "ignored datagram");
                }
            }
        }

        Ok(summary)
    }

    /// Engine state.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Output driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Configured sync mode.
    #[must_use]
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::artnet::packet;
    use crate::engine::EngineConfig;
    use crate::hw::RecordingDriver;
    use crate::net::FakeTransport;

    fn engine() -> Engine {
        Engine::new(
            EngineConfig::builder()
                .universe(0)
                .channels(3)
                .strips(vec![1])
                .build(),
        )
        .expect("engine config should be valid")
    }

    #[tokio::test]
    async fn immediate_mode_redisplays_every_frame() -> anyhow::Result<()> {
        let transport = FakeTransport::builder()
            .datagrams(vec![
                packet::encode_dmx(0, 1, &[1, 2, 3]),
                packet::encode_dmx(0, 2, &[4, 5, 6]),
            ])
            .build();
        let mut node = Node::builder()
            .engine(engine())
            .transport(transport)
            .driver(RecordingDriver::default())
            .build();

        let summary = node.run(CancellationToken::new()).await?;

        assert_eq!(2, summary.redisplays);
        assert_eq!(Some(&[4, 5, 6][..]), node.driver().last_frame().map(|f| &f[..3]));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn zero_stats_interval_falls_back_to_the_default() -> anyhow::Result<()> {
        let transport = FakeTransport::builder()
            .datagrams(vec![packet::encode_dmx(0, 1, &[1, 2, 3])])
            .build();
        let mut node = Node::builder()
            .engine(engine())
            .transport(transport)
            .driver(RecordingDriver::default())
            .stats_interval(Duration::ZERO)
            .build();

        let summary = node.run(CancellationToken::new()).await?;

        assert_eq!(1, summary.dmx_frames);
        Ok(())
    }

    #[test]
    fn interval_packets_skip_datagrams_outside_the_size_window() {
        let limits = DatagramLimits::default();
        let mut counters = IntervalCounters::default();

        for len in [4, 10, 18, 530, 531, 1500] {
            counters.record_datagram(len, limits);
        }

        assert_eq!(3, counters.packets);
    }

    #[tokio::test]
    async fn cancellation_stops_an_open_transport() -> anyhow::Result<()> {
        let transport = FakeTransport::builder().hold_open(true).build();
        let mut node = Node::builder()
            .engine(engine())
            .transport(transport)
            .driver(RecordingDriver::default())
            .build();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = node.run(cancel).await?;

        assert_eq!(NodeSummary::default(), summary);
        assert!(node.driver().begun());
        Ok(())
    }
}
