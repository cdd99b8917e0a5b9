use std::net::Ipv4Addr;

use bon::Builder;
use tracing::{debug, info, instrument, warn};

use crate::artnet::{
    ArtnetDispatcher, Classification, DISCOVERY_REPLY_LEN, DatagramLimits, DiscoveryReply,
    MacAddress, SequenceCheck, SequenceState,
};
use crate::error::ConfigError;
use crate::protocol::MAX_DMX_CHANNELS;
use crate::strip::{FrameBuffer, PixelFormat, StripMapper, StripTopology};

/// Physical strip outputs on one bus unless configured otherwise.
pub const DEFAULT_MAX_STRIPS: usize = 24;

/// Everything needed to bind one output bus to one universe.
#[derive(Debug, Clone, Builder)]
pub struct EngineConfig {
    /// Universe this bus listens to.
    universe: u16,
    /// Channels copied out of every accepted ArtDmx frame.
    channels: usize,
    /// Strip lengths in wiring order.
    strips: Vec<usize>,
    /// Reserved pixels per strip; defaults to the longest strip.
    stride: Option<usize>,
    #[builder(default)]
    format: PixelFormat,
    /// Frame-buffer capacity in pixels; defaults to `strips × stride`.
    buffer_pixels: Option<usize>,
    /// Physical outputs available on the bus.
    #[builder(default = DEFAULT_MAX_STRIPS)]
    max_strips: usize,
    #[builder(default)]
    limits: DatagramLimits,
    #[builder(default)]
    sequence_check: SequenceCheck,
    /// Address reported in discovery replies.
    #[builder(default = Ipv4Addr::UNSPECIFIED)]
    ip: Ipv4Addr,
    #[builder(default)]
    mac: MacAddress,
    #[builder(into)]
    short_name: Option<String>,
    #[builder(into)]
    long_name: Option<String>,
}

impl EngineConfig {
    /// Universe this bus listens to.
    #[must_use]
    pub fn universe(&self) -> u16 {
        self.universe
    }

    /// Configured channel count.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Configured pixel format.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

/// Art-Net ingestion and strip mapping for one output bus.
///
/// Owns the dispatcher, the mapper with its frame buffer, and the discovery
/// reply built at startup. Nothing here is shared; run one engine per bus.
#[derive(Debug)]
pub struct Engine {
    dispatcher: ArtnetDispatcher,
    mapper: StripMapper,
    reply: DiscoveryReply,
}

impl Engine {
    /// Validates `config` and allocates the frame buffer.
    ///
    /// # Errors
    ///
    /// Returns an error when the channel count, datagram limits or strip
    /// layout are inconsistent, or when there are more strips than outputs.
    ///
    /// ```
    /// use artstrip::{Engine, EngineConfig};
    ///
    /// let engine = Engine::new(
    ///     EngineConfig::builder()
    ///         .universe(0)
    ///         .channels(12)
    ///         .strips(vec![4])
    ///         .build(),
    /// )?;
    /// assert_eq!(239, engine.discovery_reply().len());
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    #[instrument(
        skip_all,
        level = "info",
        fields(universe = config.universe, channels = config.channels)
    )]
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let EngineConfig {
            universe,
            channels,
            strips,
            stride,
            format,
            buffer_pixels,
            max_strips,
            limits,
            sequence_check,
            ip,
            mac,
            short_name,
            long_name,
        } = config;

        if channels == 0 || channels > MAX_DMX_CHANNELS {
            return Err(ConfigError::InvalidChannelCount { channels });
        }
        if limits.min_len() > limits.max_len() {
            return Err(ConfigError::InvalidDatagramLimits {
                min: limits.min_len(),
                max: limits.max_len(),
            });
        }

        if strips.len() > max_strips {
            return Err(ConfigError::TooManyStrips {
                strips: strips.len(),
                max: max_strips,
            });
        }

        let topology = StripTopology::new(strips, stride)?;
        let capacity = buffer_pixels.unwrap_or_else(|| topology.reserved_pixels());
        let pixel_count = topology.pixel_count();
        let mapper = StripMapper::new(topology, format, capacity)?;

        let covered = channels / format.bytes_per_pixel();
        if covered < pixel_count {
            warn!(
                covered,
                pixel_count,
                "channel data does not cover every configured pixel"
            );
        } else if covered > pixel_count {
            debug!(
                covered,
                pixel_count,
                "channel data extends past the configured pixels"
            );
        }

        let dispatcher = ArtnetDispatcher::new(universe, channels)
            .with_limits(limits)
            .with_sequence_policy(sequence_check.policy());
        let reply = DiscoveryReply::builder()
            .ip(ip)
            .universe(universe)
            .mac(mac)
            .maybe_short_name(short_name)
            .maybe_long_name(long_name)
            .build();

        info!(%format, %sequence_check, pixel_count, "engine ready");
        Ok(Self {
            dispatcher,
            mapper,
            reply,
        })
    }

    /// Classifies one datagram; see [`ArtnetDispatcher::classify`].
    pub fn classify(&mut self, datagram: &[u8]) -> Classification {
        self.dispatcher.classify(datagram)
    }

    /// Maps the last accepted channel array onto the strips and returns the
    /// pixels written.
    pub fn update_frame(&mut self) -> usize {
        self.mapper.update(self.dispatcher.channels())
    }

    /// Maps caller-supplied channel data onto the strips.
    pub fn update_frame_from(&mut self, channels: &[u8]) -> usize {
        self.mapper.update(channels)
    }

    /// Wire bytes of the discovery reply.
    #[must_use]
    pub fn discovery_reply(&self) -> &[u8; DISCOVERY_REPLY_LEN] {
        self.reply.as_bytes()
    }

    /// Parsed view of the discovery reply.
    #[must_use]
    pub fn reply(&self) -> &DiscoveryReply {
        &self.reply
    }

    /// Frame buffer handed to the output driver.
    #[must_use]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        self.mapper.buffer()
    }

    /// Mapper for direct pixel writes such as the self-test.
    pub fn mapper_mut(&mut self) -> &mut StripMapper {
        &mut self.mapper
    }

    /// Mapper.
    #[must_use]
    pub fn mapper(&self) -> &StripMapper {
        &self.mapper
    }

    /// Channel values from the last accepted ArtDmx frame.
    #[must_use]
    pub fn channels(&self) -> &[u8] {
        self.dispatcher.channels()
    }

    /// Datagram size window applied before classification.
    #[must_use]
    pub fn datagram_limits(&self) -> DatagramLimits {
        self.dispatcher.limits()
    }

    /// Sequence bookkeeping.
    #[must_use]
    pub fn sequence_state(&self) -> SequenceState {
        self.dispatcher.sequence_state()
    }

    /// Configured universe.
    #[must_use]
    pub fn universe(&self) -> u16 {
        self.dispatcher.universe()
    }
}
