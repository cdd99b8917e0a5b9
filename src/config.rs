use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use serde_with::{DisplayFromStr, DurationMilliSeconds, serde_as};
use tracing::{debug, info, instrument};

use crate::artnet::{DatagramLimits, MacAddress, SequenceCheck};
use crate::engine::{DEFAULT_MAX_STRIPS, EngineConfig};
use crate::error::ConfigError;
use crate::net::reply_destination;
use crate::node::SyncMode;
use crate::protocol::{MAX_DATAGRAM_LEN, MIN_DATAGRAM_LEN};
use crate::strip::{ColourOrder, PixelFormat, SelfTestConfig};

const CONFIG_FILE_PREFIX: &str = "receiver_config_";
const CONFIG_FILE_SUFFIX: &str = ".json";
const DEFAULT_LEDS_PER_STRING: usize = 5;

/// Node settings read from a `receiver_config_*.json` file.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    universe: Option<u16>,
    channels: Option<usize>,
    /// Explicit strip lengths in wiring order.
    strips: Option<Vec<usize>>,
    /// Number of equal-length strings, used when `strips` is absent.
    strings: Option<usize>,
    #[serde(default = "default_leds_per_string")]
    leds_per_string: usize,
    strip_stride: Option<usize>,
    #[serde(default)]
    is_rgbw: bool,
    #[serde(alias = "color_order")]
    colour_order: Option<ColourOrder>,
    buffer_pixels: Option<usize>,
    /// Physical strip outputs on the bus.
    max_strips: Option<usize>,
    #[serde(default)]
    use_dhcp: bool,
    local_ip: Option<Ipv4Addr>,
    netmask: Option<Ipv4Addr>,
    broadcast: Option<Ipv4Addr>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    mac: Option<MacAddress>,
    short_name: Option<String>,
    long_name: Option<String>,
    #[serde(default)]
    sequence_check: SequenceCheck,
    #[serde(default)]
    sync_mode: SyncMode,
    min_packet_len: Option<usize>,
    max_packet_len: Option<usize>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default, rename = "stats_interval_ms")]
    stats_interval: Option<Duration>,
    #[serde(default)]
    self_test: SelfTestSection,
}

#[serde_as]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct SelfTestSection {
    enabled: Option<bool>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default, rename = "chase_step_ms")]
    chase_step: Option<Duration>,
    flash_count: Option<usize>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default, rename = "flash_interval_ms")]
    flash_interval: Option<Duration>,
    flash_level: Option<u8>,
}

fn default_leds_per_string() -> usize {
    DEFAULT_LEDS_PER_STRING
}

impl NodeConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, is not valid JSON, or
    /// fails validation.
    #[instrument(skip_all, level = "info", fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(universe = ?config.universe, channels = ?config.channels, "loaded configuration");
        Ok(config)
    }

    /// Parses and validates configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or fails validation.
    ///
    /// ```
    /// use artstrip::NodeConfig;
    ///
    /// let config = NodeConfig::from_json(
    ///     r#"{ "universe": 1, "channels": 30, "strings": 2, "use_dhcp": true }"#,
    /// )?;
    /// assert_eq!(vec![5, 5], config.strip_lengths()?);
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the fields every node needs.
    ///
    /// # Errors
    ///
    /// Returns the first violated requirement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_none() {
            return Err(ConfigError::MissingField { field: "universe" });
        }
        let Some(channels) = self.channels else {
            return Err(ConfigError::MissingField { field: "channels" });
        };
        if channels == 0 || channels > crate::protocol::MAX_DMX_CHANNELS {
            return Err(ConfigError::InvalidChannelCount { channels });
        }
        let strips = self.strip_lengths()?.len();
        let max = self.max_strips.unwrap_or(DEFAULT_MAX_STRIPS);
        if strips > max {
            return Err(ConfigError::TooManyStrips { strips, max });
        }
        self.pixel_format()?;
        if !self.use_dhcp && self.local_ip.is_none() {
            return Err(ConfigError::MissingLocalIp);
        }
        if self.stats_interval == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroStatsInterval);
        }
        Ok(())
    }

    /// Strip lengths, expanding `strings × leds_per_string` when no explicit
    /// list is given.
    ///
    /// # Errors
    ///
    /// Returns an error when neither form is present.
    pub fn strip_lengths(&self) -> Result<Vec<usize>, ConfigError> {
        match (&self.strips, self.strings) {
            (Some(strips), _) if !strips.is_empty() => Ok(strips.clone()),
            (_, Some(strings)) if strings > 0 => Ok(vec![self.leds_per_string; strings]),
            _ => Err(ConfigError::NoStrips),
        }
    }

    /// Pixel format from `is_rgbw` and `colour_order`.
    ///
    /// # Errors
    ///
    /// Returns an error when a colour order is given for RGBW strips.
    pub fn pixel_format(&self) -> Result<PixelFormat, ConfigError> {
        match (self.is_rgbw, self.colour_order) {
            (true, Some(_)) => Err(ConfigError::ColourOrderWithRgbw),
            (true, None) => Ok(PixelFormat::Rgbw),
            (false, order) => Ok(PixelFormat::Rgb(order.unwrap_or_default())),
        }
    }

    /// Whether the node should discover its own address.
    #[must_use]
    pub fn use_dhcp(&self) -> bool {
        self.use_dhcp
    }

    /// Statically configured node address.
    #[must_use]
    pub fn local_ip(&self) -> Option<Ipv4Addr> {
        self.local_ip
    }

    /// Destination of poll replies.
    #[must_use]
    pub fn reply_destination(&self, node_ip: Ipv4Addr) -> SocketAddr {
        let ip = (!node_ip.is_unspecified()).then_some(node_ip);
        reply_destination(self.broadcast, ip, self.netmask)
    }

    /// Sync behaviour.
    #[must_use]
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Statistics logging period, if overridden.
    #[must_use]
    pub fn stats_interval(&self) -> Option<Duration> {
        self.stats_interval
    }

    /// Engine settings for a node reachable at `node_ip`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn engine_config(&self, node_ip: Ipv4Addr) -> Result<EngineConfig, ConfigError> {
        self.validate()?;
        let universe = self
            .universe
            .ok_or(ConfigError::MissingField { field: "universe" })?;
        let channels = self
            .channels
            .ok_or(ConfigError::MissingField { field: "channels" })?;
        let limits = DatagramLimits::new(
            self.min_packet_len.unwrap_or(MIN_DATAGRAM_LEN),
            self.max_packet_len.unwrap_or(MAX_DATAGRAM_LEN),
        );

        Ok(EngineConfig::builder()
            .universe(universe)
            .channels(channels)
            .strips(self.strip_lengths()?)
            .maybe_stride(self.strip_stride)
            .format(self.pixel_format()?)
            .maybe_buffer_pixels(self.buffer_pixels)
            .maybe_max_strips(self.max_strips)
            .limits(limits)
            .sequence_check(self.sequence_check)
            .ip(node_ip)
            .maybe_mac(self.mac)
            .maybe_short_name(self.short_name.clone())
            .maybe_long_name(self.long_name.clone())
            .build())
    }

    /// Self-test settings; unspecified fields keep their defaults.
    #[must_use]
    pub fn self_test(&self) -> SelfTestConfig {
        let section = self.self_test;
        SelfTestConfig::builder()
            .maybe_enabled(section.enabled)
            .maybe_chase_step(section.chase_step)
            .maybe_flash_count(section.flash_count)
            .maybe_flash_interval(section.flash_interval)
            .maybe_flash_level(section.flash_level)
            .build()
    }
}

/// Platform configuration directory searched when no path is given.
///
/// # Errors
///
/// Returns an error when the platform exposes no home directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("org", "artstrip", "artstrip")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDirectory)
}

/// First `receiver_config_*.json` file in `directory`, by file name.
///
/// # Errors
///
/// Returns an error when the directory cannot be read or holds no matching
/// file.
#[instrument(skip_all, level = "debug", fields(directory = %directory.display()))]
pub fn discover_config(directory: &Path) -> Result<PathBuf, ConfigError> {
    let entries = fs::read_dir(directory).map_err(|source| ConfigError::Read {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_config_file_name(path))
        .collect();
    candidates.sort();
    debug!(found = candidates.len(), "configuration candidates");

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::NoConfigFile {
            directory: directory.to_path_buf(),
        })
}

fn is_config_file_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            name.starts_with(CONFIG_FILE_PREFIX) && name.ends_with(CONFIG_FILE_SUFFIX)
        })
}
