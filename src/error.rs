use std::path::PathBuf;

use derive_more::From;
use thiserror::Error;

/// Errors returned while validating node configuration.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one strip must be configured")]
    NoStrips,
    #[error("strip {strip} has zero pixels")]
    EmptyStrip { strip: usize },
    #[error("a strip of {length} pixels does not fit the {stride}-pixel stride")]
    StripExceedsStride { length: usize, stride: usize },
    #[error("strips need {required} frame-buffer bytes but only {capacity} are available")]
    BufferTooSmall { required: usize, capacity: usize },
    #[error("{strips} strips of {stride} pixels exceed the {max}-pixel buffer limit")]
    TopologyTooLarge {
        strips: usize,
        stride: usize,
        max: usize,
    },
    #[error("a frame buffer of {pixels} pixels exceeds the {max}-pixel limit")]
    BufferTooLarge { pixels: usize, max: usize },
    #[error("{strips} strips are configured but only {max} outputs are available")]
    TooManyStrips { strips: usize, max: usize },
    #[error("channel count must be between 1 and 512, got {channels}")]
    InvalidChannelCount { channels: usize },
    #[error("datagram limits {min}..={max} are invalid")]
    InvalidDatagramLimits { min: usize, max: usize },
    #[error("a colour order cannot be combined with RGBW strips")]
    ColourOrderWithRgbw,
    #[error("`{field}` is required")]
    MissingField { field: &'static str },
    #[error("`local_ip` is required when `use_dhcp` is false")]
    MissingLocalIp,
    #[error("`stats_interval_ms` must be greater than zero")]
    ZeroStatsInterval,
    #[error("no `receiver_config_*.json` file was found in {}", directory.display())]
    NoConfigFile { directory: PathBuf },
    #[error("no platform configuration directory is available")]
    NoConfigDirectory,
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors returned when parsing a colour argument.
#[derive(Debug, Error, PartialEq)]
pub enum ColourParseError {
    #[error("colour `{value}` must be 6 or 8 hexadecimal digits")]
    Length { value: String },
    #[error("colour `{value}` is not hexadecimal")]
    Hex {
        value: String,
        source: hex::FromHexError,
    },
}

/// Errors returned by LED output drivers.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output driver was used before `begin`")]
    NotStarted,
    #[error("failed to write frame")]
    Io(#[from] std::io::Error),
}

/// Errors returned by datagram transports.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind UDP socket on {address}")]
    Bind {
        address: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("failed to receive datagram")]
    Receive { source: std::io::Error },
    #[error("failed to send datagram to {destination}")]
    Send {
        destination: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("failed to enable broadcast")]
    Broadcast { source: std::io::Error },
}

/// Errors returned by telemetry initialisation.
#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Top-level node errors wrapping module-specific error types.
#[derive(Debug, Error, From)]
pub enum NodeError {
    #[error(transparent)]
    #[from(ConfigError, Box<ConfigError>)]
    Config(Box<ConfigError>),
    #[error(transparent)]
    #[from(TransportError, Box<TransportError>)]
    Transport(Box<TransportError>),
    #[error(transparent)]
    #[from(OutputError, Box<OutputError>)]
    Output(Box<OutputError>),
}
