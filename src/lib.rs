//! Art-Net receiver that maps one DMX universe onto several LED strips.

mod app;
mod artnet;
mod cli;
mod config;
mod engine;
mod error;
mod hw;
pub mod net;
mod node;
mod protocol;
mod strip;
mod telemetry;
mod terminal;
mod utils;

pub use app::{run, run_with_clients_and_log_level, run_with_log_level};
pub use artnet::{
    AcceptAll, ArtnetDispatcher, Classification, DISCOVERY_REPLY_LEN, DatagramLimits,
    DiscoveryReply, IgnoreReason, InboundFrame, MacAddress, SequenceCheck, SequencePolicy,
    SequenceState, WrappingSequence, packet,
};
pub use cli::{Args, Command, ConfigArgs, LogLevel, OutputKind, RunArgs, SelfTestArgs, SendArgs};
pub use config::{NodeConfig, default_config_dir, discover_config};
pub use engine::{DEFAULT_MAX_STRIPS, Engine, EngineConfig};
pub use error::{ColourParseError, ConfigError, NodeError, OutputError, TransportError};
pub use hw::{NullDriver, OutputDriver, PreviewDriver, RecordingDriver};
pub use node::{Node, NodeSummary, SyncMode};
pub use protocol::{
    ARTNET_PORT, ARTNET_SIGNATURE, DMX_DATA_OFFSET, MAX_DATAGRAM_LEN, MAX_DMX_CHANNELS,
    MIN_DATAGRAM_LEN, OpCode, PROTOCOL_VERSION,
};
pub use strip::{
    Colour, ColourOrder, FrameBuffer, PixelFormat, PixelLocation, SelfTest, SelfTestConfig,
    SelfTestSummary, StripMapper, StripTopology,
};
pub use terminal::TerminalClient;
