use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use crate::config::{NodeConfig, default_config_dir, discover_config};
use crate::error::ConfigError;
use crate::protocol::ARTNET_PORT;
use crate::strip::Colour;

const DEFAULT_SEND_INTERVAL: &str = "40ms";
const DEFAULT_POLL_WAIT: &str = "1s";

/// Command-line options for the Art-Net strip receiver.
#[derive(Debug, Parser)]
#[command(
    name = "artstrip",
    about = "Receive Art-Net and drive multi-strip LED output."
)]
pub struct Args {
    /// Overrides `RUST_LOG` for this run.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            log_level: None,
            command,
        }
    }

    /// Sets the log-level override.
    #[must_use]
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = Some(log_level);
        self
    }

    /// Log-level override, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Consumes the arguments and returns the selected command.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Equivalent tracing filter.
    #[must_use]
    pub fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Listen for Art-Net and drive the configured strips until Ctrl+C.
    Run(RunArgs),
    /// Print the discovery reply this node would broadcast.
    Reply(ConfigArgs),
    /// Run the wiring self-test against the terminal preview.
    SelfTest(SelfTestArgs),
    /// Send Art-Net test traffic to a node.
    Send(SendArgs),
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Run(_args) => "run",
            Self::Reply(_args) => "reply",
            Self::SelfTest(_args) => "self-test",
            Self::Send(_args) => "send",
        }
    }
}

/// Where the node configuration comes from.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Configuration file to load.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory searched for the first `receiver_config_*.json`.
    #[arg(long, conflicts_with = "config")]
    config_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Loads configuration from an explicit file.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config: Some(path.into()),
            config_dir: None,
        }
    }

    /// Searches `directory` for a configuration file.
    #[must_use]
    pub fn from_dir(directory: impl Into<PathBuf>) -> Self {
        Self {
            config: None,
            config_dir: Some(directory.into()),
        }
    }

    /// Resolves and loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when no file is found or the file is invalid.
    pub fn load(&self) -> Result<NodeConfig, ConfigError> {
        let path = match (&self.config, &self.config_dir) {
            (Some(path), _) => path.clone(),
            (None, Some(directory)) => discover_config(directory)?,
            (None, None) => discover_config(&default_config_dir()?)?,
        };
        NodeConfig::load(&path)
    }
}

/// Output used by `run`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputKind {
    /// Render frames to the terminal.
    #[default]
    Preview,
    /// Discard frames.
    Null,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Local address to listen on.
    #[arg(long, default_value_t = SocketAddr::from((Ipv4Addr::UNSPECIFIED, ARTNET_PORT)))]
    bind: SocketAddr,
    /// Frame output.
    #[arg(long, value_enum, default_value_t = OutputKind::Preview)]
    output: OutputKind,
    /// Skips the startup self-test.
    #[arg(long)]
    skip_self_test: bool,
    /// Stops after this long (e.g. `30s`); runs until Ctrl+C otherwise.
    #[arg(long, value_parser = parse_duration)]
    duration: Option<Duration>,
}

impl RunArgs {
    /// Creates `run` arguments for `config` with defaults elsewhere.
    #[must_use]
    pub fn new(config: ConfigArgs) -> Self {
        Self {
            config,
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, ARTNET_PORT)),
            output: OutputKind::Preview,
            skip_self_test: false,
            duration: None,
        }
    }

    pub(crate) fn config(&self) -> &ConfigArgs {
        &self.config
    }

    pub(crate) fn bind(&self) -> SocketAddr {
        self.bind
    }

    pub(crate) fn output(&self) -> OutputKind {
        self.output
    }

    pub(crate) fn skip_self_test(&self) -> bool {
        self.skip_self_test
    }

    pub(crate) fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Arguments for the `self-test` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SelfTestArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Overrides the delay after each chase frame (e.g. `20ms`).
    #[arg(long, value_parser = parse_duration)]
    chase_step: Option<Duration>,
    /// Overrides the number of flash frames.
    #[arg(long)]
    flash_count: Option<usize>,
}

impl SelfTestArgs {
    /// Creates `self-test` arguments using the configured timing.
    #[must_use]
    pub fn new(config: ConfigArgs) -> Self {
        Self {
            config,
            chase_step: None,
            flash_count: None,
        }
    }

    /// Overrides the chase step.
    #[must_use]
    pub fn with_chase_step(mut self, chase_step: Duration) -> Self {
        self.chase_step = Some(chase_step);
        self
    }

    /// Overrides the flash count.
    #[must_use]
    pub fn with_flash_count(mut self, flash_count: usize) -> Self {
        self.flash_count = Some(flash_count);
        self
    }

    pub(crate) fn config(&self) -> &ConfigArgs {
        &self.config
    }

    pub(crate) fn chase_step(&self) -> Option<Duration> {
        self.chase_step
    }

    pub(crate) fn flash_count(&self) -> Option<usize> {
        self.flash_count
    }
}

/// Arguments for the `send` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SendArgs {
    /// Local address to send from; bind port 6454 to hear poll replies.
    #[arg(long, default_value_t = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))]
    bind: SocketAddr,
    /// Node or broadcast address to send to.
    #[arg(long, default_value_t = SocketAddr::from((Ipv4Addr::BROADCAST, ARTNET_PORT)))]
    target: SocketAddr,
    /// Universe written into every ArtDmx frame.
    #[arg(long, default_value_t = 0)]
    universe: u16,
    /// Channels per frame.
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u16).range(1..=512))]
    channels: u16,
    /// Solid colour as `RRGGBB` or `RRGGBBWW`.
    #[arg(long, default_value = "ff0000")]
    colour: Colour,
    /// Packs four channels per pixel instead of three.
    #[arg(long)]
    rgbw: bool,
    /// Number of frames to send.
    #[arg(long, default_value_t = 1)]
    count: u32,
    /// Delay between frames.
    #[arg(long, default_value = DEFAULT_SEND_INTERVAL, value_parser = parse_duration)]
    interval: Duration,
    /// Follows every frame with an ArtSync.
    #[arg(long)]
    sync: bool,
    /// Sends an ArtPoll first and prints the replies.
    #[arg(long)]
    poll: bool,
    /// How long to collect poll replies.
    #[arg(long, default_value = DEFAULT_POLL_WAIT, value_parser = parse_duration)]
    poll_wait: Duration,
}

impl SendArgs {
    pub(crate) fn bind(&self) -> SocketAddr {
        self.bind
    }

    pub(crate) fn target(&self) -> SocketAddr {
        self.target
    }

    pub(crate) fn universe(&self) -> u16 {
        self.universe
    }

    pub(crate) fn channels(&self) -> usize {
        usize::from(self.channels)
    }

    pub(crate) fn colour(&self) -> Colour {
        self.colour
    }

    pub(crate) fn rgbw(&self) -> bool {
        self.rgbw
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn sync(&self) -> bool {
        self.sync
    }

    pub(crate) fn poll(&self) -> bool {
        self.poll
    }

    pub(crate) fn poll_wait(&self) -> Duration {
        self.poll_wait
    }
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn global_log_level_is_accepted_after_subcommand() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["artstrip", "reply", "--log-level", "debug"])?;

        assert_eq!(Some(LogLevel::Debug), args.log_level());
        assert_matches!(args.into_command(), Command::Reply(_));
        Ok(())
    }

    #[test]
    fn send_defaults_target_broadcast() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["artstrip", "send", "--colour", "#00ff00"])?;

        let Command::Send(send) = args.into_command() else {
            panic!("expected send command");
        };
        assert_eq!(
            SocketAddr::from((Ipv4Addr::BROADCAST, 6454)),
            send.target()
        );
        assert_eq!(Colour::GREEN, send.colour());
        assert_eq!(Duration::from_millis(40), send.interval());
        assert_eq!(512, send.channels());
        Ok(())
    }

    #[test]
    fn send_rejects_oversized_channel_count() {
        assert!(Args::try_parse_from(["artstrip", "send", "--channels", "513"]).is_err());
    }

    #[test]
    fn run_parses_duration_and_output() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "artstrip",
            "run",
            "--config",
            "receiver_config_a.json",
            "--output",
            "null",
            "--duration",
            "2s",
        ])?;

        let Command::Run(run) = args.into_command() else {
            panic!("expected run command");
        };
        assert_eq!(OutputKind::Null, run.output());
        assert_eq!(Some(Duration::from_secs(2)), run.duration());
        Ok(())
    }

    #[test]
    fn config_and_config_dir_conflict() {
        assert!(
            Args::try_parse_from([
                "artstrip",
                "reply",
                "--config",
                "a.json",
                "--config-dir",
                "."
            ])
            .is_err()
        );
    }
}
