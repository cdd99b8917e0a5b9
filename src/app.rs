use std::io;

use anyhow::Result;
use tracing::instrument;

use crate::cli::{Command, LogLevel};
use crate::telemetry;
use crate::terminal::{SystemTerminalClient, TerminalClient};

const SERVICE_NAME: &str = "artstrip";

/// Runs the CLI command against the current terminal.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// let args = artstrip::Args::try_parse_from([
///     "artstrip",
///     "send",
///     "--target",
///     "127.0.0.1:6454",
///     "--channels",
///     "3",
/// ])?;
/// let mut out = Vec::new();
/// artstrip::run(args.into_command(), &mut out).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, configuration is
/// invalid, the network fails, or output writing fails.
pub async fn run<W>(command: Command, out: &mut W) -> Result<()>
where
    W: io::Write + Send,
{
    run_with_log_level(command, out, None).await
}

/// Runs the CLI command with an explicit telemetry log-level override.
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, configuration is
/// invalid, the network fails, or output writing fails.
pub async fn run_with_log_level<W>(
    command: Command,
    out: &mut W,
    log_level: Option<LogLevel>,
) -> Result<()>
where
    W: io::Write + Send,
{
    run_with_clients_and_log_level(command, out, &SystemTerminalClient, log_level).await
}

/// Runs the CLI command with an injected terminal client.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// struct FakeTerminal;
/// impl artstrip::TerminalClient for FakeTerminal {
///     fn stdout_is_terminal(&self) -> bool { false }
///     fn stderr_is_terminal(&self) -> bool { false }
/// }
///
/// let args = artstrip::Args::try_parse_from([
///     "artstrip",
///     "--log-level",
///     "off",
///     "reply",
///     "--config",
///     "receiver_config_stage.json",
/// ])?;
/// let log_level = args.log_level();
/// let mut out = Vec::new();
/// artstrip::run_with_clients_and_log_level(
///     args.into_command(),
///     &mut out,
///     &FakeTerminal,
///     log_level,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, configuration is
/// invalid, the network fails, or output writing fails.
#[instrument(
    skip(out, terminal_client),
    level = "info",
    fields(command = %command.name(), ?log_level)
)]
pub async fn run_with_clients_and_log_level<W>(
    command: Command,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    log_level: Option<LogLevel>,
) -> Result<()>
where
    W: io::Write + Send,
{
    telemetry::initialise_tracing(
        SERVICE_NAME,
        terminal_client.stderr_is_terminal(),
        log_level.map(LogLevel::as_level_filter),
    )?;

    match command {
        Command::Run(args) => crate::cli::run::run(&args, out, terminal_client).await,
        Command::Reply(args) => crate::cli::reply::run(&args, out, terminal_client).await,
        Command::SelfTest(args) => crate::cli::self_test::run(&args, out, terminal_client).await,
        Command::Send(args) => crate::cli::send::run(&args, out, terminal_client).await,
    }
}
