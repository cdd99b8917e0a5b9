use std::io;

use anyhow::{Context, Result};
use tracing::error;

use crate::cli::command::ConfigArgs;
use crate::engine::Engine;
use crate::terminal::TerminalClient;

use super::node_address;
use super::ui::{Painter, ReplyView};

/// Executes the `reply` command.
pub(crate) async fn run<W>(
    args: &ConfigArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
) -> Result<()>
where
    W: io::Write,
{
    let painter = Painter::new(terminal_client.stdout_is_terminal());
    let config = args
        .load()
        .inspect_err(|error| error!(%error, "invalid configuration"))
        .context("failed to load configuration")?;
    let node_ip = node_address(&config).await;
    let engine = config
        .engine_config(node_ip)
        .and_then(Engine::new)
        .inspect_err(|error| error!(%error, "invalid strip configuration"))?;

    let destination = config.reply_destination(node_ip);
    writeln!(
        out,
        "{}",
        ReplyView::new(engine.reply(), Some(destination), &painter)
    )?;
    Ok(())
}
