use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::cli::command::{OutputKind, RunArgs};
use crate::config::NodeConfig;
use crate::engine::Engine;
use crate::error::NodeError;
use crate::hw::{NullDriver, OutputDriver, PreviewDriver};
use crate::net::{Transport, UdpTransport};
use crate::node::{Node, NodeSummary};
use crate::strip::SelfTestConfig;
use crate::terminal::TerminalClient;

use super::node_address;
use super::ui::{NodeSummaryView, Painter};

/// Executes the `run` command.
pub(crate) async fn run<W>(
    args: &RunArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
) -> Result<()>
where
    W: io::Write + Send,
{
    let painter = Painter::new(terminal_client.stdout_is_terminal());
    let config = args
        .config()
        .load()
        .inspect_err(|error| error!(%error, "invalid configuration"))
        .context("failed to load configuration")?;
    let node_ip = node_address(&config).await;
    let engine = config
        .engine_config(node_ip)
        .and_then(Engine::new)
        .inspect_err(|error| error!(%error, "invalid strip configuration"))?;
    let transport = UdpTransport::bind(args.bind()).await?;
    let self_test = if args.skip_self_test() {
        SelfTestConfig::disabled()
    } else {
        config.self_test()
    };
    let cancel = shutdown_token(args.duration());

    let summary = match args.output() {
        OutputKind::Preview => {
            let topology = engine.mapper().topology().clone();
            let format = engine.mapper().format();
            let driver = PreviewDriver::new(topology, format, &mut *out, painter.use_colour());
            serve(engine, transport, driver, &config, node_ip, self_test, cancel).await?
        }
        OutputKind::Null => {
            serve(engine, transport, NullDriver, &config, node_ip, self_test, cancel).await?
        }
    };

    writeln!(out, "{}", NodeSummaryView::new(&summary, &painter))?;
    Ok(())
}

async fn serve<T, D>(
    engine: Engine,
    transport: T,
    driver: D,
    config: &NodeConfig,
    node_ip: Ipv4Addr,
    self_test: SelfTestConfig,
    cancel: CancellationToken,
) -> Result<NodeSummary, NodeError>
where
    T: Transport,
    D: OutputDriver,
{
    let mut node = Node::builder()
        .engine(engine)
        .transport(transport)
        .driver(driver)
        .reply_destination(config.reply_destination(node_ip))
        .sync_mode(config.sync_mode())
        .maybe_stats_interval(config.stats_interval())
        .self_test(self_test)
        .build();
    node.run(cancel).await
}

/// Token cancelled on Ctrl+C or once `duration` has elapsed.
fn shutdown_token(duration: Option<Duration>) -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        let interrupted = async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed while waiting for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };
        let deadline = async {
            match duration {
                Some(duration) => sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            () = interrupted => {}
            () = deadline => {}
        }
        trigger.cancel();
    });
    token
}
