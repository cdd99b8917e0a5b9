use std::io;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, info, instrument, trace};

use crate::artnet::{DiscoveryReply, packet};
use crate::cli::command::SendArgs;
use crate::error::TransportError;
use crate::net::{Transport, UdpTransport};
use crate::protocol::MAX_DATAGRAM_LEN;
use crate::strip::Colour;
use crate::terminal::TerminalClient;

use super::ui::{Painter, ReplyView, SendSummaryView};

/// Executes the `send` command.
pub(crate) async fn run<W>(
    args: &SendArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
) -> Result<()>
where
    W: io::Write,
{
    let painter = Painter::new(terminal_client.stdout_is_terminal());
    let mut transport = UdpTransport::bind(args.bind()).await?;

    let replies = if args.poll() {
        transport
            .send(&packet::encode_poll(), args.target())
            .await?;
        collect_replies(&mut transport, args.poll_wait()).await?
    } else {
        Vec::new()
    };
    for reply in &replies {
        writeln!(out, "{}", ReplyView::new(reply, None, &painter))?;
    }

    let frames = send_frames(&mut transport, args).await?;
    writeln!(
        out,
        "{}",
        SendSummaryView::new(frames, args.target(), args.colour(), replies.len(), &painter)
    )?;
    Ok(())
}

/// Gathers poll replies until `wait` elapses or the transport closes.
#[instrument(skip_all, level = "debug", fields(wait = ?wait))]
async fn collect_replies<T>(
    transport: &mut T,
    wait: Duration,
) -> Result<Vec<DiscoveryReply>, TransportError>
where
    T: Transport,
{
    let deadline = Instant::now() + wait;
    let mut buf = vec![0_u8; MAX_DATAGRAM_LEN];
    let mut replies = Vec::new();
    while let Ok(received) = timeout_at(deadline, transport.receive(&mut buf)).await {
        let Some(len) = received? else {
            break;
        };
        match DiscoveryReply::from_bytes(&buf[..len]) {
            Some(reply) => {
                debug!(ip = %reply.ip(), universe = reply.input_universe(), "poll reply");
                replies.push(reply);
            }
            None => trace!(len, "skipped non-reply datagram"),
        }
    }
    Ok(replies)
}

/// Sends `count` solid-colour frames, each optionally followed by an ArtSync.
#[instrument(skip_all, level = "info", fields(target = %args.target(), universe = args.universe()))]
async fn send_frames<T>(transport: &mut T, args: &SendArgs) -> Result<u32, TransportError>
where
    T: Transport,
{
    let data = solid_frame(args.colour(), args.rgbw(), args.channels());
    let sync = packet::encode_sync();
    for frame in 0..args.count() {
        if frame > 0 {
            sleep(args.interval()).await;
        }
        let datagram = packet::encode_dmx(args.universe(), sequence_for(frame), &data);
        transport.send(&datagram, args.target()).await?;
        if args.sync() {
            transport.send(&sync, args.target()).await?;
        }
    }
    info!(frames = args.count(), "sent");
    Ok(args.count())
}

/// Sequence numbers run 1..=255; zero means "sequencing disabled".
fn sequence_for(frame: u32) -> u8 {
    u8::try_from(frame % 255).map_or(1, |sequence| sequence + 1)
}

/// `channels` bytes of `colour` repeated pixel by pixel.
fn solid_frame(colour: Colour, rgbw: bool, channels: usize) -> Vec<u8> {
    let components = if rgbw { 4 } else { 3 };
    colour.channels()[..components]
        .iter()
        .copied()
        .cycle()
        .take(channels)
        .collect()
}
