use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

use crate::node::NodeSummary;
use crate::strip::{Colour, SelfTestSummary};

use super::painter::Painter;

/// Renders the totals of a node run.
pub(crate) struct NodeSummaryView<'a> {
    summary: &'a NodeSummary,
    painter: &'a Painter,
}

impl<'a> NodeSummaryView<'a> {
    pub(crate) fn new(summary: &'a NodeSummary, painter: &'a Painter) -> Self {
        Self { summary, painter }
    }
}

impl Display for NodeSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        let frames = if summary.dmx_frames > 0 {
            let frames = format!("{} DMX frame(s)", summary.dmx_frames);
            self.painter.success(frames)
        } else {
            self.painter.warning("no DMX frames")
        };
        let packets = format!("from {} packet(s)", summary.packets);
        write!(
            f,
            "{} {} {} {}",
            self.painter.heading("Stopped:"),
            frames,
            self.painter.value(packets),
            self.painter.muted(format!(
                "(polls {}, syncs {}, ignored {}, redisplays {})",
                summary.poll_replies, summary.syncs, summary.ignored, summary.redisplays
            ))
        )
    }
}

/// Renders the result of a self-test run.
pub(crate) struct SelfTestSummaryView<'a> {
    summary: &'a SelfTestSummary,
    painter: &'a Painter,
}

impl<'a> SelfTestSummaryView<'a> {
    pub(crate) fn new(summary: &'a SelfTestSummary, painter: &'a Painter) -> Self {
        Self { summary, painter }
    }
}

impl Display for SelfTestSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.painter.success("Self-test complete:"),
            self.painter.value(format!(
                "{} chase frame(s), {} flash frame(s)",
                self.summary.chase_frames, self.summary.flash_frames
            ))
        )
    }
}

/// Renders what the `send` command transmitted.
pub(crate) struct SendSummaryView<'a> {
    frames: u32,
    target: SocketAddr,
    colour: Colour,
    replies: usize,
    painter: &'a Painter,
}

impl<'a> SendSummaryView<'a> {
    pub(crate) fn new(
        frames: u32,
        target: SocketAddr,
        colour: Colour,
        replies: usize,
        painter: &'a Painter,
    ) -> Self {
        Self {
            frames,
            target,
            colour,
            replies,
            painter,
        }
    }
}

impl Display for SendSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.painter.heading("Sent:"),
            self.painter.value(format!("{} frame(s)", self.frames)),
            self.painter.swatch(self.colour),
            self.painter.muted(format!("to {}", self.target))
        )?;
        if self.replies > 0 {
            write!(
                f,
                " {}",
                self.painter
                    .success(format!("({} poll reply(ies))", self.replies))
            )?;
        }
        Ok(())
    }
}
