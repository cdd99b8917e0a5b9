use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

use crate::artnet::DiscoveryReply;
use crate::utils::hex_dump;

use super::painter::Painter;
use super::table::FieldTable;

/// Renders a discovery reply with its decoded fields and wire bytes.
pub(crate) struct ReplyView<'a> {
    reply: &'a DiscoveryReply,
    destination: Option<SocketAddr>,
    painter: &'a Painter,
}

impl<'a> ReplyView<'a> {
    pub(crate) fn new(
        reply: &'a DiscoveryReply,
        destination: Option<SocketAddr>,
        painter: &'a Painter,
    ) -> Self {
        Self {
            reply,
            destination,
            painter,
        }
    }
}

impl Display for ReplyView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut rows = vec![
            ("ip", self.painter.value(self.reply.ip().to_string())),
            ("port", self.reply.port().to_string()),
            ("universe", self.painter.value(self.reply.input_universe().to_string())),
            ("mac", self.reply.mac().to_string()),
            ("short_name", self.reply.short_name().to_string()),
            ("long_name", self.reply.long_name().to_string()),
            ("node_report", self.reply.node_report().to_string()),
        ];
        if let Some(destination) = self.destination {
            rows.push(("sent_to", self.painter.value(destination.to_string())));
        }

        write!(f, "{}", self.painter.heading("Discovery reply:"))?;
        write!(f, "\n{}", FieldTable::new(self.painter, rows))?;
        write!(f, "\n{}", self.painter.heading("Wire bytes:"))?;
        for row in hex_dump(self.reply.as_bytes()) {
            write!(f, "\n{}", self.painter.muted(row))?;
        }
        Ok(())
    }
}
