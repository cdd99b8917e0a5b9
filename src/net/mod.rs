//! Datagram transports and addressing helpers.

mod address;
mod fake;
mod transport;
mod udp;

pub use self::address::{detect_local_ipv4, reply_destination, subnet_broadcast};
pub use self::fake::{FakeTransport, SentDatagram};
pub use self::transport::Transport;
pub use self::udp::UdpTransport;
