mod discovery_reply;
mod dispatcher;
mod frame;
pub mod packet;
mod sequence;

pub use self::discovery_reply::{DISCOVERY_REPLY_LEN, DiscoveryReply, MacAddress};
pub use self::dispatcher::{ArtnetDispatcher, Classification, DatagramLimits, IgnoreReason};
pub use self::frame::InboundFrame;
pub use self::sequence::{
    AcceptAll, SequenceCheck, SequencePolicy, SequenceState, WrappingSequence,
};
