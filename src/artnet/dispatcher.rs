use strum_macros::Display;
use tracing::{debug, instrument, trace, warn};

use super::frame::InboundFrame;
use super::sequence::{AcceptAll, SequencePolicy, SequenceState};
use crate::protocol::{
    ARTNET_SIGNATURE, DMX_DATA_OFFSET, MAX_DATAGRAM_LEN, MIN_DATAGRAM_LEN, OpCode,
};
use crate::utils::format_hex;

/// Outcome of classifying one inbound datagram.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Classification {
    /// An ArtPoll arrived; the caller should broadcast the discovery reply.
    NeedsPollReply,
    /// An ArtSync arrived; the caller decides whether to redisplay.
    NeedsSyncAction,
    /// An ArtDmx frame for this universe was copied into the channel array.
    DmxAccepted,
    /// The datagram is not for this node or is malformed.
    Ignored(IgnoreReason),
}

/// Why a datagram was ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub enum IgnoreReason {
    /// Shorter than the configured minimum datagram size.
    #[strum(to_string = "too_short")]
    TooShort,
    /// Longer than the configured maximum datagram size.
    #[strum(to_string = "too_long")]
    TooLong,
    /// Leading bytes are not `"Art-Net\0"`.
    #[strum(to_string = "bad_signature")]
    BadSignature,
    /// Op-code outside the handled set.
    #[strum(to_string = "unknown_op_code")]
    UnknownOpCode(u16),
    /// Discovery reply broadcast by another node.
    #[strum(to_string = "peer_poll_reply")]
    PeerPollReply,
    /// ArtDmx shorter than its 18-byte header.
    #[strum(to_string = "short_header")]
    ShortHeader,
    /// ArtDmx for a different universe.
    #[strum(to_string = "wrong_universe")]
    WrongUniverse,
    /// Declared ArtDmx length is below the configured channel count.
    #[strum(to_string = "insufficient_channels")]
    InsufficientChannels,
    /// Datagram is shorter than the header plus the declared length.
    #[strum(to_string = "truncated")]
    Truncated,
    /// Sequence number rejected by the sequence policy.
    #[strum(to_string = "stale_sequence")]
    StaleSequence,
}

/// Datagram size window outside which traffic is ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DatagramLimits {
    min_len: usize,
    max_len: usize,
}

impl DatagramLimits {
    /// Creates a size window.
    #[must_use]
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// Smallest accepted datagram.
    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Largest accepted datagram.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Whether a datagram of `len` bytes falls inside the window.
    #[must_use]
    pub fn contains(&self, len: usize) -> bool {
        (self.min_len..=self.max_len).contains(&len)
    }
}

impl Default for DatagramLimits {
    fn default() -> Self {
        Self::new(MIN_DATAGRAM_LEN, MAX_DATAGRAM_LEN)
    }
}

/// Classifies Art-Net datagrams and extracts DMX payloads for one universe.
#[derive(Debug)]
pub struct ArtnetDispatcher {
    universe: u16,
    channels: Vec<u8>,
    limits: DatagramLimits,
    sequence_policy: Box<dyn SequencePolicy>,
    sequence_state: SequenceState,
}

impl ArtnetDispatcher {
    /// Creates a dispatcher for `universe` holding `channel_count` channels.
    ///
    /// The channel count is validated by the engine configuration before it
    /// reaches here.
    #[must_use]
    pub fn new(universe: u16, channel_count: usize) -> Self {
        Self {
            universe,
            channels: vec![0; channel_count],
            limits: DatagramLimits::default(),
            sequence_policy: Box::new(AcceptAll),
            sequence_state: SequenceState::default(),
        }
    }

    /// Overrides the datagram size window.
    #[must_use]
    pub fn with_limits(mut self, limits: DatagramLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Installs a sequence policy.
    #[must_use]
    pub fn with_sequence_policy(mut self, policy: Box<dyn SequencePolicy>) -> Self {
        self.sequence_policy = policy;
        self
    }

    /// Configured universe.
    #[must_use]
    pub fn universe(&self) -> u16 {
        self.universe
    }

    /// Channel values from the last accepted ArtDmx frame.
    #[must_use]
    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    /// Datagram size window.
    #[must_use]
    pub fn limits(&self) -> DatagramLimits {
        self.limits
    }

    /// Sequence bookkeeping.
    #[must_use]
    pub fn sequence_state(&self) -> SequenceState {
        self.sequence_state
    }

    /// Classifies one datagram.
    ///
    /// Only an accepted ArtDmx frame mutates the dispatcher: the channel array
    /// is overwritten and the sequence state advances.
    ///
    /// ```
    /// use artstrip::{ArtnetDispatcher, Classification, packet};
    ///
    /// let mut dispatcher = ArtnetDispatcher::new(0, 3);
    /// let datagram = packet::encode_dmx(0, 1, &[10, 20, 30]);
    /// assert_eq!(Classification::DmxAccepted, dispatcher.classify(&datagram));
    /// assert_eq!(&[10, 20, 30], dispatcher.channels());
    /// ```
    #[instrument(skip(self, datagram), level = "trace", fields(len = datagram.len()))]
    pub fn classify(&mut self, datagram: &[u8]) -> Classification {
        let frame = InboundFrame::new(datagram);

        if frame.len() < self.limits.min_len() {
            trace!("datagram below minimum size");
            return Classification::Ignored(IgnoreReason::TooShort);
        }
        if frame.len() > self.limits.max_len() {
            trace!("datagram above maximum size");
            return Classification::Ignored(IgnoreReason::TooLong);
        }
        if !frame.has_signature() {
            let prefix = &datagram[..datagram.len().min(ARTNET_SIGNATURE.len())];
            debug!(prefix = %format_hex(prefix), "received non Art-Net packet");
            return Classification::Ignored(IgnoreReason::BadSignature);
        }
        let Some(raw_op_code) = frame.op_code() else {
            return Classification::Ignored(IgnoreReason::TooShort);
        };

        match OpCode::from_value(raw_op_code) {
            Some(OpCode::Poll) => Classification::NeedsPollReply,
            Some(OpCode::Sync) => Classification::NeedsSyncAction,
            Some(OpCode::PollReply) => Classification::Ignored(IgnoreReason::PeerPollReply),
            Some(OpCode::Dmx) => self.accept_dmx(frame),
            None => {
                debug!(op_code = raw_op_code, "unhandled Art-Net op-code");
                Classification::Ignored(IgnoreReason::UnknownOpCode(raw_op_code))
            }
        }
    }

    fn accept_dmx(&mut self, frame: InboundFrame<'_>) -> Classification {
        let (Some(universe), Some(declared), Some(sequence)) =
            (frame.universe(), frame.declared_length(), frame.sequence())
        else {
            warn!(len = frame.len(), "DMX packet too small to contain full header");
            return Classification::Ignored(IgnoreReason::ShortHeader);
        };
        if universe != self.universe {
            trace!(universe, "DMX packet for another universe");
            return Classification::Ignored(IgnoreReason::WrongUniverse);
        }

        let declared = usize::from(declared);
        if declared < self.channels.len() {
            warn!(
                declared,
                channels = self.channels.len(),
                "not enough DMX data to write"
            );
            return Classification::Ignored(IgnoreReason::InsufficientChannels);
        }
        if frame.len() < DMX_DATA_OFFSET + declared {
            warn!(
                declared,
                len = frame.len(),
                "DMX payload truncated or corrupted"
            );
            return Classification::Ignored(IgnoreReason::Truncated);
        }
        if !self
            .sequence_policy
            .accepts(self.sequence_state.last_sequence(), sequence)
        {
            debug!(
                sequence,
                previous = ?self.sequence_state.last_sequence(),
                "DMX packet out of sequence"
            );
            return Classification::Ignored(IgnoreReason::StaleSequence);
        }

        let data = &frame.dmx_data()[..self.channels.len()];
        self.channels.copy_from_slice(data);
        self.sequence_state.advance(sequence, universe);
        Classification::DmxAccepted
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::artnet::packet;
    use crate::artnet::sequence::WrappingSequence;

    fn dispatcher() -> ArtnetDispatcher {
        ArtnetDispatcher::new(0, 6)
    }

    #[rstest]
    #[case::empty(0)]
    #[case::signature_only(8)]
    #[case::below_floor(9)]
    fn datagrams_below_floor_are_ignored(#[case] len: usize) {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_poll()[..len].to_vec();

        assert_eq!(
            Classification::Ignored(IgnoreReason::TooShort),
            dispatcher.classify(&datagram)
        );
        assert_eq!(&[0; 6], dispatcher.channels());
    }

    #[test]
    fn oversized_datagrams_are_ignored() {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_dmx(0, 1, &[0; 600]);

        assert_eq!(
            Classification::Ignored(IgnoreReason::TooLong),
            dispatcher.classify(&datagram)
        );
    }

    #[rstest]
    #[case::below(9, false)]
    #[case::floor(10, true)]
    #[case::ceiling(530, true)]
    #[case::above(531, false)]
    fn default_window_bounds_are_inclusive(#[case] len: usize, #[case] inside: bool) {
        assert_eq!(inside, DatagramLimits::default().contains(len));
    }

    #[test]
    fn foreign_signature_is_ignored() {
        let mut dispatcher = dispatcher();
        let mut datagram = packet::encode_poll();
        datagram[..7].copy_from_slice(b"Art-Nyt");

        assert_eq!(
            Classification::Ignored(IgnoreReason::BadSignature),
            dispatcher.classify(&datagram)
        );
    }

    #[test]
    fn poll_and_sync_are_signals() {
        let mut dispatcher = dispatcher();

        assert_eq!(
            Classification::NeedsPollReply,
            dispatcher.classify(&packet::encode_poll())
        );
        assert_eq!(
            Classification::NeedsSyncAction,
            dispatcher.classify(&packet::encode_sync())
        );
        assert_eq!(SequenceState::default(), dispatcher.sequence_state());
    }

    #[test]
    fn unknown_op_code_is_reported() {
        let mut dispatcher = dispatcher();
        let mut datagram = packet::encode_poll();
        datagram[8..10].copy_from_slice(&0x9700_u16.to_le_bytes());

        assert_eq!(
            Classification::Ignored(IgnoreReason::UnknownOpCode(0x9700)),
            dispatcher.classify(&datagram)
        );
    }

    #[test]
    fn peer_poll_replies_are_ignored() {
        let mut dispatcher = dispatcher();
        let mut datagram = packet::encode_poll();
        datagram[8..10].copy_from_slice(&OpCode::PollReply.to_le_bytes());

        assert_eq!(
            Classification::Ignored(IgnoreReason::PeerPollReply),
            dispatcher.classify(&datagram)
        );
    }

    #[test]
    fn dmx_without_full_header_is_ignored() {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_dmx(0, 1, &[1, 2, 3, 4, 5, 6]);

        assert_eq!(
            Classification::Ignored(IgnoreReason::ShortHeader),
            dispatcher.classify(&datagram[..17])
        );
    }

    #[test]
    fn dmx_for_other_universe_leaves_channels_untouched() {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_dmx(3, 1, &[9; 6]);

        assert_eq!(
            Classification::Ignored(IgnoreReason::WrongUniverse),
            dispatcher.classify(&datagram)
        );
        assert_eq!(&[0; 6], dispatcher.channels());
        assert_eq!(None, dispatcher.sequence_state().last_universe());
    }

    #[test]
    fn undersized_declared_length_is_ignored() {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_dmx(0, 1, &[9; 4]);

        assert_eq!(
            Classification::Ignored(IgnoreReason::InsufficientChannels),
            dispatcher.classify(&datagram)
        );
    }

    #[test]
    fn truncated_payload_is_never_partially_copied() {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_dmx(0, 1, &[9; 8]);

        let outcome = dispatcher.classify(&datagram[..datagram.len() - 1]);

        assert_eq!(Classification::Ignored(IgnoreReason::Truncated), outcome);
        assert_eq!(&[0; 6], dispatcher.channels());
    }

    #[test]
    fn accepted_dmx_copies_exactly_channel_count_bytes() {
        let mut dispatcher = dispatcher();
        let datagram = packet::encode_dmx(0, 7, &[1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(Classification::DmxAccepted, dispatcher.classify(&datagram));
        assert_eq!(&[1, 2, 3, 4, 5, 6], dispatcher.channels());
        assert_eq!(Some(7), dispatcher.sequence_state().last_sequence());
        assert_eq!(Some(0), dispatcher.sequence_state().last_universe());
    }

    #[test]
    fn sequence_policy_rejects_stale_frames_when_enabled() {
        let mut dispatcher = dispatcher().with_sequence_policy(Box::new(WrappingSequence));

        let fresh = packet::encode_dmx(0, 10, &[1; 6]);
        let stale = packet::encode_dmx(0, 200, &[2; 6]);

        assert_eq!(Classification::DmxAccepted, dispatcher.classify(&fresh));
        assert_matches!(
            dispatcher.classify(&stale),
            Classification::Ignored(IgnoreReason::StaleSequence)
        );
        assert_eq!(&[1; 6], dispatcher.channels());
    }

    #[test]
    fn sequence_is_not_enforced_by_default() {
        let mut dispatcher = dispatcher();

        let first = packet::encode_dmx(0, 10, &[1; 6]);
        let rebooted_sender = packet::encode_dmx(0, 200, &[2; 6]);

        assert_eq!(Classification::DmxAccepted, dispatcher.classify(&first));
        assert_eq!(
            Classification::DmxAccepted,
            dispatcher.classify(&rebooted_sender)
        );
        assert_eq!(&[2; 6], dispatcher.channels());
    }

    #[test]
    fn custom_limits_raise_the_floor() {
        let mut dispatcher = dispatcher().with_limits(DatagramLimits::new(20, 530));

        assert_eq!(
            Classification::Ignored(IgnoreReason::TooShort),
            dispatcher.classify(&packet::encode_poll())
        );
    }
}
