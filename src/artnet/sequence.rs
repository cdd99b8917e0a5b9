use std::fmt::Debug;

use serde::Deserialize;
use strum_macros::{Display, EnumString};

/// Decides whether an ArtDmx sequence number may be applied.
pub trait SequencePolicy: Debug + Send + Sync {
    /// Returns whether `current` should be accepted after `previous`.
    ///
    /// `previous` is `None` until the first frame has been accepted.
    fn accepts(&self, previous: Option<u8>, current: u8) -> bool;
}

/// Accepts every frame regardless of its sequence number.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct AcceptAll;

impl SequencePolicy for AcceptAll {
    fn accepts(&self, _previous: Option<u8>, _current: u8) -> bool {
        true
    }
}

/// Accepts frames that are newer than the last one, modulo 256.
///
/// `current` is newer iff `current - previous` (wrapping) is below 128. A
/// sequence of `0` means the sender does not sequence its frames and is always
/// accepted.
///
/// ```
/// use artstrip::{SequencePolicy, WrappingSequence};
///
/// let policy = WrappingSequence;
/// assert!(policy.accepts(Some(250), 5));
/// assert!(!policy.accepts(Some(10), 200));
/// ```
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct WrappingSequence;

impl WrappingSequence {
    const WINDOW: u8 = 128;
}

impl SequencePolicy for WrappingSequence {
    fn accepts(&self, previous: Option<u8>, current: u8) -> bool {
        match previous {
            _ if current == 0 => true,
            None => true,
            Some(previous) => current.wrapping_sub(previous) < Self::WINDOW,
        }
    }
}

/// Configured sequence enforcement.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SequenceCheck {
    /// Apply every frame.
    #[default]
    Disabled,
    /// Drop frames older than the last accepted one.
    Wrapping,
}

impl SequenceCheck {
    /// Policy implementing this setting.
    #[must_use]
    pub fn policy(self) -> Box<dyn SequencePolicy> {
        match self {
            Self::Disabled => Box::new(AcceptAll),
            Self::Wrapping => Box::new(WrappingSequence),
        }
    }
}

/// Sequence and universe of the last accepted ArtDmx frame.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SequenceState {
    last_sequence: Option<u8>,
    last_universe: Option<u16>,
}

impl SequenceState {
    /// Last accepted sequence number.
    #[must_use]
    pub fn last_sequence(&self) -> Option<u8> {
        self.last_sequence
    }

    /// Universe of the last accepted frame.
    #[must_use]
    pub fn last_universe(&self) -> Option<u16> {
        self.last_universe
    }

    pub(crate) fn advance(&mut self, sequence: u8, universe: u16) {
        self.last_sequence = Some(sequence);
        self.last_universe = Some(universe);
    }
}
