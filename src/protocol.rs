use strum_macros::{Display, EnumIter};

/// Eight-byte packet signature, `"Art-Net"` followed by a NUL.
pub const ARTNET_SIGNATURE: [u8; 8] = *b"Art-Net\0";

/// UDP port reserved for Art-Net traffic.
pub const ARTNET_PORT: u16 = 6454;

/// Protocol revision written by the packet encoders.
pub const PROTOCOL_VERSION: u16 = 14;

/// Smallest datagram the dispatcher looks at by default.
pub const MIN_DATAGRAM_LEN: usize = 10;

/// Largest datagram the dispatcher looks at by default (`18 + 512`).
pub const MAX_DATAGRAM_LEN: usize = DMX_DATA_OFFSET + MAX_DMX_CHANNELS;

/// Channels carried by one DMX512 universe.
pub const MAX_DMX_CHANNELS: usize = 512;

pub(crate) const OP_CODE_OFFSET: usize = 8;
pub(crate) const PROTOCOL_VERSION_OFFSET: usize = 10;
pub(crate) const SEQUENCE_OFFSET: usize = 12;
pub(crate) const PHYSICAL_OFFSET: usize = 13;
pub(crate) const UNIVERSE_OFFSET: usize = 14;
pub(crate) const LENGTH_OFFSET: usize = 16;

/// First byte of ArtDmx channel data; also the ArtDmx header length.
pub const DMX_DATA_OFFSET: usize = 18;

/// Art-Net op-codes understood by this node.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display)]
pub enum OpCode {
    /// Controller discovery request.
    #[strum(to_string = "OpPoll")]
    Poll,
    /// Node discovery response.
    #[strum(to_string = "OpPollReply")]
    PollReply,
    /// One universe of DMX512 data.
    #[strum(to_string = "OpDmx")]
    Dmx,
    /// Latch previously received DMX data.
    #[strum(to_string = "OpSync")]
    Sync,
}

impl OpCode {
    /// Returns the raw 16-bit op-code.
    ///
    /// ```
    /// use artstrip::OpCode;
    ///
    /// assert_eq!(0x5000, OpCode::Dmx.value());
    /// ```
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::Poll => 0x2000,
            Self::PollReply => 0x2100,
            Self::Dmx => 0x5000,
            Self::Sync => 0x5200,
        }
    }

    /// Maps a raw op-code onto a known variant.
    ///
    /// ```
    /// use artstrip::OpCode;
    ///
    /// assert_eq!(Some(OpCode::Sync), OpCode::from_value(0x5200));
    /// assert_eq!(None, OpCode::from_value(0x8000));
    /// ```
    #[must_use]
    pub const fn from_value(value: u16) -> Option<Self> {
        match value {
            0x2000 => Some(Self::Poll),
            0x2100 => Some(Self::PollReply),
            0x5000 => Some(Self::Dmx),
            0x5200 => Some(Self::Sync),
            _ => None,
        }
    }

    /// Returns the op-code as it appears on the wire (little-endian).
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.value().to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn op_codes_round_trip_through_raw_values() {
        for op_code in OpCode::iter() {
            assert_eq!(Some(op_code), OpCode::from_value(op_code.value()));
        }
    }

    #[test]
    fn dmx_op_code_is_little_endian_on_the_wire() {
        assert_eq!([0x00, 0x50], OpCode::Dmx.to_le_bytes());
    }

    #[test]
    fn max_datagram_fits_header_and_full_universe() {
        assert_eq!(530, MAX_DATAGRAM_LEN);
    }
}
