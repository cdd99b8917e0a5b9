use crate::protocol::{
    ARTNET_SIGNATURE, DMX_DATA_OFFSET, LENGTH_OFFSET, OP_CODE_OFFSET, PHYSICAL_OFFSET,
    PROTOCOL_VERSION_OFFSET, SEQUENCE_OFFSET, UNIVERSE_OFFSET,
};

/// Borrowed view over one received datagram.
///
/// Accessors return `None` when the datagram is too short to contain the
/// requested field, so a view can be built over any byte slice.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InboundFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> InboundFrame<'a> {
    /// Wraps received bytes.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Raw datagram bytes.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Datagram length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the datagram is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns whether the leading eight bytes are the Art-Net signature.
    ///
    /// ```
    /// use artstrip::InboundFrame;
    ///
    /// assert!(InboundFrame::new(b"Art-Net\0\x00\x20").has_signature());
    /// assert!(!InboundFrame::new(b"Art-Nat\0\x00\x20").has_signature());
    /// ```
    #[must_use]
    pub fn has_signature(&self) -> bool {
        self.bytes.get(..ARTNET_SIGNATURE.len()) == Some(ARTNET_SIGNATURE.as_slice())
    }

    /// Raw op-code, little-endian at bytes `8..10`.
    #[must_use]
    pub fn op_code(&self) -> Option<u16> {
        self.u16_le(OP_CODE_OFFSET)
    }

    /// Protocol revision, big-endian at bytes `10..12`.
    #[must_use]
    pub fn protocol_version(&self) -> Option<u16> {
        self.u16_be(PROTOCOL_VERSION_OFFSET)
    }

    /// ArtDmx sequence byte.
    #[must_use]
    pub fn sequence(&self) -> Option<u8> {
        self.bytes.get(SEQUENCE_OFFSET).copied()
    }

    /// ArtDmx physical input port byte.
    #[must_use]
    pub fn physical(&self) -> Option<u8> {
        self.bytes.get(PHYSICAL_OFFSET).copied()
    }

    /// ArtDmx port-address, little-endian at bytes `14..16`.
    #[must_use]
    pub fn universe(&self) -> Option<u16> {
        self.u16_le(UNIVERSE_OFFSET)
    }

    /// Declared ArtDmx payload length, big-endian at bytes `16..18`.
    ///
    /// ```
    /// use artstrip::InboundFrame;
    ///
    /// let mut header = [0_u8; 18];
    /// header[16] = 0x02;
    /// header[17] = 0x00;
    /// assert_eq!(Some(512), InboundFrame::new(&header).declared_length());
    /// ```
    #[must_use]
    pub fn declared_length(&self) -> Option<u16> {
        self.u16_be(LENGTH_OFFSET)
    }

    /// Returns whether the full ArtDmx header is present.
    #[must_use]
    pub fn has_dmx_header(&self) -> bool {
        self.bytes.len() >= DMX_DATA_OFFSET
    }

    /// Channel bytes following the ArtDmx header, as physically received.
    #[must_use]
    pub fn dmx_data(&self) -> &'a [u8] {
        self.bytes.get(DMX_DATA_OFFSET..).unwrap_or_default()
    }

    fn u16_le(&self, offset: usize) -> Option<u16> {
        let field = self.bytes.get(offset..offset + 2)?;
        Some(u16::from_le_bytes([field[0], field[1]]))
    }

    fn u16_be(&self, offset: usize) -> Option<u16> {
        let field = self.bytes.get(offset..offset + 2)?;
        Some(u16::from_be_bytes([field[0], field[1]]))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dmx_header() -> Vec<u8> {
        let mut bytes = b"Art-Net\0".to_vec();
        bytes.extend_from_slice(&[0x00, 0x50, 0x00, 0x0E, 0x07, 0x01, 0x34, 0x12, 0x00, 0x03]);
        bytes.extend_from_slice(&[1, 2, 3]);
        bytes
    }

    #[test]
    fn accessors_follow_mixed_endianness() {
        let bytes = dmx_header();
        let frame = InboundFrame::new(&bytes);

        assert_eq!(Some(0x5000), frame.op_code());
        assert_eq!(Some(14), frame.protocol_version());
        assert_eq!(Some(7), frame.sequence());
        assert_eq!(Some(1), frame.physical());
        assert_eq!(Some(0x1234), frame.universe());
        assert_eq!(Some(3), frame.declared_length());
        assert_eq!(&[1, 2, 3], frame.dmx_data());
    }

    #[test]
    fn short_datagram_yields_no_fields() {
        let frame = InboundFrame::new(b"Art-Net\0\x00");

        assert!(frame.has_signature());
        assert_eq!(None, frame.op_code());
        assert_eq!(None, frame.universe());
        assert!(!frame.has_dmx_header());
        assert!(frame.dmx_data().is_empty());
    }

    #[test]
    fn signature_requires_trailing_nul() {
        assert!(!InboundFrame::new(b"Art-NetX\x00\x50").has_signature());
        assert!(!InboundFrame::new(b"Art").has_signature());
    }
}
