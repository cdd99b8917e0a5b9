//! Encoders for the Art-Net packets a controller sends to a node.
//!
//! Used by the `send` command and by tests to produce well-formed traffic.

use crate::protocol::{ARTNET_SIGNATURE, DMX_DATA_OFFSET, OpCode, PROTOCOL_VERSION};

const POLL_LEN: usize = 14;
const SYNC_LEN: usize = 14;

fn header(op_code: OpCode, capacity: usize) -> Vec<u8> {
    let mut packet = Vec::with_capacity(capacity);
    packet.extend_from_slice(&ARTNET_SIGNATURE);
    packet.extend_from_slice(&op_code.to_le_bytes());
    packet.extend_from_slice(&PROTOCOL_VERSION.to_be_bytes());
    packet
}

/// Encodes an ArtDmx packet.
///
/// Odd-length payloads are padded with one zero byte, as ArtDmx lengths are
/// even. Payloads longer than `u16::MAX` are cut to fit the length field.
///
/// ```
/// use artstrip::packet;
///
/// let datagram = packet::encode_dmx(1, 9, &[255, 0, 0]);
/// assert_eq!(22, datagram.len());
/// assert_eq!([0x00, 0x04], [datagram[16], datagram[17]]);
/// ```
#[must_use]
pub fn encode_dmx(universe: u16, sequence: u8, data: &[u8]) -> Vec<u8> {
    let data = &data[..data.len().min(usize::from(u16::MAX - 1))];
    let padded_len = data.len() + data.len() % 2;
    let mut packet = header(OpCode::Dmx, DMX_DATA_OFFSET + padded_len);
    packet.push(sequence);
    packet.push(0);
    packet.extend_from_slice(&universe.to_le_bytes());
    let declared = u16::try_from(padded_len).unwrap_or(u16::MAX - 1);
    packet.extend_from_slice(&declared.to_be_bytes());
    packet.extend_from_slice(data);
    packet.resize(DMX_DATA_OFFSET + padded_len, 0);
    packet
}

/// Encodes an ArtPoll packet with default flags and priority.
#[must_use]
pub fn encode_poll() -> Vec<u8> {
    let mut packet = header(OpCode::Poll, POLL_LEN);
    packet.push(0);
    packet.push(0);
    packet
}

/// Encodes an ArtSync packet.
#[must_use]
pub fn encode_sync() -> Vec<u8> {
    let mut packet = header(OpCode::Sync, SYNC_LEN);
    packet.extend_from_slice(&[0, 0]);
    packet
}
