use std::net::Ipv4Addr;

use bon::bon;

use crate::protocol::{ARTNET_PORT, ARTNET_SIGNATURE, OpCode};

/// Size of an ArtPollReply datagram.
pub const DISCOVERY_REPLY_LEN: usize = 239;

const OP_CODE: usize = 8;
const IP: usize = 10;
const PORT: usize = 14;
const VERSION_HI: usize = 16;
const VERSION_LO: usize = 17;
const NET_SWITCH: usize = 18;
const SUB_SWITCH: usize = 19;
const OEM_HI: usize = 20;
const OEM_LO: usize = 21;
const UBEA_VERSION: usize = 22;
const STATUS_1: usize = 23;
const ESTA_MAN: usize = 24;
const SHORT_NAME: usize = 26;
const SHORT_NAME_LEN: usize = 18;
const LONG_NAME: usize = 44;
const LONG_NAME_LEN: usize = 64;
const NODE_REPORT: usize = 108;
const NODE_REPORT_LEN: usize = 64;
const NUM_PORTS_HI: usize = 172;
const NUM_PORTS_LO: usize = 173;
const PORT_TYPES: usize = 174;
const GOOD_INPUT: usize = 178;
const GOOD_OUTPUT: usize = 182;
const SW_IN: usize = 186;
const SW_OUT: usize = 190;
const SW_VIDEO: usize = 194;
const SPARE: usize = 197;
const STYLE: usize = 200;
const MAC: usize = 201;
const BIND_IP: usize = 207;
const BIND_INDEX: usize = 211;
const STATUS_2: usize = 212;
const FILLER: usize = 213;
const FILLER_LEN: usize = 26;
const PORT_COUNT: usize = 4;

const _: () = assert!(FILLER + FILLER_LEN == DISCOVERY_REPLY_LEN);
const _: () = assert!(STATUS_2 + 1 == FILLER);
const _: () = assert!(NODE_REPORT + NODE_REPORT_LEN == NUM_PORTS_HI);

const DEFAULT_SHORT_NAME: &str = "artstrip";
const PORT_TYPE_DMX_OUTPUT: u8 = 0xC0;
const GOOD_INPUT_DISABLED: u8 = 0x08;
const GOOD_OUTPUT_TRANSMITTING: u8 = 0x80;
const STATUS_1_VALUE: u8 = 0xD2;
const STATUS_2_VALUE: u8 = 0x08;
const OEM_UNKNOWN: u16 = 0x00FF;

/// Six-byte hardware address reported in discovery replies.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, derive_more::From, derive_more::Into)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates an address from raw octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(self) -> [u8; 6] {
        self.0
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl std::str::FromStr for MacAddress {
    type Err = hex::FromHexError;

    /// Parses `AA:BB:CC:DD:EE:FF`, `AA-BB-...` or bare `AABBCCDDEEFF`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits: String = value
            .chars()
            .filter(|character| !matches!(character, ':' | '-'))
            .collect();
        let mut octets = [0_u8; 6];
        hex::decode_to_slice(digits, &mut octets)?;
        Ok(Self(octets))
    }
}

/// Pre-built ArtPollReply sent in answer to every ArtPoll.
///
/// Stored as the exact wire bytes; fields are written through fixed offsets so
/// the layout cannot drift with compiler padding.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiscoveryReply {
    bytes: [u8; DISCOVERY_REPLY_LEN],
}

#[bon]
impl DiscoveryReply {
    /// Builds the reply for a node bound to `universe` at `ip`.
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use artstrip::DiscoveryReply;
    ///
    /// let reply = DiscoveryReply::builder()
    ///     .ip(Ipv4Addr::new(10, 0, 0, 7))
    ///     .universe(3)
    ///     .build();
    /// assert_eq!(239, reply.as_bytes().len());
    /// assert_eq!(3, reply.input_universe());
    /// ```
    #[builder]
    pub fn new(
        ip: Ipv4Addr,
        universe: u16,
        #[builder(default)] mac: MacAddress,
        #[builder(into)] short_name: Option<String>,
        #[builder(into)] long_name: Option<String>,
    ) -> Self {
        let mut reply = Self {
            bytes: [0; DISCOVERY_REPLY_LEN],
        };
        let short_name = short_name.unwrap_or_else(|| DEFAULT_SHORT_NAME.to_string());
        let long_name = long_name.unwrap_or_else(|| format!("{DEFAULT_SHORT_NAME} {mac}"));
        let report = format!("Accepting DMX for Universe {universe}");

        reply.put(0, &ARTNET_SIGNATURE);
        reply.put(OP_CODE, &OpCode::PollReply.to_le_bytes());
        reply.put(IP, &ip.octets());
        reply.put(PORT, &ARTNET_PORT.to_le_bytes());
        reply.bytes[VERSION_HI] = 1;
        reply.bytes[VERSION_LO] = 0;
        reply.bytes[NET_SWITCH] = 0;
        reply.bytes[SUB_SWITCH] = 0;
        let [oem_hi, oem_lo] = OEM_UNKNOWN.to_be_bytes();
        reply.bytes[OEM_HI] = oem_hi;
        reply.bytes[OEM_LO] = oem_lo;
        reply.bytes[UBEA_VERSION] = 0;
        reply.bytes[STATUS_1] = STATUS_1_VALUE;
        reply.put(ESTA_MAN, &[0, 0]);
        reply.put_text(SHORT_NAME, SHORT_NAME_LEN, &short_name);
        reply.put_text(LONG_NAME, LONG_NAME_LEN, &long_name);
        reply.put_text(NODE_REPORT, NODE_REPORT_LEN, &report);
        reply.bytes[NUM_PORTS_HI] = 0;
        reply.bytes[NUM_PORTS_LO] = 1;
        reply.put(PORT_TYPES, &[PORT_TYPE_DMX_OUTPUT; PORT_COUNT]);
        reply.put(GOOD_INPUT, &[GOOD_INPUT_DISABLED; PORT_COUNT]);
        reply.put(GOOD_OUTPUT, &[GOOD_OUTPUT_TRANSMITTING; PORT_COUNT]);
        // Port-address low byte only; net and sub switches stay zero.
        reply.bytes[SW_IN] = universe.to_le_bytes()[0];
        reply.bytes[STYLE] = 0;
        reply.put(MAC, &mac.octets());
        reply.put(BIND_IP, &ip.octets());
        reply.bytes[BIND_INDEX] = 0;
        reply.bytes[STATUS_2] = STATUS_2_VALUE;

        reply
    }
}

impl DiscoveryReply {
    /// Reads a reply received from another node.
    ///
    /// Returns `None` unless `datagram` starts with a full ArtPollReply.
    /// Trailing bytes added by newer protocol revisions are ignored.
    #[must_use]
    pub fn from_bytes(datagram: &[u8]) -> Option<Self> {
        let bytes: [u8; DISCOVERY_REPLY_LEN] =
            datagram.get(..DISCOVERY_REPLY_LEN)?.try_into().ok()?;
        let reply = Self { bytes };
        let op_code = u16::from_le_bytes(reply.array::<2>(OP_CODE));
        (reply.bytes[..OP_CODE] == ARTNET_SIGNATURE && op_code == OpCode::PollReply.value())
            .then_some(reply)
    }

    /// Exact wire bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DISCOVERY_REPLY_LEN] {
        &self.bytes
    }

    /// Node address carried in the reply.
    #[must_use]
    pub fn ip(&self) -> Ipv4Addr {
        let [a, b, c, d] = self.array::<4>(IP);
        Ipv4Addr::new(a, b, c, d)
    }

    /// UDP port carried in the reply.
    #[must_use]
    pub fn port(&self) -> u16 {
        u16::from_le_bytes(self.array::<2>(PORT))
    }

    /// Universe bound to the first input port (`SwIn[0]`).
    #[must_use]
    pub fn input_universe(&self) -> u8 {
        self.bytes[SW_IN]
    }

    /// Universe switches for all four output ports.
    #[must_use]
    pub fn output_switches(&self) -> [u8; PORT_COUNT] {
        self.array::<PORT_COUNT>(SW_OUT)
    }

    /// Video, macro and remote switch bytes.
    #[must_use]
    pub fn switches(&self) -> [u8; 3] {
        self.array::<3>(SW_VIDEO)
    }

    /// Spare bytes.
    #[must_use]
    pub fn spare(&self) -> [u8; 3] {
        self.array::<3>(SPARE)
    }

    /// Hardware address.
    #[must_use]
    pub fn mac(&self) -> MacAddress {
        MacAddress::new(self.array::<6>(MAC))
    }

    /// Short node name without NUL padding.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.text(SHORT_NAME, SHORT_NAME_LEN)
    }

    /// Long node name without NUL padding.
    #[must_use]
    pub fn long_name(&self) -> &str {
        self.text(LONG_NAME, LONG_NAME_LEN)
    }

    /// Free-text node report without NUL padding.
    #[must_use]
    pub fn node_report(&self) -> &str {
        self.text(NODE_REPORT, NODE_REPORT_LEN)
    }

    fn put(&mut self, offset: usize, value: &[u8]) {
        self.bytes[offset..offset + value.len()].copy_from_slice(value);
    }

    /// Writes ASCII text, truncated so at least one NUL terminates the field.
    fn put_text(&mut self, offset: usize, width: usize, value: &str) {
        let field = &mut self.bytes[offset..offset + width];
        field.fill(0);
        let text = value.as_bytes();
        let len = text.len().min(width - 1);
        field[..len].copy_from_slice(&text[..len]);
    }

    fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0_u8; N];
        out.copy_from_slice(&self.bytes[offset..offset + N]);
        out
    }

    fn text(&self, offset: usize, width: usize) -> &str {
        let field = &self.bytes[offset..offset + width];
        let end = field.iter().position(|byte| *byte == 0).unwrap_or(width);
        std::str::from_utf8(&field[..end]).unwrap_or_default()
    }
}
