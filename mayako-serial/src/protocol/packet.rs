//! mayako packet framing.
//!
//! Every packet the firmware understands starts with a fixed 10-byte header
//! followed by the payload:
//!
//! ```text
//! +--------+---------------+----------+-------+---------+-----------+
//! | Method | Node identity | Sequence | CRC-8 | Length  |  Payload  |
//! +--------+---------------+----------+-------+---------+-----------+
//! | 1 byte |    4 bytes    | 2 bytes  | 1     | 2 bytes |  variable |
//! +--------+---------------+----------+-------+---------+-----------+
//! |  0x22  |    "MC01"     |  0x0001  |  crc  |  BE u16 |  JSON ... |
//! +--------+---------------+----------+-------+---------+-----------+
//! ```
//!
//! Multi-byte fields are big-endian. The checksum covers the payload only.

use {
    crate::{
        error::{Error, Result},
        protocol::crc::crc8,
    },
    byteorder::{BigEndian, ByteOrder, WriteBytesExt},
    log::trace,
    std::fmt,
};

/// Header length in bytes.
pub const HEADER_SIZE: usize = 10;

/// Offset of the checksum byte inside the header.
pub const CHECKSUM_OFFSET: usize = 7;

/// Offset of the big-endian payload length inside the header.
pub const LENGTH_OFFSET: usize = 8;

/// Largest payload the 16-bit length field can describe.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Sequence number used by the single-shot sender.
pub const DEFAULT_SEQUENCE: u16 = 0x0001;

/// Packet method flags (first header byte).
///
/// The firmware reserves the ASCII range `0x20..=0x26` for these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Method {
    /// Acknowledgement (0x20).
    Acknowledgement = 0x20,
    /// Sensor data (0x21).
    Data = 0x21,
    /// Command for the device (0x22).
    Command = 0x22,
    /// Heartbeat (0x23).
    Heartbeat = 0x23,
    /// Debug message (0x24).
    Debug = 0x24,
    /// Info message (0x25).
    Info = 0x25,
    /// Error message (0x26).
    Error = 0x26,
}

impl Method {
    /// Map a flag byte back to its method.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0x20 => Some(Self::Acknowledgement),
            0x21 => Some(Self::Data),
            0x22 => Some(Self::Command),
            0x23 => Some(Self::Heartbeat),
            0x24 => Some(Self::Debug),
            0x25 => Some(Self::Info),
            0x26 => Some(Self::Error),
            _ => None,
        }
    }

    /// Flag byte on the wire.
    pub fn flag(self) -> u8 {
        self as u8
    }
}

/// Four-character node name carried in bytes 1..5 of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIdentity([u8; 4]);

impl NodeIdentity {
    /// Identity of a freshly flashed board.
    pub const DEFAULT: Self = Self(*b"MC01");

    /// Parse a node name; it must be exactly four ASCII characters.
    pub fn parse(name: &str) -> Result<Self> {
        let bytes: [u8; 4] = name
            .as_bytes()
            .try_into()
            .map_err(|_| Error::InvalidNodeIdentity(name.to_string()))?;
        if !bytes.is_ascii() {
            return Err(Error::InvalidNodeIdentity(name.to_string()));
        }
        Ok(Self(bytes))
    }

    /// Raw header bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Default for NodeIdentity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            write!(f, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

/// Command packet builder.
#[derive(Debug)]
pub struct CommandPacket<'a> {
    method: Method,
    node: NodeIdentity,
    sequence: u16,
    payload: &'a [u8],
}

impl<'a> CommandPacket<'a> {
    /// Create a command packet for `payload` with the default header fields.
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            method: Method::Command,
            node: NodeIdentity::DEFAULT,
            sequence: DEFAULT_SEQUENCE,
            payload,
        }
    }

    /// Override the method flag.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Override the node identity.
    #[must_use]
    pub fn with_node(mut self, node: NodeIdentity) -> Self {
        self.node = node;
        self
    }

    /// Override the sequence number.
    #[must_use]
    pub fn with_sequence(mut self, sequence: u16) -> Self {
        self.sequence = sequence;
        self
    }

    /// Build the complete frame.
    ///
    /// The checksum and the length field are both derived from the same
    /// payload slice that is appended after the header.
    #[allow(clippy::unwrap_used)] // Writing to Vec<u8> cannot fail
    pub fn build(&self) -> Result<Vec<u8>> {
        let len = u16::try_from(self.payload.len()).map_err(|_| Error::PayloadTooLarge {
            len: self.payload.len(),
            max: MAX_PAYLOAD_SIZE,
        })?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        buf.push(self.method.flag());
        buf.extend_from_slice(self.node.as_bytes());
        buf.write_u16::<BigEndian>(self.sequence).unwrap();
        buf.push(crc8(self.payload));
        buf.write_u16::<BigEndian>(len).unwrap();
        buf.extend_from_slice(self.payload);

        trace!(
            "Built {:?} packet: node={} seq={} len={} crc={:#04x}",
            self.method,
            self.node,
            self.sequence,
            len,
            buf[CHECKSUM_OFFSET]
        );

        Ok(buf)
    }
}

/// Encode `payload` as a command packet with the default header.
pub fn encode(payload: &[u8]) -> Result<Vec<u8>> {
    CommandPacket::new(payload).build()
}

/// Decoded packet header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Method flag.
    pub method: Method,
    /// Node identity.
    pub node: NodeIdentity,
    /// Sequence number.
    pub sequence: u16,
    /// Payload checksum.
    pub checksum: u8,
    /// Declared payload length.
    pub payload_len: u16,
}

impl FrameHeader {
    /// Parse the header at the start of `frame`.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if frame.len() < HEADER_SIZE {
            return Err(Error::MalformedFrame(format!(
                "expected at least {HEADER_SIZE} bytes, got {}",
                frame.len()
            )));
        }

        let method = Method::from_flag(frame[0]).ok_or_else(|| {
            Error::MalformedFrame(format!("unknown method flag {:#04x}", frame[0]))
        })?;

        let mut node = [0u8; 4];
        node.copy_from_slice(&frame[1..5]);

        Ok(Self {
            method,
            node: NodeIdentity(node),
            sequence: BigEndian::read_u16(&frame[5..7]),
            checksum: frame[CHECKSUM_OFFSET],
            payload_len: BigEndian::read_u16(&frame[LENGTH_OFFSET..HEADER_SIZE]),
        })
    }

    /// Check the header against the payload that follows it.
    pub fn verify(&self, payload: &[u8]) -> bool {
        usize::from(self.payload_len) == payload.len() && crc8(payload) == self.checksum
    }
}

/// Render bytes as space-separated upper-case hex.
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
