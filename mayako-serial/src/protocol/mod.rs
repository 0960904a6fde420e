//! Protocol implementations.

pub mod crc;
pub mod packet;

// Re-export common types
pub use crc::crc8;
pub use packet::{CommandPacket, FrameHeader, Method, NodeIdentity, encode, format_hex};
