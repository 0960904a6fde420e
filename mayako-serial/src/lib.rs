//! # mayako-serial
//!
//! Host-side library for sending commands to mayako microcontrollers over a
//! serial link.
//!
//! This crate provides:
//!
//! - CRC-8/BLUETOOTH payload checksums
//! - mayako packet framing (10-byte header + payload)
//! - Keyword-based serial port discovery with a strict single-device policy
//! - The built-in command catalog
//! - A one-shot, fire-and-forget packet sender
//!
//! ## Features
//!
//! - `native` (default): serial port enumeration and I/O via `serialport`
//! - `serde`: serialization support for discovered ports
//!
//! ## Example
//!
//! ```rust,no_run
//! use mayako_serial::{CommandCatalog, SendOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = CommandCatalog::builtin();
//!
//!     #[cfg(feature = "native")]
//!     {
//!         use mayako_serial::{NativeConnector, NativePortSource, send_command};
//!
//!         let report = send_command(
//!             &NativePortSource,
//!             &NativeConnector,
//!             &catalog,
//!             3,
//!             &SendOptions::default(),
//!         )?;
//!         println!("sent {} bytes to {}", report.bytes_written, report.device.port_identifier);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod port;
pub mod protocol;
pub mod sender;

// Re-exports for convenience
#[cfg(feature = "native")]
pub use port::{NativeConnector, NativePortSource};
pub use {
    catalog::{CommandCatalog, CommandEntry},
    device::{
        DEFAULT_KEYWORDS, PortCandidate, UNKNOWN_SERIAL, discover, filter_candidates, find_device,
        format_candidates, select_device,
    },
    dispatch::{SendOptions, SendReport, prepare_packet, send_command},
    error::{Error, Result},
    port::{Connector, PortInfo, PortSource, SerialConfig},
    protocol::{CommandPacket, FrameHeader, Method, NodeIdentity, crc8, encode, format_hex},
    sender::send_packet,
};
