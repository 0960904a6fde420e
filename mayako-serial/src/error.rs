//! Error types for mayako-serial.

use std::io;
use thiserror::Error;

/// Result type for mayako-serial operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for mayako-serial operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Discovery returned no port matching the keyword filter.
    #[error("No matching device found (keywords: {keywords:?})")]
    NoDeviceFound {
        /// Keywords the port descriptions were matched against.
        keywords: Vec<String>,
    },

    /// Discovery returned more than one matching port.
    #[error("Too many matching devices found: {}", .candidates.join(", "))]
    AmbiguousDevice {
        /// Port identifiers of every matching candidate.
        candidates: Vec<String>,
    },

    /// Requested catalog index is out of bounds.
    #[error("Invalid command index {index}: valid range is 0..{len}")]
    InvalidCommandIndex {
        /// Offending index.
        index: usize,
        /// Number of catalog entries.
        len: usize,
    },

    /// No catalog entry carries the requested name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Payload does not fit the 16-bit length field.
    #[error("Payload too large: {len} bytes (maximum {max})")]
    PayloadTooLarge {
        /// Payload length in bytes.
        len: usize,
        /// Largest encodable payload length.
        max: usize,
    },

    /// Node identity is not exactly four ASCII bytes.
    #[error("Invalid node identity {0:?}: expected 4 ASCII characters")]
    InvalidNodeIdentity(String),

    /// Frame bytes do not form a valid header.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Opening or writing the serial port failed.
    #[error("Transport error on {port}: {source}")]
    Transport {
        /// Port identifier the operation targeted.
        port: String,
        /// Underlying OS or driver error.
        #[source]
        source: io::Error,
    },

    /// The host port table could not be read.
    #[error("Failed to enumerate serial ports: {0}")]
    PortEnumeration(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O failure on `port` as a transport error.
    pub fn transport(port: impl Into<String>, source: io::Error) -> Self {
        Self::Transport {
            port: port.into(),
            source,
        }
    }
}
