//! Port abstraction for serial enumeration and transmission.
//!
//! Discovery and sending talk to the host through two seams:
//!
//! - [`PortSource`] lists the ports the platform reports.
//! - [`Connector`] opens a writable handle on one of them.
//!
//! ```text
//! +------------------+     +------------------+
//! | Device Discovery |     | Transport Sender |
//! +--------+---------+     +--------+---------+
//!          |                        |
//!          v                        v
//! +--------+---------+     +--------+---------+
//! |  PortSource      |     |   Connector      |
//! +--------+---------+     +--------+---------+
//!          |                        |
//!          v                        v
//! +--------+---------------------------------+
//! |        serialport (native feature)       |
//! +------------------------------------------+
//! ```
//!
//! Both traits are small enough to be replaced by in-memory doubles, which
//! is how the selection policy and the sender are tested.

#[cfg(feature = "native")]
pub mod native;

use std::io::Write;
use std::time::Duration;

use crate::error::Result;

/// Default baud rate of the mayako serial link.
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Default timeout for opening and writing a port.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Serial port configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port name/path (e.g., "/dev/ttyUSB0", "COM3").
    pub port_name: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Write timeout.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SerialConfig {
    /// Create a new configuration with port name and baud rate.
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            ..Default::default()
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One entry of the host port table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Port name/path.
    pub name: String,
    /// Human-readable description of the attached device.
    pub description: String,
    /// Serial number (if available).
    pub serial_number: Option<String>,
}

impl PortInfo {
    /// Create a port entry without a serial number.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            serial_number: None,
        }
    }

    /// Attach a serial number.
    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

/// Source of the host port table.
pub trait PortSource {
    /// List all serial ports currently visible to the host.
    fn list_ports(&self) -> Result<Vec<PortInfo>>;
}

/// Fixed port table, handy for tests and for replaying a captured scan.
impl PortSource for [PortInfo] {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        Ok(self.to_vec())
    }
}

impl PortSource for Vec<PortInfo> {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        Ok(self.clone())
    }
}

/// Opens writable serial handles.
///
/// The returned handle is owned by the caller; dropping it closes the port.
pub trait Connector {
    /// Handle type produced by [`Connector::open`].
    type Port: Write;

    /// Open the port described by `config`.
    fn open(&self, config: &SerialConfig) -> Result<Self::Port>;
}

// Re-export the native implementation
#[cfg(feature = "native")]
pub use native::{NativeConnector, NativePortSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_config_default() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.timeout, Duration::from_millis(1000));
        assert!(config.port_name.is_empty());
    }

    #[test]
    fn test_serial_config_builder() {
        let config = SerialConfig::new("/dev/ttyUSB0", 9600).with_timeout(Duration::from_secs(5));

        assert_eq!(config.port_name, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_static_port_source() {
        let ports = vec![
            PortInfo::new("/dev/ttyUSB0", "CP2104 USB to UART Bridge Controller")
                .with_serial_number("01A2B3C4"),
            PortInfo::new("/dev/ttyS0", "n/a"),
        ];
        let listed = ports.list_ports().unwrap();
        assert_eq!(listed, ports);
        assert_eq!(ports[..].list_ports().unwrap().len(), 2);
    }
}
