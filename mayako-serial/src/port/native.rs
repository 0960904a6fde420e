//! Native serial port implementation using the `serialport` crate.
//!
//! This module provides port enumeration and opening for native platforms
//! (Linux, macOS, Windows, FreeBSD, etc.).

use {
    crate::{
        error::{Error, Result},
        port::{Connector, PortInfo, PortSource, SerialConfig},
    },
    log::trace,
    std::io,
};

/// Description used for ports without USB metadata.
pub const NO_DESCRIPTION: &str = "n/a";

/// Build a port description from USB manufacturer and product strings.
///
/// Bridge chips usually put their model in the product string (e.g.
/// "CP2104 USB to UART Bridge Controller") while boards often only fill in
/// the manufacturer (e.g. "Arduino (www.arduino.cc)"), so both are kept.
pub fn usb_description(manufacturer: Option<&str>, product: Option<&str>) -> String {
    let manufacturer = manufacturer
        .map(str::trim)
        .filter(|m| !m.is_empty());
    let product = product
        .map(str::trim)
        .filter(|p| !p.is_empty());

    match (manufacturer, product) {
        (Some(m), Some(p)) if p.contains(m) => p.to_string(),
        (Some(m), Some(p)) => format!("{m} {p}"),
        (Some(m), None) => m.to_string(),
        (None, Some(p)) => p.to_string(),
        (None, None) => NO_DESCRIPTION.to_string(),
    }
}

/// Native port enumerator backed by `serialport::available_ports`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePortSource;

impl PortSource for NativePortSource {
    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        let ports =
            serialport::available_ports().map_err(|e| Error::PortEnumeration(e.to_string()))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let (description, serial_number) = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => (
                        usb_description(
                            info.manufacturer
                                .as_deref(),
                            info.product
                                .as_deref(),
                        ),
                        info.serial_number
                            .clone(),
                    ),
                    _ => (NO_DESCRIPTION.to_string(), None),
                };

                trace!("Found port: {} ({description})", p.port_name);

                PortInfo {
                    name: p.port_name,
                    description,
                    serial_number,
                }
            })
            .collect())
    }
}

/// Opens ports through the `serialport` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeConnector;

impl Connector for NativeConnector {
    type Port = Box<dyn serialport::SerialPort>;

    fn open(&self, config: &SerialConfig) -> Result<Self::Port> {
        trace!(
            "Opening {} at {} baud (timeout {:?})",
            config.port_name, config.baud_rate, config.timeout
        );
        serialport::new(&config.port_name, config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|e| Error::transport(&config.port_name, io::Error::from(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_ports() {
        // Hosts without a readable port table still fail with the right error
        match NativePortSource.list_ports() {
            Ok(ports) => assert!(ports.iter().all(|p| !p.name.is_empty())),
            Err(e) => assert!(matches!(e, Error::PortEnumeration(_)), "unexpected error: {e}"),
        }
    }

    #[test]
    fn test_usb_description_both() {
        assert_eq!(
            usb_description(Some("Silicon Labs"), Some("CP2104 USB to UART Bridge Controller")),
            "Silicon Labs CP2104 USB to UART Bridge Controller"
        );
    }

    #[test]
    fn test_usb_description_product_contains_manufacturer() {
        assert_eq!(
            usb_description(Some("Arduino"), Some("Arduino Uno")),
            "Arduino Uno"
        );
    }

    #[test]
    fn test_usb_description_partial() {
        assert_eq!(
            usb_description(Some("Arduino (www.arduino.cc)"), None),
            "Arduino (www.arduino.cc)"
        );
        assert_eq!(usb_description(None, Some("USB Serial")), "USB Serial");
        assert_eq!(usb_description(Some("  "), None), NO_DESCRIPTION);
        assert_eq!(usb_description(None, None), NO_DESCRIPTION);
    }

    #[test]
    fn test_open_missing_port_is_transport_error() {
        let config = SerialConfig::new("/dev/mayako-does-not-exist", 115200);
        match NativeConnector.open(&config) {
            Err(Error::Transport { port, .. }) => assert_eq!(port, "/dev/mayako-does-not-exist"),
            Err(other) => panic!("expected transport error, got {other}"),
            Ok(_) => panic!("opening a missing port must fail"),
        }
    }
}
