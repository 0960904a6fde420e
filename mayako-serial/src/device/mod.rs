//! Device discovery and selection.
//!
//! mayako boards are attached through USB-to-UART bridges whose port
//! description names the bridge (e.g. "CP2104") or the board vendor
//! (e.g. "Arduino"). Discovery filters the host port table by such
//! keywords; selection then insists on exactly one match and refuses to
//! guess between several.

use {
    crate::{
        error::{Error, Result},
        port::{PortInfo, PortSource},
    },
    log::{debug, info},
    std::hash::{Hash, Hasher},
};

/// Keywords matched against port descriptions when none are configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["CP2104", "Arduino"];

/// Placeholder for ports that do not report a serial number.
pub const UNKNOWN_SERIAL: &str = "unknown";

/// A serial port that may host the target device.
///
/// Two candidates are equal when they name the same port.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortCandidate {
    /// Port name/path (e.g., "/dev/ttyUSB0" or "COM3").
    pub port_identifier: String,
    /// Serial number, or [`UNKNOWN_SERIAL`].
    pub serial_number: String,
    /// Description reported by the platform.
    pub description: String,
}

impl PortCandidate {
    /// Short human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Port: {} -- Serial Number: {}",
            self.port_identifier, self.serial_number
        )
    }
}

impl From<PortInfo> for PortCandidate {
    fn from(info: PortInfo) -> Self {
        Self {
            port_identifier: info.name,
            serial_number: info
                .serial_number
                .unwrap_or_else(|| UNKNOWN_SERIAL.to_string()),
            description: info.description,
        }
    }
}

impl PartialEq for PortCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.port_identifier == other.port_identifier
    }
}

impl Eq for PortCandidate {}

impl Hash for PortCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.port_identifier.hash(state);
    }
}

/// Keep the ports whose description contains any of `keywords`.
///
/// Matching is a case-sensitive substring test. An empty keyword list
/// keeps every port.
pub fn filter_candidates<S: AsRef<str>>(ports: Vec<PortInfo>, keywords: &[S]) -> Vec<PortCandidate> {
    ports
        .into_iter()
        .filter(|port| {
            keywords.is_empty()
                || keywords
                    .iter()
                    .any(|keyword| port.description.contains(keyword.as_ref()))
        })
        .map(PortCandidate::from)
        .collect()
}

/// Scan the host port table and return the ports matching `keywords`.
///
/// Every call rescans; results are never cached.
pub fn discover<P, S>(source: &P, keywords: &[S]) -> Result<Vec<PortCandidate>>
where
    P: PortSource + ?Sized,
    S: AsRef<str>,
{
    let ports = source.list_ports()?;
    let total = ports.len();
    let candidates = filter_candidates(ports, keywords);

    debug!(
        "Discovery: {} of {total} ports matched {:?}",
        candidates.len(),
        keywords
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
    );

    Ok(candidates)
}

/// Apply the selection policy: exactly one candidate is required.
///
/// `keywords` only feeds the error message when nothing matched.
pub fn select_device<S: AsRef<str>>(
    candidates: Vec<PortCandidate>,
    keywords: &[S],
) -> Result<PortCandidate> {
    let mut iter = candidates.into_iter();
    match (iter.next(), iter.next()) {
        (None, _) => Err(Error::NoDeviceFound {
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().to_string())
                .collect(),
        }),
        (Some(only), None) => {
            info!("Selected device: {}", only.summary());
            Ok(only)
        },
        (Some(first), Some(second)) => {
            let candidates = [first, second]
                .into_iter()
                .chain(iter)
                .map(|c| c.port_identifier)
                .collect();
            Err(Error::AmbiguousDevice { candidates })
        },
    }
}

/// Discover and select the single device matching `keywords`.
pub fn find_device<P, S>(source: &P, keywords: &[S]) -> Result<PortCandidate>
where
    P: PortSource + ?Sized,
    S: AsRef<str>,
{
    select_device(discover(source, keywords)?, keywords)
}

/// Format a list of candidates for display.
pub fn format_candidates(candidates: &[PortCandidate]) -> Vec<String> {
    candidates
        .iter()
        .map(|c| format!("{} - {}", c.summary(), c.description))
        .collect()
}
