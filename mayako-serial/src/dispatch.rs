//! One-shot command dispatch: resolve, discover, encode, send.

use {
    crate::{
        catalog::{CommandCatalog, CommandEntry},
        device::{DEFAULT_KEYWORDS, PortCandidate, find_device},
        error::Result,
        port::{Connector, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT, PortSource, SerialConfig},
        protocol::{CommandPacket, NodeIdentity},
        sender::send_packet,
    },
    log::debug,
    std::time::Duration,
};

/// Settings for a single transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// Keywords a port description must contain (any of them).
    pub keywords: Vec<String>,
    /// Baud rate of the link.
    pub baud_rate: u32,
    /// Open/write timeout.
    pub timeout: Duration,
    /// Node identity written into the header.
    pub node: NodeIdentity,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            node: NodeIdentity::DEFAULT,
        }
    }
}

/// Outcome of a successful transmission.
#[derive(Debug, Clone)]
pub struct SendReport {
    /// Port the packet was written to.
    pub device: PortCandidate,
    /// Catalog index of the command.
    pub index: usize,
    /// Command that was sent.
    pub command: CommandEntry,
    /// Complete frame as written.
    pub packet: Vec<u8>,
    /// Bytes handed to the port.
    pub bytes_written: usize,
}

/// Build the frame for catalog entry `index` without touching any port.
pub fn prepare_packet(catalog: &CommandCatalog, index: usize, node: NodeIdentity) -> Result<Vec<u8>> {
    let entry = catalog.resolve(index)?;
    CommandPacket::new(&entry.payload)
        .with_node(node)
        .build()
}

/// Send catalog entry `index` to the single device matching `options`.
///
/// The index is checked first, then the device is selected; the packet is
/// only built once both are known.
pub fn send_command<P, C>(
    source: &P,
    connector: &C,
    catalog: &CommandCatalog,
    index: usize,
    options: &SendOptions,
) -> Result<SendReport>
where
    P: PortSource + ?Sized,
    C: Connector + ?Sized,
{
    let command = catalog.resolve(index)?;
    debug!("Resolved command {index}: {}", command.name);

    let device = find_device(source, options.keywords.as_slice())?;

    let packet = CommandPacket::new(&command.payload)
        .with_node(options.node)
        .build()?;

    let config = SerialConfig::new(&device.port_identifier, options.baud_rate)
        .with_timeout(options.timeout);
    let bytes_written = send_packet(connector, &config, &packet)?;

    Ok(SendReport {
        device,
        index,
        command: command.clone(),
        packet,
        bytes_written,
    })
}
