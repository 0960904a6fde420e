//! Fire-and-forget packet transmission.
//!
//! The port is opened, written once and closed again. There is no
//! acknowledgement to wait for and failed writes are not retried.

use {
    crate::{
        error::{Error, Result},
        port::{Connector, SerialConfig},
    },
    log::{debug, info},
    std::io::Write,
};

/// Write `packet` to the port described by `config`.
///
/// The handle returned by `connector` lives only for the duration of this
/// call and is dropped (closing the port) on every exit path.
pub fn send_packet<C>(connector: &C, config: &SerialConfig, packet: &[u8]) -> Result<usize>
where
    C: Connector + ?Sized,
{
    debug!(
        "Sending {} bytes to {} at {} baud",
        packet.len(),
        config.port_name,
        config.baud_rate
    );

    let mut port = connector.open(config)?;
    port.write_all(packet)
        .and_then(|()| port.flush())
        .map_err(|e| Error::transport(&config.port_name, e))?;

    info!("Packet sent to {} ({} bytes)", config.port_name, packet.len());
    Ok(packet.len())
}
