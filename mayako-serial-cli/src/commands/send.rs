//! Send mode and its dry-run variant.

use {
    crate::{Cli, use_fancy_output},
    anyhow::{Context, Result},
    console::style,
    mayako_serial::{
        CommandCatalog, FrameHeader, NativeConnector, NativePortSource, SendOptions, format_hex,
        prepare_packet, protocol::packet::HEADER_SIZE, send_command,
    },
    serde_json::json,
};

fn done_mark() -> console::StyledObject<&'static str> {
    if use_fancy_output() {
        style("✓").green().bold()
    } else {
        style("OK").green().bold()
    }
}

/// Discover the device and send catalog entry `index` to it.
pub(crate) fn cmd_send(
    cli: &Cli,
    catalog: &CommandCatalog,
    index: usize,
    options: &SendOptions,
) -> Result<()> {
    let report = send_command(&NativePortSource, &NativeConnector, catalog, index, options)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "device": report.device,
                "index": report.index,
                "command": report.command.name,
                "packet": format_hex(&report.packet),
                "bytes_written": report.bytes_written,
            }))?
        );
        return Ok(());
    }

    if !cli.quiet {
        eprintln!(
            "{} Sent {} ({} bytes) to {}",
            done_mark(),
            style(&report.command.name).bold(),
            report.bytes_written,
            style(&report.device.port_identifier).cyan()
        );
        eprintln!("  {}", style(report.device.summary()).dim());
        eprintln!("  {}", style(format_hex(&report.packet)).dim());
    }

    Ok(())
}

/// Encode catalog entry `index` and print the frame without opening a port.
///
/// The frame hex goes to stdout; the decoded header goes to stderr.
pub(crate) fn cmd_dry_run(
    cli: &Cli,
    catalog: &CommandCatalog,
    index: usize,
    options: &SendOptions,
) -> Result<()> {
    let entry = catalog.resolve(index)?;
    let packet = prepare_packet(catalog, index, options.node)?;
    let header = FrameHeader::parse(&packet).context("encoded frame failed to decode")?;
    let verified = header.verify(&packet[HEADER_SIZE..]);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "index": index,
                "command": entry.name,
                "node": header.node.to_string(),
                "sequence": header.sequence,
                "checksum": format!("{:#04x}", header.checksum),
                "payload_len": header.payload_len,
                "verified": verified,
                "packet": format_hex(&packet),
            }))?
        );
        return Ok(());
    }

    println!("{}", format_hex(&packet));

    if !cli.quiet {
        eprintln!(
            "{} {} {}",
            style("Dry run:").yellow().bold(),
            style(&entry.name).bold(),
            style("(no port opened)").dim()
        );
        eprintln!(
            "  method {:?}, node {}, seq {}, crc {:#04x}, length {}",
            header.method, header.node, header.sequence, header.checksum, header.payload_len
        );
    }

    Ok(())
}
