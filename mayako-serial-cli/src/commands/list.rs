//! Listing modes: the command catalog and the host's serial ports.

use {
    crate::Cli,
    anyhow::Result,
    console::style,
    mayako_serial::{
        CommandCatalog, NativePortSource, PortCandidate, PortSource, filter_candidates,
        format_candidates, select_device,
    },
    serde_json::json,
};

/// Render the catalog as `index: name payload` lines.
pub(crate) fn catalog_lines(catalog: &CommandCatalog) -> Vec<String> {
    catalog
        .entries()
        .map(|(index, entry)| format!("{index}: {:<16} {}", entry.name, entry.payload_text()))
        .collect()
}

/// Print the command catalog to stdout.
pub(crate) fn cmd_list_commands(catalog: &CommandCatalog, json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = catalog
            .entries()
            .map(|(index, entry)| {
                json!({
                    "index": index,
                    "name": entry.name,
                    "payload": entry.payload_text(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("available commands");
    for line in catalog_lines(catalog) {
        println!("{line}");
    }
    Ok(())
}

/// List every serial port, marking the ones that match `keywords`.
pub(crate) fn cmd_list_ports(cli: &Cli, keywords: &[String]) -> Result<()> {
    let ports = NativePortSource.list_ports()?;
    let all = filter_candidates(ports.clone(), &[] as &[&str]);
    let matching = filter_candidates(ports, keywords);

    if cli.json {
        let entries = all
            .iter()
            .map(|candidate| port_json(candidate, matching.contains(candidate)))
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    eprintln!("{}", style("Serial ports").bold().underlined());

    if all.is_empty() {
        eprintln!("  {}", style("No serial ports found").dim());
        return Ok(());
    }

    for candidate in &all {
        let marker = if matching.contains(candidate) {
            style("•").green()
        } else {
            style("•").dim()
        };
        eprintln!(
            "  {} {} {}",
            marker,
            style(&candidate.port_identifier).cyan(),
            style(format!("- {} ({})", candidate.description, candidate.serial_number)).dim()
        );
    }

    if cli.quiet {
        return Ok(());
    }

    // Show what a send would pick
    let summary = format_candidates(&matching);
    match select_device(matching, keywords) {
        Ok(device) => eprintln!(
            "\n{} Target: {}",
            style("→").green().bold(),
            style(&device.port_identifier).cyan().bold()
        ),
        Err(e) => {
            eprintln!("\n{} {e}", style("!").yellow().bold());
            for line in summary {
                eprintln!("    {line}");
            }
        },
    }

    Ok(())
}

fn port_json(candidate: &PortCandidate, matches: bool) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(candidate)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("matches".to_string(), matches.into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mayako_serial::{CommandEntry, PortInfo};

    #[test]
    fn test_catalog_lines_builtin() {
        let lines = catalog_lines(&CommandCatalog::builtin());
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("0: record-start"));
        assert!(lines[3].starts_with("3: battery-read"));
        assert!(lines[3].ends_with(r#"{"cmd_name": "BATTERY_READ"}"#));
    }

    #[test]
    fn test_catalog_lines_custom() {
        let catalog =
            CommandCatalog::new(vec![CommandEntry::new("ping", &b"{}"[..])]).unwrap();
        assert_eq!(catalog_lines(&catalog), vec![format!("0: {:<16} {{}}", "ping")]);
    }

    #[test]
    fn test_port_json_adds_match_flag() {
        let candidate = PortCandidate::from(
            PortInfo::new("/dev/ttyUSB0", "CP2104 USB to UART").with_serial_number("01A2"),
        );
        let value = port_json(&candidate, true).unwrap();
        assert_eq!(value["port_identifier"], "/dev/ttyUSB0");
        assert_eq!(value["serial_number"], "01A2");
        assert_eq!(value["description"], "CP2104 USB to UART");
        assert_eq!(value["matches"], true);
    }

    #[test]
    fn test_port_json_unknown_serial() {
        let candidate = PortCandidate::from(PortInfo::new("/dev/ttyS0", "n/a"));
        let value = port_json(&candidate, false).unwrap();
        assert_eq!(value["serial_number"], "unknown");
        assert_eq!(value["matches"], false);
    }
}
