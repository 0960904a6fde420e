//! mayako-send - Command-line tool for sending commands to mayako devices.
//!
//! ## Features
//!
//! - Send one catalog command to the single matching serial device
//! - List the command catalog and the serial ports of the host
//! - Dry-run encoding without touching any port
//! - Shell completion generation
//! - Environment variable and configuration file support

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use console::style;
use env_logger::Env;
use log::debug;
use mayako_serial::{
    CommandCatalog, DEFAULT_KEYWORDS, NodeIdentity, SendOptions,
    port::{DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT},
};
use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Whether stderr is a terminal (set once at startup).
static STDERR_IS_TTY: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Check if symbols should be used (TTY and colors enabled).
fn use_fancy_output() -> bool {
    STDERR_IS_TTY.load(std::sync::atomic::Ordering::Relaxed) && console::colors_enabled_stderr()
}

mod commands;
mod config;

use config::Config;

/// Error classes that carry their own exit code.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// Unreadable or invalid configuration.
    #[error("{0}")]
    Config(String),
}

/// mayako-send - Send a single framed command to a mayako device.
///
/// Environment variables:
///   MAYAKO_INDEX      - Default command index
///   MAYAKO_BAUD       - Default baud rate (default: 115200)
///   MAYAKO_KEYWORDS   - Comma-separated device keywords
///   MAYAKO_NODE       - Node identity written into the header
///   MAYAKO_CONFIG     - Path to a configuration file
#[derive(Parser)]
#[command(name = "mayako-send")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Index of the command to send (see --list-commands).
    #[arg(short, long, env = "MAYAKO_INDEX")]
    index: Option<usize>,

    /// Name of the command to send; takes precedence over --index.
    #[arg(short, long, value_name = "NAME")]
    command: Option<String>,

    /// Baud rate of the serial link.
    #[arg(
        short,
        long,
        env = "MAYAKO_BAUD",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    baud: Option<u32>,

    /// Keyword a port description must contain (repeatable).
    #[arg(
        short = 'k',
        long = "keyword",
        value_name = "WORD",
        env = "MAYAKO_KEYWORDS",
        value_delimiter = ','
    )]
    keywords: Vec<String>,

    /// Node identity written into the packet header (4 ASCII characters).
    #[arg(long, value_name = "ID", env = "MAYAKO_NODE")]
    node: Option<String>,

    /// Open/write timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print the command catalog and exit.
    #[arg(long)]
    list_commands: bool,

    /// Print the serial ports of this host and exit.
    #[arg(long)]
    list_ports: bool,

    /// Machine-readable JSON output on stdout.
    #[arg(long)]
    json: bool,

    /// Encode and print the packet without opening any port.
    #[arg(long)]
    dry_run: bool,

    /// Path to a configuration file.
    #[arg(long = "config", value_name = "PATH", env = "MAYAKO_CONFIG")]
    config_path: Option<PathBuf>,

    /// Verbose output level (-v, -vv, -vvv for increasing detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long)]
    quiet: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // --- NO_COLOR and TTY detection ---
    let stderr_is_tty = console::Term::stderr().is_term();
    STDERR_IS_TTY.store(stderr_is_tty, std::sync::atomic::Ordering::Relaxed);

    if env::var("NO_COLOR").is_ok() || !stderr_is_tty {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // Setup logging based on verbosity
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();

    debug!(
        "mayako-send v{} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        cli.verbose
    );

    if let Err(err) = run(&cli) {
        eprintln!("{} {err:#}", style("Error:").red().bold());
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        cmd_completions(shell);
        return Ok(());
    }

    // Load configuration
    let config = if let Some(ref path) = cli.config_path {
        Config::load_from_path(path)?
    } else {
        Config::load()
    };
    let catalog = config.catalog()?;

    if cli.list_commands {
        return commands::list::cmd_list_commands(&catalog, cli.json);
    }

    if cli.list_ports {
        return commands::list::cmd_list_ports(cli, &resolve_keywords(cli, &config));
    }

    let index = resolve_index(cli, &catalog)?;
    let options = build_send_options(cli, &config)?;

    if cli.dry_run {
        commands::send::cmd_dry_run(cli, &catalog, index, &options)
    } else {
        commands::send::cmd_send(cli, &catalog, index, &options)
    }
}

/// Pick the catalog index from `--command` or `--index` (default 0).
fn resolve_index(cli: &Cli, catalog: &CommandCatalog) -> Result<usize> {
    match cli.command {
        Some(ref name) => Ok(catalog.position(name)?),
        None => Ok(cli.index.unwrap_or(0)),
    }
}

/// Keywords from the command line, else the config file, else the defaults.
fn resolve_keywords(cli: &Cli, config: &Config) -> Vec<String> {
    if !cli.keywords.is_empty() {
        return cli.keywords.clone();
    }
    config
        .connection
        .keywords
        .clone()
        .unwrap_or_else(|| DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect())
}

/// Merge command-line arguments and configuration into send options.
fn build_send_options(cli: &Cli, config: &Config) -> Result<SendOptions> {
    let node = match cli.node.as_deref().or(config.connection.node.as_deref()) {
        Some(name) => NodeIdentity::parse(name)?,
        None => NodeIdentity::DEFAULT,
    };

    let baud_rate = cli
        .baud
        .or(config.connection.baud)
        .unwrap_or(DEFAULT_BAUD_RATE);
    if baud_rate == 0 {
        return Err(CliError::Config("baud rate must be positive".to_string()).into());
    }

    let timeout = cli
        .timeout_ms
        .or(config.connection.timeout_ms)
        .map_or(DEFAULT_TIMEOUT, Duration::from_millis);

    // An empty filter accepts every port; that is for listing only
    let keywords = resolve_keywords(cli, config);
    if keywords.is_empty() || keywords.iter().any(String::is_empty) {
        return Err(CliError::Config(
            "device keywords must be non-empty to select a target".to_string(),
        )
        .into());
    }

    Ok(SendOptions {
        keywords,
        baud_rate,
        timeout,
        node,
    })
}

/// Map an error onto the process exit code.
///
/// | code | meaning |
/// |------|---------|
/// | 1 | no device or more than one device |
/// | 2 | usage error |
/// | 3 | configuration error |
/// | 4 | transport error |
/// | 5 | payload cannot be encoded |
fn exit_code_for(err: &anyhow::Error) -> i32 {
    use mayako_serial::Error;

    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::Config(_) => 3,
            };
        }
        if let Some(lib_err) = cause.downcast_ref::<Error>() {
            return match lib_err {
                Error::NoDeviceFound { .. } | Error::AmbiguousDevice { .. } => 1,
                Error::InvalidCommandIndex { .. }
                | Error::UnknownCommand(_)
                | Error::InvalidNodeIdentity(_) => 2,
                Error::Config(_) => 3,
                Error::Transport { .. } | Error::PortEnumeration(_) => 4,
                Error::PayloadTooLarge { .. } => 5,
                Error::MalformedFrame(_) => 1,
            };
        }
    }
    1
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
