//! Configuration file support for mayako-send.
//!
//! Configuration is loaded from multiple sources with the following priority (highest first):
//! 1. Command-line arguments
//! 2. Environment variables (MAYAKO_*)
//! 3. Explicit config file (--config)
//! 4. Local config file (./mayako.toml)
//! 5. Global config file (~/.config/mayako/config.toml)

use {
    crate::CliError,
    anyhow::Result,
    directories::ProjectDirs,
    log::{debug, warn},
    mayako_serial::{CommandCatalog, CommandEntry},
    serde::{Deserialize, Serialize},
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

/// Name of the local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "mayako.toml";

/// Connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Default baud rate.
    pub baud: Option<u32>,
    /// Open/write timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Keywords matched against port descriptions.
    pub keywords: Option<Vec<String>>,
    /// Node identity written into the packet header.
    pub node: Option<String>,
}

/// A catalog entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Command name.
    pub name: String,
    /// Payload text sent verbatim.
    pub payload: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Custom command catalog; replaces the built-in one when present.
    #[serde(default, rename = "command", skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<CommandConfig>>,
}

impl Config {
    /// Load configuration from the global and local files.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match Self::load_from_file(&global_path) {
                    Ok(global_config) => {
                        debug!("Loaded global config from {}", global_path.display());
                        config.merge(global_config);
                    },
                    Err(e) => warn!("{e}"),
                }
            }
        }

        // Load local config (overrides global)
        let local_path = Path::new(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            match Self::load_from_file(local_path) {
                Ok(local_config) => {
                    debug!("Loaded local config from {LOCAL_CONFIG_FILE}");
                    config.merge(local_config);
                },
                Err(e) => warn!("{e}"),
            }
        }

        config
    }

    /// Load configuration from a specific file path (--config flag).
    ///
    /// Unlike [`Config::load`], a missing or invalid file is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config = Self::load_from_file(path)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    /// Get the global configuration directory.
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mayako").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the global configuration file path.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Merge another config into this one.
    fn merge(&mut self, other: Self) {
        if other.connection.baud.is_some() {
            self.connection.baud = other.connection.baud;
        }
        if other.connection.timeout_ms.is_some() {
            self.connection.timeout_ms = other.connection.timeout_ms;
        }
        if other.connection.keywords.is_some() {
            self.connection.keywords = other.connection.keywords;
        }
        if other.connection.node.is_some() {
            self.connection.node = other.connection.node;
        }

        // A catalog is replaced as a whole, never spliced
        if other.commands.is_some() {
            self.commands = other.commands;
        }
    }

    /// Build the command catalog: the configured one, or the built-in list.
    ///
    /// A configured but empty list is an error.
    pub fn catalog(&self) -> mayako_serial::Result<CommandCatalog> {
        let Some(ref commands) = self.commands else {
            return Ok(CommandCatalog::builtin());
        };

        let entries = commands
            .iter()
            .map(|c| CommandEntry::new(c.name.as_str(), c.payload.as_bytes()))
            .collect();
        CommandCatalog::new(entries)
    }
}
