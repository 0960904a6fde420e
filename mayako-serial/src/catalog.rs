//! Command catalog.
//!
//! An ordered, immutable list of named payloads. Entries are addressed by
//! position; the names only serve help output and lookups by name.

use crate::error::{Error, Result};

/// A named command payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    /// Short name (e.g. "battery-read").
    pub name: String,
    /// Bytes sent as the packet payload.
    pub payload: Vec<u8>,
}

impl CommandEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Payload as text, replacing invalid UTF-8.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Commands understood by the stock mayako firmware.
const BUILTIN_COMMANDS: &[(&str, &str)] = &[
    ("record-start", r#"{"cmd_name": "RECORD_START"}"#),
    ("record-stop", r#"{"cmd_name": "RECORD_STOP"}"#),
    ("record-read", r#"{"cmd_name": "RECORD_READ"}"#),
    ("battery-read", r#"{"cmd_name": "BATTERY_READ"}"#),
    ("connection-read", r#"{"cmd_name": "CONNECTION_READ"}"#),
    (
        "switch-on",
        r#"{"cmd_name": "SWITCH_ON","index": 0,"red": 0,"green": 255,"blue": 0}"#,
    ),
    ("switch-off", r#"{"cmd_name": "SWITCH_OFF"}"#),
];

/// Ordered list of commands selectable by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCatalog {
    entries: Vec<CommandEntry>,
}

impl CommandCatalog {
    /// Build a catalog from `entries`; at least one entry is required.
    pub fn new(entries: Vec<CommandEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("command catalog is empty".to_string()));
        }
        Ok(Self { entries })
    }

    /// Catalog of the stock firmware commands.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_COMMANDS
                .iter()
                .map(|(name, payload)| CommandEntry::new(*name, payload.as_bytes()))
                .collect(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn resolve(&self, index: usize) -> Result<&CommandEntry> {
        self.entries
            .get(index)
            .ok_or(Error::InvalidCommandIndex {
                index,
                len: self.entries.len(),
            })
    }

    /// Payload bytes of the entry at `index`.
    pub fn payload(&self, index: usize) -> Result<&[u8]> {
        self.resolve(index)
            .map(|entry| entry.payload.as_slice())
    }

    /// Index of the first entry called `name`.
    pub fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))
    }

    /// Enumerate `(index, entry)` pairs in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &CommandEntry)> {
        self.entries
            .iter()
            .enumerate()
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
