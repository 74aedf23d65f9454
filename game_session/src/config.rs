//! Configuration for sessions and the command-line front end.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SessionResult;

/// Session configuration, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Input that dumps the serialized world instead of interacting.
    pub debug_command: String,

    /// Input that ends the command-line loop.
    pub exit_command: String,

    pub prompt: String,

    /// World document to start new sessions from. The sample world is used
    /// when unset.
    pub world_file: Option<PathBuf>,

    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Pretty-print persisted blobs.
    pub pretty_json: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debug_command: "debug".to_string(),
            exit_command: "exit".to_string(),
            prompt: "----> ".to_string(),
            world_file: None,
            log_filter: "info".to_string(),
            pretty_json: true,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(source: &str) -> SessionResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
