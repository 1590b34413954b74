//! Optional TOML configuration file for the bridge.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.  Values given on the command line override the file.
//!
//! ```toml
//! [server]
//! ws_bind = "0.0.0.0"
//! ws_port = 24810
//! upstream = "127.0.0.1:24811"
//!
//! [defaults]
//! sensitivity = 1.25
//! invert_scroll = true
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::DEFAULT_WS_PORT;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Listener and upstream addresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// IP address the WebSocket listener binds to.
    #[serde(default = "default_ws_bind")]
    pub ws_bind: String,
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,
    /// `host:port` of the action consumer.  Absent means log-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

/// Pointer preferences a new session starts with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsSection {
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(default)]
    pub invert_scroll: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_ws_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_ws_port() -> u16 {
    DEFAULT_WS_PORT
}
fn default_sensitivity() -> f64 {
    trackpad_core::ports::DEFAULT_SENSITIVITY
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            ws_bind: default_ws_bind(),
            ws_port: default_ws_port(),
            upstream: None,
        }
    }
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            invert_scroll: false,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads a [`FileConfig`] from `path`, returning the defaults if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
