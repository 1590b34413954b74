//! Trackpad bridge: entry point.
//!
//! Accepts WebSocket connections from a phone or tablet browser, interprets
//! touch gestures and key presses, and forwards the resulting pointer and
//! keyboard actions to an input injector as newline-delimited JSON.
//!
//! # Usage
//!
//! ```text
//! trackpad-bridge [OPTIONS]
//!
//! Options:
//!   --ws-bind   <IP>         WebSocket bind address [default: 0.0.0.0]
//!   --ws-port   <PORT>       WebSocket listener port [default: 24810]
//!   --upstream  <ADDR>       Action consumer, e.g. 127.0.0.1:24811
//!   --config    <PATH>       Optional TOML config file
//!   --log-level <FILTER>     Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Precedence
//!
//! Command line (or its environment variable) beats the config file, which
//! beats the built-in defaults.
//!
//! | Variable              | Flag          |
//! |-----------------------|---------------|
//! | `TRACKPAD_WS_BIND`    | `--ws-bind`   |
//! | `TRACKPAD_WS_PORT`    | `--ws-port`   |
//! | `TRACKPAD_UPSTREAM`   | `--upstream`  |
//! | `TRACKPAD_CONFIG`     | `--config`    |
//! | `TRACKPAD_LOG_LEVEL`  | `--log-level` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trackpad_bridge::domain::BridgeConfig;
use trackpad_bridge::infrastructure::config_file::{load_config, FileConfig};
use trackpad_bridge::infrastructure::run_server;
use trackpad_core::Settings;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Phone-as-trackpad WebSocket bridge.
///
/// Every option is optional; unset options fall back to the config file and
/// then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "trackpad-bridge",
    about = "Turns browser touch input into remote pointer and keyboard actions",
    version
)]
struct Cli {
    /// IP address to bind the WebSocket server to.
    #[arg(long, env = "TRACKPAD_WS_BIND")]
    ws_bind: Option<String>,

    /// TCP port for the WebSocket server.
    #[arg(long, env = "TRACKPAD_WS_PORT")]
    ws_port: Option<u16>,

    /// `ip:port` of the action consumer.  Without one, actions are logged.
    #[arg(long, env = "TRACKPAD_UPSTREAM")]
    upstream: Option<String>,

    /// Path to a TOML config file.  A missing file is not an error.
    #[arg(long, env = "TRACKPAD_CONFIG")]
    config: Option<PathBuf>,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TRACKPAD_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Merges the CLI arguments over `file` into a [`BridgeConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bind or upstream address does not parse, or if
    /// the configured default sensitivity is not a positive number.
    fn into_bridge_config(self, file: &FileConfig) -> anyhow::Result<BridgeConfig> {
        let ws_bind = self.ws_bind.unwrap_or_else(|| file.server.ws_bind.clone());
        let ws_port = self.ws_port.unwrap_or(file.server.ws_port);

        let ws_bind_addr: SocketAddr = format!("{ws_bind}:{ws_port}")
            .parse()
            .with_context(|| format!("invalid WebSocket bind address: '{ws_bind}:{ws_port}'"))?;

        let upstream_addr = match self.upstream.or_else(|| file.server.upstream.clone()) {
            Some(raw) => Some(
                raw.parse::<SocketAddr>()
                    .with_context(|| format!("invalid upstream address: '{raw}'"))?,
            ),
            None => None,
        };

        let sensitivity = file.defaults.sensitivity;
        if !sensitivity.is_finite() || sensitivity <= 0.0 {
            anyhow::bail!("default sensitivity must be a positive number, got {sensitivity}");
        }

        Ok(BridgeConfig {
            ws_bind_addr,
            upstream_addr,
            default_settings: Settings {
                sensitivity,
                invert_scroll: file.defaults.invert_scroll,
            },
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and the config file (if any) is loaded.
/// 2. `tracing_subscriber` is initialised.  `RUST_LOG` wins; otherwise the
///    `--log-level` or `[logging] level` value is used.
/// 3. A [`BridgeConfig`] is built from both sources.
/// 4. A Ctrl+C handler clears a shared `AtomicBool`.
/// 5. [`run_server`] accepts browser connections until the flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FileConfig::default(),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| file.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let config = cli.into_bridge_config(&file)?;

    match config.upstream_addr {
        Some(upstream) => info!(
            "trackpad bridge starting: ws={}, upstream={upstream}",
            config.ws_bind_addr
        ),
        None => info!(
            "trackpad bridge starting: ws={}, no upstream (actions are logged)",
            config.ws_bind_addr
        ),
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("trackpad bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            ws_bind: None,
            ws_port: None,
            upstream: None,
            config: None,
            log_level: None,
        }
    }

    #[test]
    fn test_cli_ws_port_override() {
        // Arrange: override --ws-port
        let cli = Cli::parse_from(["trackpad-bridge", "--ws-port", "9999"]);

        // Assert
        assert_eq!(cli.ws_port, Some(9999));
    }

    #[test]
    fn test_cli_upstream_override() {
        let cli = Cli::parse_from(["trackpad-bridge", "--upstream", "10.0.0.5:7000"]);
        assert_eq!(cli.upstream.as_deref(), Some("10.0.0.5:7000"));
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["trackpad-bridge", "--config", "/etc/trackpad.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/trackpad.toml")));
    }

    #[test]
    fn test_into_bridge_config_defaults() {
        // Arrange: no flags, no file
        let cli = bare_cli();

        // Act
        let config = cli.into_bridge_config(&FileConfig::default()).unwrap();

        // Assert
        assert_eq!(config.ws_bind_addr.to_string(), "0.0.0.0:24810");
        assert!(config.upstream_addr.is_none());
        assert_eq!(config.default_settings, Settings::default());
    }

    #[test]
    fn test_into_bridge_config_uses_file_values() {
        let mut file = FileConfig::default();
        file.server.ws_port = 9100;
        file.server.upstream = Some("127.0.0.1:9200".to_string());
        file.defaults.sensitivity = 2.5;
        file.defaults.invert_scroll = true;

        let config = bare_cli().into_bridge_config(&file).unwrap();

        assert_eq!(config.ws_bind_addr.port(), 9100);
        assert_eq!(config.upstream_addr.unwrap().to_string(), "127.0.0.1:9200");
        assert_eq!(config.default_settings.sensitivity, 2.5);
        assert!(config.default_settings.invert_scroll);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = FileConfig::default();
        file.server.ws_port = 9100;
        file.server.upstream = Some("127.0.0.1:9200".to_string());
        let cli = Cli {
            ws_port: Some(8080),
            upstream: Some("192.168.1.20:9300".to_string()),
            ..bare_cli()
        };

        let config = cli.into_bridge_config(&file).unwrap();

        assert_eq!(config.ws_bind_addr.port(), 8080);
        assert_eq!(
            config.upstream_addr.unwrap().to_string(),
            "192.168.1.20:9300"
        );
    }

    #[test]
    fn test_into_bridge_config_invalid_ws_bind_returns_error() {
        // Arrange: provide an invalid IP address string
        let cli = Cli {
            ws_bind: Some("not.an.ip".to_string()),
            ..bare_cli()
        };

        // Act
        let result = cli.into_bridge_config(&FileConfig::default());

        // Assert: must return an error, not panic
        assert!(result.is_err());
    }

    #[test]
    fn test_into_bridge_config_invalid_upstream_returns_error() {
        let cli = Cli {
            upstream: Some("injector".to_string()),
            ..bare_cli()
        };
        assert!(cli.into_bridge_config(&FileConfig::default()).is_err());
    }

    #[test]
    fn test_into_bridge_config_rejects_zero_sensitivity() {
        let mut file = FileConfig::default();
        file.defaults.sensitivity = 0.0;
        assert!(bare_cli().into_bridge_config(&file).is_err());
    }
}
