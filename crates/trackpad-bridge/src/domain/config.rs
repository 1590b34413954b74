//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! `main.rs` builds it from the optional TOML file and the CLI arguments;
//! tests build it directly.

use std::net::SocketAddr;

use trackpad_core::Settings;

/// Default port the WebSocket server listens on.
pub const DEFAULT_WS_PORT: u16 = 24810;

/// All runtime configuration for the trackpad bridge.
///
/// # Example
///
/// ```rust
/// use trackpad_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 24810);
/// assert!(cfg.upstream_addr.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// The address and port the WebSocket server binds to.
    ///
    /// `0.0.0.0` lets phones on the LAN connect.  Set to `127.0.0.1` when the
    /// page is only opened on the same machine.
    pub ws_bind_addr: SocketAddr,

    /// TCP address of the input injector that receives actions as
    /// newline-delimited JSON.
    ///
    /// `None` logs every action instead of forwarding it.
    pub upstream_addr: Option<SocketAddr>,

    /// Pointer preferences a session starts with, before the browser sends
    /// its own.
    pub default_settings: Settings,
}

impl Default for BridgeConfig {
    /// | Field            | Default                   |
    /// |------------------|---------------------------|
    /// | ws_bind_addr     | `0.0.0.0:24810`           |
    /// | upstream_addr    | none (log actions)        |
    /// | default_settings | sensitivity 1.0, no invert |
    fn default() -> Self {
        Self {
            ws_bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_WS_PORT)),
            upstream_addr: None,
            default_settings: Settings::default(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
