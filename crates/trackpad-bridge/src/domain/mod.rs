//! Domain layer for trackpad-bridge.
//!
//! Pure types with no I/O: the JSON "language" between browser and bridge
//! and the runtime configuration struct.  No `tokio`, sockets, or file
//! access belong here.

pub mod config;
pub mod messages;

pub use config::BridgeConfig;
pub use messages::{BridgeToBrowserMsg, BrowserToBridgeMsg};
