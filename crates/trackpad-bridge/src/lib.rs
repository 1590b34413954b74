//! trackpad-bridge library crate.
//!
//! A WebSocket service that lets a phone browser act as a trackpad and
//! keyboard for another machine.  The page forwards raw touches and keys;
//! the bridge interprets them with `trackpad-core` and streams the resulting
//! actions to an input injector.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over WebSocket)
//!         ↕
//! [trackpad-bridge]
//!   ├── domain/           Pure types: JSON message enums, BridgeConfig
//!   ├── application/      SessionService: messages → interpreter/keyboard
//!   └── infrastructure/
//!         ├── ws_server/      WebSocket accept loop + release timer
//!         ├── action_channel/ ActionSender over a tokio channel
//!         ├── upstream/       JSON-lines TCP forwarder
//!         └── config_file/    Optional TOML file
//!         ↓
//! Input injector (newline-delimited JSON over TCP)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O, no async.
//! - `application` depends on `domain` and `trackpad-core` only.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: per-connection session logic.
pub mod application;

/// Infrastructure layer: WebSocket server, upstream forwarding, config file.
pub mod infrastructure;
