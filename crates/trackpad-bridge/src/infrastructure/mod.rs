//! Infrastructure layer for trackpad-bridge.
//!
//! The infrastructure layer handles all I/O: accepting WebSocket connections
//! from browsers, forwarding actions upstream, and reading the config file.
//!
//! # Responsibilities
//!
//! - Binding a TCP listener for browser WebSocket connections
//! - Performing the WebSocket HTTP upgrade handshake
//! - Running the drag-release timer for each session
//! - Writing actions to the upstream consumer as JSON lines
//! - Loading the optional TOML config file
//! - Handling the graceful shutdown signal
//!
//! # What does NOT belong here?
//!
//! - Gesture and keyboard semantics (that is `trackpad-core`)
//! - Message type definitions (that is the domain layer)

pub mod action_channel;
pub mod config_file;
pub mod upstream;
pub mod ws_server;

pub use ws_server::{run_server, serve};
