//! Application layer for trackpad-bridge.
//!
//! The application layer decides *what* a browser message means for the
//! input session; the infrastructure layer decides *how* it arrives and
//! where the resulting actions go.
//!
//! # Responsibilities
//!
//! - Routing browser messages to the gesture interpreter and keyboard channel
//! - Validating settings before they reach the interpreter
//! - Producing the feedback messages sent back to the browser
//! - Defining the `BridgeError` type for application-level failures
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (that is infrastructure)
//! - Arming the drag-release timer (the session only reports the delay)
//! - WebSocket framing (handled by tokio-tungstenite)

pub mod session_service;

pub use session_service::{BridgeError, SessionService};
