//! JSON message types for the browser-facing WebSocket protocol.
//!
//! The browser is a thin capture surface: it forwards raw touch contacts,
//! key presses, and UI toggles, and the bridge decides what they mean.
//!
//! # Message flow
//!
//! ```text
//! Browser → Bridge:  JSON text frame  →  BrowserToBridgeMsg
//! Bridge  → Browser: BridgeToBrowserMsg  →  JSON text frame
//! ```
//!
//! # JSON discriminant
//!
//! Every message is a JSON object with a `"type"` field that identifies the
//! variant.  All other fields are flattened into the same object:
//!
//! ```json
//! {"type":"TouchMove","touches":[{"id":0,"x":120.5,"y":88.0}],"timestamp":5123.4}
//! ```
//!
//! Touch timestamps are the browser's `TouchEvent.timeStamp`, in
//! milliseconds.  They only need to be monotonic within one connection.

use serde::{Deserialize, Serialize};
use trackpad_core::{ModifierState, TouchPoint};

// ── Browser → Bridge messages ─────────────────────────────────────────────────

/// All messages that a browser can send to the bridge over WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BrowserToBridgeMsg {
    /// Contacts that just landed (`TouchEvent.changedTouches` of `touchstart`).
    TouchStart {
        touches: Vec<TouchPoint>,
        timestamp: f64,
    },

    /// Contacts that moved.
    TouchMove {
        touches: Vec<TouchPoint>,
        timestamp: f64,
    },

    /// Contacts that lifted or were cancelled.  Positions are ignored.
    TouchEnd {
        touches: Vec<TouchPoint>,
        timestamp: f64,
    },

    /// A single key press, named as `KeyboardEvent.key` names it.
    Key { key: String },

    /// Composed text from the on-screen keyboard or an IME.
    Text { text: String },

    /// The modifier button changed capture mode.
    Modifier { state: ModifierState },

    /// Send the captured keys as one combo.
    ComboConfirm,

    /// Discard the captured keys.
    ComboCancel,

    /// The scroll toggle changed: when enabled every movement scrolls.
    ScrollMode { enabled: bool },

    /// The user's pointer preferences, sent on connect and on every change.
    Settings {
        /// Must be a finite number greater than zero.
        sensitivity: f64,
        invert_scroll: bool,
    },
}

// ── Bridge → Browser messages ─────────────────────────────────────────────────

/// All messages that the bridge sends to the browser over WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeToBrowserMsg {
    /// Whether a finger is currently on the surface.  Sent on change only;
    /// the page uses it to highlight the trackpad area.
    Tracking { active: bool },

    /// Settings were accepted and apply from the next action on.
    SettingsAck {
        sensitivity: f64,
        invert_scroll: bool,
    },

    /// A message was understood but rejected.
    Error {
        /// Human-readable description (for the console; not for end users).
        description: String,
    },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
