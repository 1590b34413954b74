//! Keyboard and text side channel.
//!
//! Keys and composed text normally pass straight through as `key` / `text`
//! actions.  The browser's modifier button switches the channel into a
//! capture mode where keys are collected into a combo instead:
//!
//! ```text
//!            set_state(Active)            set_state(Hold)
//!  Release ─────────────────────▶ Active ────────────────▶ Hold
//!     ▲                             │                       │
//!     └──── confirm / cancel / Esc ─┴───────────────────────┘
//! ```
//!
//! - **Release**: passthrough.
//! - **Active**: keys are buffered; `confirm` sends them as one combo.
//! - **Hold**: keys are buffered; each non-modifier key completes a combo
//!   with the buffered modifiers, which stay held for the next one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::ActionSender;
use crate::protocol::action::Action;

/// Keys that stay buffered across combos in [`ModifierState::Hold`].
pub const MODIFIER_KEYS: [&str; 4] = ["Control", "Shift", "Alt", "Meta"];

const ESCAPE: &str = "Escape";
const BACKSPACE: &str = "Backspace";

/// Returns `true` for `Control`, `Shift`, `Alt`, and `Meta`.
pub fn is_modifier(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}

/// Capture mode of the keyboard channel, driven by the browser UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierState {
    #[default]
    Release,
    Active,
    Hold,
}

/// Translates raw key and text input into actions.
pub struct KeyboardInput {
    sender: Arc<dyn ActionSender>,
    state: ModifierState,
    buffer: Vec<String>,
}

impl KeyboardInput {
    pub fn new(sender: Arc<dyn ActionSender>) -> Self {
        Self {
            sender,
            state: ModifierState::Release,
            buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> ModifierState {
        self.state
    }

    /// Keys captured so far, in press order.
    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    /// Switches capture mode.  Returning to `Release` discards the buffer.
    pub fn set_state(&mut self, state: ModifierState) {
        if state == ModifierState::Release {
            self.buffer.clear();
        }
        debug!(from = ?self.state, to = ?state, "modifier state changed");
        self.state = state;
    }

    /// Handles one key, named as `KeyboardEvent.key` names it.
    pub fn handle_key(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }

        match self.state {
            ModifierState::Release => self.sender.send(Action::Key {
                key: key.to_string(),
            }),
            ModifierState::Active | ModifierState::Hold => self.capture(key),
        }
    }

    /// Handles composed text.  While capturing, each character is buffered
    /// as its own key.
    pub fn handle_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        match self.state {
            ModifierState::Release => self.sender.send(Action::Text {
                text: text.to_string(),
            }),
            ModifierState::Active | ModifierState::Hold => {
                let mut utf8 = [0u8; 4];
                for ch in text.chars() {
                    self.capture(ch.encode_utf8(&mut utf8));
                }
            }
        }
    }

    /// Sends the buffered keys as one combo and returns to passthrough.
    pub fn confirm(&mut self) {
        if !self.buffer.is_empty() {
            let keys = std::mem::take(&mut self.buffer);
            debug!(len = keys.len(), "combo confirmed");
            self.sender.send(Action::Combo { keys });
        }
        self.state = ModifierState::Release;
    }

    /// Discards the buffered keys and returns to passthrough.
    pub fn cancel(&mut self) {
        if !self.buffer.is_empty() {
            debug!(len = self.buffer.len(), "combo discarded");
        }
        self.buffer.clear();
        self.state = ModifierState::Release;
    }

    fn capture(&mut self, key: &str) {
        match key {
            ESCAPE => self.cancel(),
            BACKSPACE => {
                self.buffer.pop();
            }
            _ if self.state == ModifierState::Hold && !is_modifier(key) => {
                let mut keys = self.buffer.clone();
                keys.push(key.to_string());
                self.sender.send(Action::Combo { keys });
                self.buffer.retain(|k| is_modifier(k));
            }
            _ => {
                if !self.buffer.iter().any(|k| k == key) {
                    self.buffer.push(key.to_string());
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
