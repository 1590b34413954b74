//! Semantic input actions emitted by the interpreter.
//!
//! An [`Action`] is the only thing that leaves the core.  The bridge hands
//! each one to its forwarder, which serialises it as one JSON object per line
//! for the upstream input injector.
//!
//! # JSON discriminant
//!
//! Every action is a JSON object with a `"kind"` field naming the variant;
//! the remaining fields sit next to it in the same object:
//!
//! ```json
//! {"kind":"move","dx":3.5,"dy":-1.0}
//! {"kind":"click","button":"left","press":true}
//! {"kind":"combo","keys":["Control","c"]}
//! ```

use serde::{Deserialize, Serialize};

/// Pointer button addressed by a [`Action::Click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Maps the number of fingers lifted in a tap to the button it clicks.
    ///
    /// One finger is a left click, two a right click, three a middle click.
    /// Any other count has no button.
    pub fn for_tap(fingers: usize) -> Option<Self> {
        match fingers {
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Middle),
            _ => None,
        }
    }

    /// Lower-case name used on the wire and in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        }
    }
}

/// One semantic input action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Relative pointer movement in remote pixels.
    Move { dx: f64, dy: f64 },

    /// Two-finger (or forced) scroll.  Sign already reflects invert-scroll.
    Scroll { dx: f64, dy: f64 },

    /// Pinch zoom.  Positive when the fingers spread apart.
    Zoom { delta: f64 },

    /// Button press (`press = true`) or release (`press = false`).
    Click { button: MouseButton, press: bool },

    /// A single key, named the way the browser's `KeyboardEvent.key` names it.
    Key { key: String },

    /// Composed text (IME output, autocorrect, paste).
    Text { text: String },

    /// Keys pressed together, in the order they were captured.
    Combo { keys: Vec<String> },
}

impl Action {
    /// Short variant name for log lines.
    ///
    /// Never includes field values, so typed text does not end up in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Scroll { .. } => "scroll",
            Self::Zoom { .. } => "zoom",
            Self::Click { .. } => "click",
            Self::Key { .. } => "key",
            Self::Text { .. } => "text",
            Self::Combo { .. } => "combo",
        }
    }

    /// One-line description for the log-only delivery path.
    ///
    /// Pointer actions keep their values.  Keys, text and combos are reduced
    /// to their size.
    pub fn log_summary(&self) -> String {
        match self {
            Self::Move { dx, dy } => format!("move dx={dx:.1} dy={dy:.1}"),
            Self::Scroll { dx, dy } => format!("scroll dx={dx:.1} dy={dy:.1}"),
            Self::Zoom { delta } => format!("zoom delta={delta:.1}"),
            Self::Click { button, press } => format!(
                "click {} {}",
                button.as_str(),
                if *press { "press" } else { "release" }
            ),
            Self::Key { .. } => "key".to_string(),
            Self::Text { text } => format!("text ({} chars)", text.chars().count()),
            Self::Combo { keys } => format!("combo ({} keys)", keys.len()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
