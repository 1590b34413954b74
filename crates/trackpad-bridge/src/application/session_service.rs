//! Per-connection input session.
//!
//! [`SessionService`] owns everything one browser connection needs: a
//! gesture interpreter, a keyboard channel, and the settings store both
//! read from.  It applies one [`BrowserToBridgeMsg`] at a time and returns
//! the feedback messages for the browser.  Actions leave through the
//! [`ActionSender`] given at construction.
//!
//! No I/O happens here.  The infrastructure layer owns the socket and the
//! drag-release timer; it asks [`SessionService::pending_release_delay`]
//! after every message and calls [`SessionService::fire_drag_release`] when
//! its timer elapses.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use trackpad_core::gesture::thresholds::TIMEOUT_MS;
use trackpad_core::{
    ActionSender, GestureInterpreter, KeyboardInput, Settings, SharedSettings,
};

use crate::domain::messages::{BridgeToBrowserMsg, BrowserToBridgeMsg};

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur while applying a browser message.
///
/// These are business-logic failures (well-formed JSON with unusable
/// values), not I/O errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A field value was semantically invalid.
    #[error("invalid field value: {0}")]
    InvalidField(String),
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Input state for one browser connection.
pub struct SessionService {
    interpreter: GestureInterpreter,
    keyboard: KeyboardInput,
    settings: SharedSettings,
    /// Last tracking state reported to the browser.
    reported_tracking: bool,
    /// Timestamp of the most recent touch message.
    last_timestamp: f64,
}

impl SessionService {
    /// Creates a session that emits to `sender`, starting from `initial`
    /// settings.
    pub fn new(sender: Arc<dyn ActionSender>, initial: Settings) -> Self {
        let settings = SharedSettings::new(initial);
        Self {
            interpreter: GestureInterpreter::new(
                Arc::clone(&sender),
                Arc::new(settings.clone()),
            ),
            keyboard: KeyboardInput::new(sender),
            settings,
            reported_tracking: false,
            last_timestamp: 0.0,
        }
    }

    /// Applies one browser message.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidField`] for settings with a
    /// non-positive or non-finite sensitivity.  The session is unchanged in
    /// that case.
    pub fn handle(
        &mut self,
        msg: BrowserToBridgeMsg,
    ) -> Result<Vec<BridgeToBrowserMsg>, BridgeError> {
        match msg {
            BrowserToBridgeMsg::TouchStart { touches, timestamp } => {
                self.last_timestamp = timestamp;
                self.interpreter.on_touch_start(&touches, timestamp);
            }
            BrowserToBridgeMsg::TouchMove { touches, timestamp } => {
                self.last_timestamp = timestamp;
                self.interpreter.on_touch_move(&touches, timestamp);
            }
            BrowserToBridgeMsg::TouchEnd { touches, timestamp } => {
                self.last_timestamp = timestamp;
                self.interpreter.on_touch_end(&touches, timestamp);
            }
            BrowserToBridgeMsg::Key { key } => self.keyboard.handle_key(&key),
            BrowserToBridgeMsg::Text { text } => self.keyboard.handle_text(&text),
            BrowserToBridgeMsg::Modifier { state } => self.keyboard.set_state(state),
            BrowserToBridgeMsg::ComboConfirm => self.keyboard.confirm(),
            BrowserToBridgeMsg::ComboCancel => self.keyboard.cancel(),
            BrowserToBridgeMsg::ScrollMode { enabled } => {
                debug!(enabled, "scroll mode changed");
                self.interpreter.set_scroll_mode(enabled);
            }
            BrowserToBridgeMsg::Settings {
                sensitivity,
                invert_scroll,
            } => {
                if !sensitivity.is_finite() || sensitivity <= 0.0 {
                    return Err(BridgeError::InvalidField(format!(
                        "sensitivity must be a positive number, got {sensitivity}"
                    )));
                }
                let settings = Settings {
                    sensitivity,
                    invert_scroll,
                };
                self.settings.set(settings);
                debug!(sensitivity, invert_scroll, "settings updated");
                return Ok(vec![BridgeToBrowserMsg::SettingsAck {
                    sensitivity,
                    invert_scroll,
                }]);
            }
        }

        Ok(self.tracking_change().into_iter().collect())
    }

    /// How long the host should wait before calling
    /// [`fire_drag_release`](Self::fire_drag_release), if a tap left the
    /// left button held.
    pub fn pending_release_delay(&self) -> Option<Duration> {
        self.interpreter.pending_drag_release().map(|deadline| {
            let remaining = (deadline - self.last_timestamp).clamp(0.0, TIMEOUT_MS);
            Duration::from_secs_f64(remaining / 1000.0)
        })
    }

    /// Releases the held left button.  Returns `false` if nothing was armed.
    pub fn fire_drag_release(&mut self) -> bool {
        self.interpreter.fire_drag_release()
    }

    /// Ends the session: releases any held button and drops buffered keys.
    pub fn close(&mut self) {
        self.interpreter.reset();
        self.keyboard.cancel();
        self.reported_tracking = false;
    }

    /// Current pointer preferences.
    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    fn tracking_change(&mut self) -> Option<BridgeToBrowserMsg> {
        let active = self.interpreter.is_tracking();
        if active == self.reported_tracking {
            return None;
        }
        self.reported_tracking = active;
        Some(BridgeToBrowserMsg::Tracking { active })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
