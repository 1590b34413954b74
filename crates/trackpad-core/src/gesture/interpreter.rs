//! The touch-gesture interpreter.
//!
//! [`GestureInterpreter`] turns batches of raw touch-start / touch-move /
//! touch-end contacts into semantic [`Action`]s:
//!
//! | Gesture                                   | Action                      |
//! |-------------------------------------------|-----------------------------|
//! | one finger slides                         | `move`                      |
//! | two fingers slide together                | `scroll`                    |
//! | two fingers spread or close               | `zoom`                      |
//! | 1 / 2 / 3 finger tap                      | left / right / middle click |
//! | tap, then touch again within the timeout  | left-button drag            |
//!
//! The interpreter is a plain mutable struct.  The host owns it, calls one
//! handler at a time, and arms a timer from [`pending_drag_release`] so that
//! a tap's held left button is released when no second touch follows.
//!
//! [`pending_drag_release`]: GestureInterpreter::pending_drag_release

use std::sync::Arc;

use tracing::{debug, trace};

use super::session::SessionState;
use super::thresholds::{
    acceleration, move_threshold, MOVE_THRESHOLDS, PINCH_THRESHOLD, TIMEOUT_MS,
};
use super::touch::{TouchPoint, TouchSet};
use crate::ports::{ActionSender, UserSettings};
use crate::protocol::action::{Action, MouseButton};

/// Converts raw multi-touch input into pointer actions.
pub struct GestureInterpreter {
    sender: Arc<dyn ActionSender>,
    settings: Arc<dyn UserSettings>,
    touches: TouchSet,
    session: SessionState,
    scroll_mode: bool,
    tracking: bool,
}

impl GestureInterpreter {
    /// Creates an idle interpreter that emits to `sender` and reads
    /// preferences from `settings`.
    pub fn new(sender: Arc<dyn ActionSender>, settings: Arc<dyn UserSettings>) -> Self {
        Self {
            sender,
            settings,
            touches: TouchSet::new(),
            session: SessionState::default(),
            scroll_mode: false,
            tracking: false,
        }
    }

    /// Handles contacts that just landed.
    pub fn on_touch_start(&mut self, points: &[TouchPoint], timestamp: f64) {
        if points.is_empty() {
            return;
        }

        if self.touches.is_empty() {
            trace!(timestamp, "gesture session started");
            self.session.begin(timestamp);
        }

        for point in points {
            self.touches.press(point, timestamp);
        }

        if self.touches.len() == 2 {
            self.session.pinch_baseline = self.touches.pinch_distance();
            self.session.pinching = false;
        }

        match self.session.pending_drag_release.take() {
            // The host timer lost the race: the window is already over.
            Some(deadline) if timestamp >= deadline => {
                trace!("touch after release window: releasing tap");
                self.emit(Action::Click {
                    button: MouseButton::Left,
                    press: false,
                });
            }
            Some(_) => {
                debug!("touch during release window: tap upgraded to drag");
                self.session.dragging = true;
            }
            None => {}
        }

        self.tracking = true;
        self.session.last_gap_timestamp = 0.0;
    }

    /// Handles contacts that moved.  Emits at most one action per batch.
    pub fn on_touch_move(&mut self, points: &[TouchPoint], timestamp: f64) {
        let threshold = move_threshold(self.touches.len());
        let (mut sum_x, mut sum_y) = (0.0, 0.0);
        let mut matched = false;

        for point in points {
            let Some(touch) = self.touches.get_mut(point.id) else {
                continue;
            };
            matched = true;

            if !self.session.moved
                && (touch.travel_to(point.x, point.y) > threshold
                    || self.session.elapsed(timestamp) > TIMEOUT_MS)
            {
                self.session.moved = true;
            }

            let dx = point.x - touch.current_x;
            let dy = point.y - touch.current_y;
            let elapsed = timestamp - touch.last_timestamp;
            if elapsed > 0.0 {
                sum_x += dx * acceleration(dx.abs() / elapsed * 1000.0);
                sum_y += dy * acceleration(dy.abs() / elapsed * 1000.0);
            }

            touch.current_x = point.x;
            touch.current_y = point.y;
            touch.last_timestamp = timestamp;
        }

        if matched
            && self.session.moved
            && timestamp - self.session.last_gap_timestamp > TIMEOUT_MS
        {
            self.dispatch(sum_x, sum_y);
        }
    }

    /// Handles contacts that lifted.  Only the identifiers are used.
    pub fn on_touch_end(&mut self, points: &[TouchPoint], timestamp: f64) {
        let released = points
            .iter()
            .filter(|p| self.touches.release(p.id))
            .count();

        self.session.released_count += released;
        self.session.last_gap_timestamp = timestamp;

        if self.touches.len() < 2 {
            self.session.clear_pinch();
        }

        if self.session.released_count > MOVE_THRESHOLDS.len() {
            self.session.moved = true;
        }

        if self.touches.is_empty() && released > 0 {
            self.finish_session(timestamp);
        }
    }

    /// Deadline (ms, event timebase) of the armed drag release, if any.
    pub fn pending_drag_release(&self) -> Option<f64> {
        self.session.pending_drag_release
    }

    /// Releases the left button held by a tap.
    ///
    /// Called by the host when its release timer elapses.  Returns `false`
    /// when nothing was armed (the timer lost a race with a new touch).
    pub fn fire_drag_release(&mut self) -> bool {
        if self.session.pending_drag_release.take().is_none() {
            return false;
        }
        trace!("drag release window elapsed");
        self.emit(Action::Click {
            button: MouseButton::Left,
            press: false,
        });
        true
    }

    /// Fires the armed drag release if `now` has reached its deadline.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.session.pending_drag_release {
            Some(deadline) if now >= deadline => self.fire_drag_release(),
            _ => false,
        }
    }

    /// Forces every movement to scroll regardless of touch count.
    pub fn set_scroll_mode(&mut self, enabled: bool) {
        self.scroll_mode = enabled;
    }

    /// `true` while at least one finger is on the surface.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_dragging(&self) -> bool {
        self.session.dragging
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Drops all touch state.
    ///
    /// Any held left button (armed tap or active drag) is released first so
    /// the remote side never keeps a button down.
    pub fn reset(&mut self) {
        let held = self.session.pending_drag_release.is_some() || self.session.dragging;
        if held {
            self.emit(Action::Click {
                button: MouseButton::Left,
                press: false,
            });
        }
        self.touches.clear();
        self.session = SessionState::default();
        self.tracking = false;
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn dispatch(&mut self, sum_x: f64, sum_y: f64) {
        let sensitivity = self.settings.sensitivity();

        let action = if !self.scroll_mode && self.touches.len() == 2 {
            let current = self.touches.pinch_distance().unwrap_or(0.0);
            let delta = self
                .session
                .pinch_baseline
                .map_or(0.0, |baseline| current - baseline);
            self.session.pinch_baseline = Some(current);

            if self.session.pinching || delta.abs() > PINCH_THRESHOLD {
                if !self.session.pinching {
                    debug!(delta, "pinch recognised");
                }
                self.session.pinching = true;
                Action::Zoom {
                    delta: delta * sensitivity,
                }
            } else {
                self.scroll(sum_x, sum_y, sensitivity)
            }
        } else if self.scroll_mode {
            self.scroll(sum_x, sum_y, sensitivity)
        } else if self.touches.len() == 1 || self.session.dragging {
            Action::Move {
                dx: sum_x * sensitivity,
                dy: sum_y * sensitivity,
            }
        } else {
            return;
        };

        self.emit(action);
    }

    fn scroll(&self, sum_x: f64, sum_y: f64, sensitivity: f64) -> Action {
        let sign = if self.settings.invert_scroll() { -1.0 } else { 1.0 };
        Action::Scroll {
            dx: sum_x * sensitivity * sign,
            dy: sum_y * sensitivity * sign,
        }
    }

    fn finish_session(&mut self, timestamp: f64) {
        self.tracking = false;

        if self.session.dragging {
            debug!("drag finished");
            self.session.dragging = false;
            self.emit(Action::Click {
                button: MouseButton::Left,
                press: false,
            });
        } else if !self.session.moved && self.session.elapsed(timestamp) <= TIMEOUT_MS {
            if let Some(button) = MouseButton::for_tap(self.session.released_count) {
                debug!(button = button.as_str(), "tap recognised");
                self.emit(Action::Click {
                    button,
                    press: true,
                });
                if button == MouseButton::Left {
                    self.session.pending_drag_release = Some(timestamp + TIMEOUT_MS);
                } else {
                    self.emit(Action::Click {
                        button,
                        press: false,
                    });
                }
            }
        }

        trace!(released = self.session.released_count, "gesture session finished");
        self.session.released_count = 0;
    }

    fn emit(&self, action: Action) {
        trace!(kind = action.kind_name(), "emit");
        self.sender.send(action);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
