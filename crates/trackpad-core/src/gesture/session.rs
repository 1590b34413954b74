//! Per-gesture bookkeeping.

/// State for one contiguous gesture, from the first finger down to the last
/// finger up.
///
/// `dragging` and `pending_drag_release` deliberately outlive a session: a
/// tap arms the release, and the next session's first touch upgrades it
/// into a drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Timestamp (ms) of the session's first contact.
    pub start_timestamp: f64,
    /// Sticky within a session once set.
    pub moved: bool,
    /// Timestamp (ms) of the most recent touch-end; 0 after a touch-start.
    pub last_gap_timestamp: f64,
    /// Touches lifted since the surface was last empty.
    pub released_count: usize,
    /// Left button is held on behalf of a drag.
    pub dragging: bool,
    /// Deadline (ms) at which the held left button of a tap is released.
    pub pending_drag_release: Option<f64>,
    /// Last distance between the first two touches.
    pub pinch_baseline: Option<f64>,
    pub pinching: bool,
}

impl SessionState {
    /// Starts a new session at `timestamp`.
    pub fn begin(&mut self, timestamp: f64) {
        self.start_timestamp = timestamp;
        self.moved = false;
    }

    /// Milliseconds since the session began.
    pub fn elapsed(&self, timestamp: f64) -> f64 {
        timestamp - self.start_timestamp
    }

    pub fn clear_pinch(&mut self) {
        self.pinch_baseline = None;
        self.pinching = false;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
