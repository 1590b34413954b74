//! Fixed gesture thresholds and the pointer acceleration curve.
//!
//! These are compile-time constants, not user settings.  User-facing tuning
//! (sensitivity, invert-scroll) goes through [`crate::ports::UserSettings`].

/// Distance in pixels a touch must travel from its own start point before
/// the session counts as "moved", indexed by active-touch count minus one.
///
/// Touch counts beyond the table reuse the last entry.
pub const MOVE_THRESHOLDS: [f64; 3] = [10.0, 8.0, 6.0];

/// Shared timing window in milliseconds.
///
/// Bounds the tap window, promotes a long unmoved hold to "moved", debounces
/// movement right after a finger lifts, and delays the drag release.
pub const TIMEOUT_MS: f64 = 300.0;

/// Change in inter-touch distance (pixels) that turns a two-finger gesture
/// into a pinch instead of a scroll.
pub const PINCH_THRESHOLD: f64 = 10.0;

/// Largest extra gain the acceleration curve adds on top of 1.0.
pub const ACCEL_MAX_BOOST: f64 = 1.5;

/// Speed (pixels per second) at which the curve reaches ~63% of its boost.
pub const ACCEL_SPEED_SCALE: f64 = 1500.0;

/// Move threshold for `touch_count` simultaneous touches.
pub fn move_threshold(touch_count: usize) -> f64 {
    let idx = touch_count.clamp(1, MOVE_THRESHOLDS.len()) - 1;
    MOVE_THRESHOLDS[idx]
}

/// Maps an instantaneous speed in pixels per second to a gain multiplier.
///
/// Monotonic, never below 1.0, and flattening towards
/// `1.0 + ACCEL_MAX_BOOST` as speed grows.
pub fn acceleration(speed: f64) -> f64 {
    if !speed.is_finite() || speed <= 0.0 {
        return 1.0;
    }
    1.0 + ACCEL_MAX_BOOST * (1.0 - (-speed / ACCEL_SPEED_SCALE).exp())
}

/// Euclidean distance between two points.
pub fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (bx - ax).hypot(by - ay)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
