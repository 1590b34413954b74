//! Raw contact points and the set of touches currently on the surface.

use serde::{Deserialize, Serialize};

use super::thresholds::distance;

/// Identifier the input source assigns to a contact.
pub type TouchId = i64;

/// One contact point as delivered by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: TouchId,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: TouchId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// A contact that is currently down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedTouch {
    pub identifier: TouchId,
    pub current_x: f64,
    pub current_y: f64,
    /// Where the contact first landed.  Fixed for the touch's lifetime.
    pub start_x: f64,
    pub start_y: f64,
    /// Timestamp (ms) of the last update.
    pub last_timestamp: f64,
}

impl TrackedTouch {
    fn from_point(point: &TouchPoint, timestamp: f64) -> Self {
        Self {
            identifier: point.id,
            current_x: point.x,
            current_y: point.y,
            start_x: point.x,
            start_y: point.y,
            last_timestamp: timestamp,
        }
    }

    /// Distance from the landing point to `(x, y)`.
    pub fn travel_to(&self, x: f64, y: f64) -> f64 {
        distance(self.start_x, self.start_y, x, y)
    }
}

/// Active touches in insertion order, at most one per identifier.
#[derive(Debug, Clone, Default)]
pub struct TouchSet {
    touches: Vec<TrackedTouch>,
}

impl TouchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedTouch> {
        self.touches.iter()
    }

    pub fn get_mut(&mut self, id: TouchId) -> Option<&mut TrackedTouch> {
        self.touches.iter_mut().find(|t| t.identifier == id)
    }

    /// Inserts a new touch, or overwrites the one already using `point.id`.
    ///
    /// An overwrite keeps the touch's position in the set but resets its
    /// start point, as if it had just landed.
    pub fn press(&mut self, point: &TouchPoint, timestamp: f64) {
        let touch = TrackedTouch::from_point(point, timestamp);
        match self.get_mut(point.id) {
            Some(existing) => *existing = touch,
            None => self.touches.push(touch),
        }
    }

    /// Removes the touch with `id`.  Returns `false` if it was not tracked.
    pub fn release(&mut self, id: TouchId) -> bool {
        match self.touches.iter().position(|t| t.identifier == id) {
            Some(idx) => {
                self.touches.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Distance between the first two touches, if at least two are down.
    pub fn pinch_distance(&self) -> Option<f64> {
        match self.touches.as_slice() {
            [a, b, ..] => Some(distance(a.current_x, a.current_y, b.current_x, b.current_y)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
