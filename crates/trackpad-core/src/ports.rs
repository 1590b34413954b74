//! Collaborator seams of the interpreter.
//!
//! The interpreter never performs I/O itself.  It reads user preferences
//! through [`UserSettings`] and hands every action to an [`ActionSender`].
//! The bridge supplies channel-backed implementations; tests use
//! [`RecordingSender`] and the mockall-generated `MockUserSettings`.

use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::protocol::action::Action;

/// Default pointer sensitivity multiplier.
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

/// Receives every action the interpreter or keyboard channel produces.
///
/// Fire-and-forget: the caller never waits for delivery and ignores any
/// failure.  Queuing and backpressure belong to the implementation.
pub trait ActionSender: Send + Sync {
    /// Queues `action` for delivery.
    fn send(&self, action: Action);
}

/// Read-only view of the user's pointer preferences.
///
/// Read on every dispatch, never cached, so a change made mid-gesture
/// applies to the very next emitted action.
#[cfg_attr(test, mockall::automock)]
pub trait UserSettings: Send + Sync {
    /// Positive multiplier applied to move, scroll, and zoom magnitudes.
    fn sensitivity(&self) -> f64;

    /// When `true`, scroll deltas are negated ("natural" scrolling).
    fn invert_scroll(&self) -> bool;
}

/// A snapshot of the user's pointer preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub sensitivity: f64,
    pub invert_scroll: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            invert_scroll: false,
        }
    }
}

impl UserSettings for Settings {
    fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    fn invert_scroll(&self) -> bool {
        self.invert_scroll
    }
}

/// Settings store shared between the session that updates it and the
/// interpreter that reads it.
///
/// Cloning yields another handle to the same values.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    /// Creates a store holding `initial`.
    pub fn new(initial: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Returns the current values.
    pub fn get(&self) -> Settings {
        // A poisoned lock still holds a fully written `Copy` value.
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces the current values.
    pub fn set(&self, settings: Settings) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }
}

impl UserSettings for SharedSettings {
    fn sensitivity(&self) -> f64 {
        self.get().sensitivity
    }

    fn invert_scroll(&self) -> bool {
        self.get().invert_scroll
    }
}

/// An [`ActionSender`] that keeps every action in memory.
///
/// Used by tests and benchmarks to observe exactly what was emitted and in
/// what order.
#[derive(Debug, Default)]
pub struct RecordingSender {
    actions: Mutex<Vec<Action>>,
}

impl RecordingSender {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn actions(&self) -> Vec<Action> {
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<Action> {
        std::mem::take(&mut *self.actions.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl ActionSender for RecordingSender {
    fn send(&self, action: Action) {
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
