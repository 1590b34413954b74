//! Touch-gesture interpretation.
//!
//! - [`touch`] – contact points and the active-touch set.
//! - [`session`] – per-gesture bookkeeping (moved, released count, drag, pinch).
//! - [`thresholds`] – fixed distances, the shared timeout, and the
//!   acceleration curve.
//! - [`interpreter`] – the state machine tying them together.

pub mod interpreter;
pub mod session;
pub mod thresholds;
pub mod touch;

pub use interpreter::GestureInterpreter;
pub use session::SessionState;
pub use touch::{TouchId, TouchPoint, TrackedTouch};
