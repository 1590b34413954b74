//! # trackpad-core
//!
//! Shared library for the trackpad bridge containing the touch-gesture
//! interpreter, the keyboard side channel, and the action schema handed to
//! the input injector.
//!
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview
//!
//! A phone or tablet browser acts as a trackpad for another machine.  The
//! browser forwards raw touch contacts and key presses; this crate decides
//! what they mean:
//!
//! - **`gesture`** – The [`GestureInterpreter`]: tracks every finger on the
//!   surface and classifies the motion as a pointer move, a two-finger
//!   scroll, a pinch zoom, a 1/2/3-finger tap, or a tap-and-drag.
//!
//! - **`keyboard`** – The [`KeyboardInput`] channel: passes keys and text
//!   through, or collects them into key combos while the browser's
//!   modifier button is engaged.
//!
//! - **`protocol`** – The [`Action`] enum, the only thing that leaves the
//!   core.
//!
//! - **`ports`** – The [`ActionSender`] and [`UserSettings`] traits the host
//!   implements.

pub mod gesture;
pub mod keyboard;
pub mod ports;
pub mod protocol;

pub use gesture::{GestureInterpreter, TouchPoint};
pub use keyboard::{KeyboardInput, ModifierState};
pub use ports::{ActionSender, RecordingSender, Settings, SharedSettings, UserSettings};
pub use protocol::action::{Action, MouseButton};
