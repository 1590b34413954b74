//! The action schema handed from the interpreter to the transport.

pub mod action;

pub use action::{Action, MouseButton};
