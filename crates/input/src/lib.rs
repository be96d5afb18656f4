//! Input routing: raw key levels and pointer samples mapped to engine actions.
//!
//! # Invariants
//! - Key state is level-triggered; toggles go through a [`ToggleLatch`].
//! - Consumers see actions and pointer samples, never backend events.

pub mod action;
mod keys;
mod latch;
mod source;

pub use action::{Action, Bindings};
pub use keys::{Key, KeyboardState, UnknownKey};
pub use latch::ToggleLatch;
pub use source::{InputFrame, InputSource, ScriptedInput};
