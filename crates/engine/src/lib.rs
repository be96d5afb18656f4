//! Engine: startup, per-frame protocol and the pause state machine.
//!
//! # Invariants
//! - All mutable engine state lives in one [`EngineState`] owned by the loop.
//! - Frames run their steps in a fixed order; a close request is honoured
//!   only at a frame boundary.
//! - `Terminated` is final.
//! - The pause key toggles once per press however long it is held.

mod clock;
mod engine;
mod error;
mod frame;
mod gameplay;
pub mod scene;
mod state;

pub use clock::{FrameClock, MAX_DELTA};
pub use engine::{BACKGROUND_PROGRAM, Engine, LIT_PROGRAM, SKYBOX_PROGRAM, UI_PROGRAM};
pub use error::EngineError;
pub use frame::{Backdrop, FrameController, FrameReport, Programs};
pub use gameplay::{Gameplay, NoGameplay};
pub use state::{EngineState, FrameState};
