use crate::state::EngineState;
use bolts_input::InputFrame;
use bolts_render::{ProgramHandle, Renderer};

/// Game-specific hooks called by the frame controller.
///
/// Both hooks run only while the engine is active.
pub trait Gameplay {
    /// Runs after input has been routed to the camera.
    fn update(&mut self, _state: &mut EngineState, _input: &InputFrame, _dt: f32) {}

    /// Runs after the registry and transient objects are drawn. `program`
    /// is the lit program with this frame's matrices already set.
    fn draw(&mut self, _state: &EngineState, _renderer: &mut dyn Renderer, _program: ProgramHandle) {}
}

/// Gameplay that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGameplay;

impl Gameplay for NoGameplay {}
