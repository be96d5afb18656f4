use bolts_common::EngineConfig;
use bolts_input::Bindings;
use bolts_kernel::{Camera, PhysicalWorld};
use glam::{Mat3, Mat4};
use serde::Serialize;

/// Top-level frame state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameState {
    Active,
    Paused,
    /// Terminal. Nothing leaves this state.
    Terminated,
}

/// Everything the frame loop mutates, owned by the loop and passed down by
/// reference.
#[derive(Debug)]
pub struct EngineState {
    pub config: EngineConfig,
    pub camera: Camera,
    pub world: PhysicalWorld,
    pub bindings: Bindings,
    frame: FrameState,
    pointer_locked: bool,
    close_requested: bool,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> Self {
        let camera = Camera::new(&config);
        Self {
            config,
            camera,
            world: PhysicalWorld::new(),
            bindings: Bindings::default(),
            frame: FrameState::Active,
            pointer_locked: true,
            close_requested: false,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.frame == FrameState::Paused
    }

    pub fn is_terminated(&self) -> bool {
        self.frame == FrameState::Terminated
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Ask the loop to stop. Honoured at the start of the next frame.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub(crate) fn terminate(&mut self) {
        if self.frame != FrameState::Terminated {
            tracing::info!("engine terminated");
        }
        self.frame = FrameState::Terminated;
    }

    /// Flip between active and paused. Pausing releases the pointer;
    /// resuming grabs it again and reseeds the camera's pointer tracking.
    /// Resuming always re-grabs, even if the pointer was released with the
    /// lock toggle before pausing.
    pub(crate) fn toggle_pause(&mut self) {
        match self.frame {
            FrameState::Active => {
                self.frame = FrameState::Paused;
                self.pointer_locked = false;
                tracing::info!("paused");
            }
            FrameState::Paused => {
                self.frame = FrameState::Active;
                self.set_pointer_locked(true);
                tracing::info!("resumed");
            }
            FrameState::Terminated => {}
        }
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        if locked && !self.pointer_locked {
            self.camera.reset_pointer();
        }
        self.pointer_locked = locked;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            self.camera.position,
            self.camera.look_target(),
            self.camera.up(),
        )
    }

    /// View matrix with translation stripped, for the skybox.
    pub fn sky_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            self.config.aspect_ratio(),
            self.config.z_near,
            self.config.z_far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn starts_active_with_pointer_locked() {
        let state = EngineState::new(EngineConfig::default());
        assert_eq!(state.frame_state(), FrameState::Active);
        assert!(state.pointer_locked());
        assert!(!state.close_requested());
    }

    #[test]
    fn pause_releases_pointer_and_resume_regrabs() {
        let mut state = EngineState::new(EngineConfig::default());
        state.toggle_pause();
        assert!(state.is_paused());
        assert!(!state.pointer_locked());
        state.toggle_pause();
        assert_eq!(state.frame_state(), FrameState::Active);
        assert!(state.pointer_locked());
    }

    #[test]
    fn resume_regrabs_pointer_released_before_pause() {
        let mut state = EngineState::new(EngineConfig::default());
        state.set_pointer_locked(false);
        state.toggle_pause();
        state.toggle_pause();
        assert!(state.pointer_locked());
    }

    #[test]
    fn terminated_is_sticky() {
        let mut state = EngineState::new(EngineConfig::default());
        state.terminate();
        state.toggle_pause();
        assert!(state.is_terminated());
    }

    #[test]
    fn sky_view_has_no_translation() {
        let mut state = EngineState::new(EngineConfig::default());
        state.camera.position = Vec3::new(5.0, 6.0, 7.0);
        let sky = state.sky_view_matrix();
        assert_eq!(sky.w_axis, glam::Vec4::W);
        assert_ne!(state.view_matrix().w_axis, glam::Vec4::W);
    }
}
