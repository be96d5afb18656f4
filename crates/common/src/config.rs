use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentinel that disables a pitch or yaw clamp.
pub const NO_LIMIT: f32 = -1.0;

/// Startup configuration for the engine.
///
/// Plain scalars, filled in once before the frame loop starts and never
/// written afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    /// Draw a cubemap skybox instead of the flat gradient background.
    pub skybox_enabled: bool,
    /// Directory holding the six skybox face images.
    pub skybox_dir: PathBuf,
    /// Symmetric pitch clamp in degrees, or [`NO_LIMIT`].
    pub pitch_limit: f32,
    /// Symmetric yaw clamp in degrees, or [`NO_LIMIT`].
    pub yaw_limit: f32,
    /// Degrees of rotation per pointer unit.
    pub mouse_sensitivity: f32,
    /// Camera movement in world units per second.
    pub move_speed: f32,
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub light_position: Vec3,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 900,
            window_title: "Bolts Engine".into(),
            skybox_enabled: false,
            skybox_dir: PathBuf::from("skybox"),
            pitch_limit: NO_LIMIT,
            yaw_limit: NO_LIMIT,
            mouse_sensitivity: 0.1,
            move_speed: 2.5,
            fov_degrees: 45.0,
            z_near: 0.1,
            z_far: 500.0,
            light_position: Vec3::new(0.0, 100.0, 0.0),
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {0}x{1}")]
    ZeroWindow(u32, u32),
    #[error("field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={0} far={1}")]
    ClipPlanes(f32, f32),
    #[error("mouse sensitivity must be finite, got {0}")]
    Sensitivity(f32),
}

impl EngineConfig {
    /// Width over height of the configured window.
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }

    /// Reject values the renderer or camera cannot work with.
    ///
    /// Pitch and yaw limits are not checked: `-1` is the "unbounded"
    /// sentinel and any other value is taken literally.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::ZeroWindow(
                self.window_width,
                self.window_height,
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if !(self.z_near > 0.0 && self.z_near < self.z_far) {
            return Err(ConfigError::ClipPlanes(self.z_near, self.z_far));
        }
        if !self.mouse_sensitivity.is_finite() {
            return Err(ConfigError::Sensitivity(self.mouse_sensitivity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_template() {
        let cfg = EngineConfig::default();
        assert_eq!((cfg.window_width, cfg.window_height), (1200, 900));
        assert!(!cfg.skybox_enabled);
        assert_eq!(cfg.pitch_limit, NO_LIMIT);
        assert_eq!(cfg.yaw_limit, NO_LIMIT);
        assert_eq!(cfg.mouse_sensitivity, 0.1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let cfg = EngineConfig {
            window_width: 0,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWindow(0, 900)));
    }

    #[test]
    fn validate_rejects_inverted_clip_planes() {
        let cfg = EngineConfig {
            z_near: 10.0,
            z_far: 1.0,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ClipPlanes(..))));
    }

    #[test]
    fn aspect_ratio_uses_window_size() {
        let cfg = EngineConfig::default();
        assert!((cfg.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }
}
