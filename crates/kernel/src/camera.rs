use bolts_common::{EngineConfig, NO_LIMIT};
use glam::Vec3;

/// Axis for keyboard fly movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// First-person camera driven by absolute pointer samples.
///
/// `front` is rebuilt from yaw and pitch after every pointer sample. `up` is
/// only ever replaced wholesale through [`Camera::set_camera`]; there is no
/// roll correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    pitch_limit: f32,
    yaw_limit: f32,
    sensitivity: f32,
    last_x: f32,
    last_y: f32,
    first_mouse: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Camera {
    /// Camera at `(0, 0, 3)` looking down `-Z`, with the pointer parked at
    /// the window centre.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            pitch_limit: config.pitch_limit,
            yaw_limit: config.yaw_limit,
            sensitivity: config.mouse_sensitivity,
            last_x: config.window_width as f32 / 2.0,
            last_y: config.window_height as f32 / 2.0,
            first_mouse: true,
        }
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn look_target(&self) -> Vec3 {
        self.position + self.front
    }

    /// Replace the pose. Yaw and pitch are left alone, so the next pointer
    /// sample rebuilds `front` from them.
    pub fn set_camera(&mut self, position: Vec3, front: Vec3, up: Vec3) {
        self.position = position;
        self.front = front;
        self.up = up;
    }

    /// Treat the next pointer sample as the first one after pointer control
    /// was (re)acquired.
    pub fn reset_pointer(&mut self) {
        self.first_mouse = true;
    }

    /// Feed one absolute pointer sample in window coordinates.
    pub fn mouse_input(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
        }

        let offset_x = (x - self.last_x) * self.sensitivity;
        let offset_y = (self.last_y - y) * self.sensitivity;
        self.last_x = x;
        self.last_y = y;

        self.yaw += offset_x;
        self.pitch += offset_y;
        self.pitch = clamp_symmetric(self.pitch, self.pitch_limit);
        self.yaw = clamp_symmetric(self.yaw, self.yaw_limit);

        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }

    /// Move `amount` world units along one of the camera axes.
    pub fn move_along(&mut self, direction: MoveDirection, amount: f32) {
        let delta = match direction {
            MoveDirection::Forward => self.front,
            MoveDirection::Backward => -self.front,
            MoveDirection::Right => self.right(),
            MoveDirection::Left => -self.right(),
            MoveDirection::Up => self.up,
            MoveDirection::Down => -self.up,
        };
        self.position += delta * amount;
    }
}

/// Clamp to `[-limit, limit]` unless `limit` is the disabled sentinel.
fn clamp_symmetric(value: f32, limit: f32) -> f32 {
    if limit == NO_LIMIT {
        return value;
    }
    if value > limit {
        limit
    } else if value < -limit {
        -limit
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn default_pose() {
        let cam = Camera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.front(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(cam.up(), Vec3::Y);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn first_sample_produces_no_rotation() {
        let mut cam = Camera::default();
        cam.mouse_input(100.0, 700.0);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert!(approx(cam.front(), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn samples_rotate_by_sensitivity() {
        let mut cam = Camera::default();
        cam.mouse_input(600.0, 450.0);
        cam.mouse_input(610.0, 440.0);
        assert!((cam.yaw() - -89.0).abs() < EPS);
        assert!((cam.pitch() - 1.0).abs() < EPS);
        assert!((cam.front().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn pitch_clamp_pins_and_stays() {
        let config = EngineConfig {
            pitch_limit: 45.0,
            ..EngineConfig::default()
        };
        let mut cam = Camera::new(&config);
        cam.mouse_input(0.0, 1000.0);
        // 1000 units up at 0.1 deg per unit would be 100 degrees
        cam.mouse_input(0.0, 0.0);
        assert_eq!(cam.pitch(), 45.0);
        cam.mouse_input(0.0, -1000.0);
        assert_eq!(cam.pitch(), 45.0);
        cam.mouse_input(0.0, 2000.0);
        assert_eq!(cam.pitch(), -45.0);
    }

    #[test]
    fn yaw_clamp_applies_to_yaw_only() {
        let config = EngineConfig {
            yaw_limit: 30.0,
            ..EngineConfig::default()
        };
        let mut cam = Camera::new(&config);
        // starting yaw of -90 is outside the limit and snaps to -30
        cam.mouse_input(0.0, 0.0);
        assert_eq!(cam.yaw(), -30.0);
        assert_eq!(cam.pitch(), 0.0);
        cam.mouse_input(10.0, 0.0);
        assert!((cam.yaw() - -29.0).abs() < EPS);
    }

    #[test]
    fn unlimited_pitch_is_not_clamped() {
        let mut cam = Camera::default();
        cam.mouse_input(0.0, 1000.0);
        cam.mouse_input(0.0, 0.0);
        assert!((cam.pitch() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn reset_pointer_reseeds() {
        let mut cam = Camera::default();
        cam.mouse_input(0.0, 0.0);
        cam.reset_pointer();
        cam.mouse_input(500.0, 500.0);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn up_is_not_touched_by_rotation() {
        let mut cam = Camera::default();
        cam.set_camera(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 1.0));
        cam.mouse_input(0.0, 0.0);
        cam.mouse_input(50.0, 20.0);
        assert_eq!(cam.up(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn movement_follows_camera_axes() {
        let mut cam = Camera::default();
        cam.move_along(MoveDirection::Forward, 2.0);
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, 1.0)));
        cam.move_along(MoveDirection::Right, 1.0);
        assert!(approx(cam.position, Vec3::new(1.0, 0.0, 1.0)));
        cam.move_along(MoveDirection::Down, 0.5);
        assert!(approx(cam.position, Vec3::new(1.0, -0.5, 1.0)));
        assert!(approx(cam.look_target(), Vec3::new(1.0, -0.5, 0.0)));
    }
}
