use bolts_input::{InputFrame, InputSource, Key, KeyboardState};
use winit::keyboard::KeyCode;

/// Input gathered from winit events between two frames.
///
/// Relative mouse motion is integrated into a virtual pointer position so
/// the engine sees absolute samples even while the cursor is grabbed.
#[derive(Debug, Default)]
pub struct WinitInput {
    keys: KeyboardState,
    pointer: (f32, f32),
    samples: Vec<(f32, f32)>,
    close_requested: bool,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(key) = map_key(code) {
            self.keys.set(key, pressed);
        }
    }

    pub fn pointer_moved(&mut self, dx: f64, dy: f64) {
        self.pointer.0 += dx as f32;
        self.pointer.1 += dy as f32;
        self.samples.push(self.pointer);
    }

    /// Forget held keys, e.g. when the window loses focus and release
    /// events would go elsewhere.
    pub fn release_all(&mut self) {
        self.keys = KeyboardState::new();
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }
}

impl InputSource for WinitInput {
    fn poll(&mut self) -> InputFrame {
        InputFrame {
            keys: self.keys.clone(),
            pointer: std::mem::take(&mut self.samples),
            close_requested: self.close_requested,
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    })
}
