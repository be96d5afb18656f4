/// Turns a level-triggered key into a single toggle per press.
///
/// Remembers whether the key was down on the previous frame and fires only
/// on the up-to-down transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleLatch {
    was_down: bool,
}

impl ToggleLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's key level. Returns `true` on a rising edge.
    pub fn update(&mut self, down: bool) -> bool {
        let fired = down && !self.was_down;
        self.was_down = down;
        fired
    }

    pub fn was_down(&self) -> bool {
        self.was_down
    }
}
