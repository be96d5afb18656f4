use crate::keys::{Key, KeyboardState};
use std::collections::VecDeque;

/// Everything the input layer observed since the previous poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub keys: KeyboardState,
    /// Absolute pointer positions in window coordinates, oldest first.
    pub pointer: Vec<(f32, f32)>,
    pub close_requested: bool,
}

impl InputFrame {
    pub fn with_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn close() -> Self {
        Self {
            close_requested: true,
            ..Self::default()
        }
    }

    pub fn pointer_at(mut self, x: f32, y: f32) -> Self {
        self.pointer.push((x, y));
        self
    }
}

/// Source of per-frame input.
pub trait InputSource {
    /// Drain input gathered since the last call.
    fn poll(&mut self) -> InputFrame;
}

/// Replays a fixed queue of frames.
///
/// Once the queue runs dry every poll returns an idle frame, or a close
/// request if built with [`ScriptedInput::close_when_done`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    close_when_done: bool,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            close_when_done: false,
        }
    }

    pub fn close_when_done(mut self) -> Self {
        self.close_when_done = true;
        self
    }

    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        match self.frames.pop_front() {
            Some(frame) => frame,
            None if self.close_when_done => InputFrame::close(),
            None => InputFrame::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_in_order_then_idles() {
        let mut input = ScriptedInput::new([
            InputFrame::with_keys([Key::Escape]),
            InputFrame::default().pointer_at(1.0, 2.0),
        ]);
        assert!(input.poll().keys.is_down(Key::Escape));
        assert_eq!(input.poll().pointer, vec![(1.0, 2.0)]);
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.poll(), InputFrame::default());
    }

    #[test]
    fn closes_when_exhausted() {
        let mut input = ScriptedInput::default().close_when_done();
        assert!(input.poll().close_requested);
    }
}
