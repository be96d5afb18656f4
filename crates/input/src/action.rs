use crate::keys::{Key, KeyboardState};
use std::collections::BTreeMap;

/// Engine-level intent produced from raw keys.
///
/// Gameplay and the frame controller consume actions, never key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
    /// Edge-triggered: flips between active and paused.
    TogglePause,
    /// Edge-triggered: grabs or releases the pointer while active.
    TogglePointerLock,
}

/// Key to action mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    map: BTreeMap<Key, Action>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            map: BTreeMap::from([
                (Key::W, Action::MoveForward),
                (Key::S, Action::MoveBackward),
                (Key::A, Action::StrafeLeft),
                (Key::D, Action::StrafeRight),
                (Key::Space, Action::Ascend),
                (Key::LeftControl, Action::Descend),
                (Key::Escape, Action::TogglePause),
                (Key::Tab, Action::TogglePointerLock),
            ]),
        }
    }
}

impl Bindings {
    pub fn bind(&mut self, key: Key, action: Action) {
        self.map.insert(key, action);
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.map.get(&key).copied()
    }

    /// Whether any key bound to `action` is held.
    pub fn is_active(&self, keys: &KeyboardState, action: Action) -> bool {
        self.map
            .iter()
            .any(|(key, bound)| *bound == action && keys.is_down(*key))
    }
}
