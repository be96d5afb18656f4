use std::collections::BTreeSet;
use std::str::FromStr;

/// Keys the engine binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    LeftControl,
    Escape,
    Tab,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::LeftControl,
        Key::Escape,
        Key::Tab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Space => "space",
            Key::LeftControl => "lctrl",
            Key::Escape => "escape",
            Key::Tab => "tab",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown key `{0}`")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "esc" => return Ok(Key::Escape),
            "ctrl" | "leftcontrol" => return Ok(Key::LeftControl),
            _ => {}
        }
        Key::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| UnknownKey(s.to_owned()))
    }
}

/// Which keys are held right now.
///
/// Purely level-triggered: a key held across many frames reads as down on
/// every one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    down: BTreeSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.down.iter().copied()
    }
}

impl FromIterator<Key> for KeyboardState {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            down: iter.into_iter().collect(),
        }
    }
}
