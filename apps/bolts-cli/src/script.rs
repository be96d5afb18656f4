use bolts_input::{InputFrame, Key, ScriptedInput};
use std::str::FromStr;

/// A key held during a range of frames, written `KEY@FRAME` or
/// `KEY@FIRST-LAST` (zero-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub first: usize,
    pub last: usize,
}

impl FromStr for KeyPress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, frames) = s
            .split_once('@')
            .ok_or_else(|| format!("expected KEY@FRAME, got `{s}`"))?;
        let key = Key::from_str(key).map_err(|e| e.to_string())?;
        let parse = |n: &str| {
            n.trim()
                .parse::<usize>()
                .map_err(|e| format!("bad frame `{n}`: {e}"))
        };
        let (first, last) = match frames.split_once('-') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let f = parse(frames)?;
                (f, f)
            }
        };
        if last < first {
            return Err(format!("empty frame range `{frames}`"));
        }
        Ok(Self { key, first, last })
    }
}

/// Input for `frames` frames with the given keys held, followed by a close
/// request.
pub fn build_script(frames: usize, presses: &[KeyPress]) -> ScriptedInput {
    let script = (0..frames).map(|frame| {
        InputFrame::with_keys(
            presses
                .iter()
                .filter(|p| (p.first..=p.last).contains(&frame))
                .map(|p| p.key),
        )
    });
    ScriptedInput::new(script).close_when_done()
}
