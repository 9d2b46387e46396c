use std::{collections::VecDeque, fs, path::Path};

use anyhow::Context;
use game2d_core::{
    input::{InputEvent, InputSource, Key},
    time::Clock,
};
use serde::Deserialize;

/// One timed entry of an input script.
///
/// ```toml
/// [[event]]
/// at_ms = 250
/// kind = "press"
/// key = "d"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptAction {
    Press { key: Key },
    Release { key: Key },
    Pointer { x: f64, y: f64 },
    Quit,
}

impl From<&ScriptAction> for InputEvent {
    fn from(action: &ScriptAction) -> Self {
        match *action {
            ScriptAction::Press { key } => InputEvent::KeyPress(key),
            ScriptAction::Release { key } => InputEvent::KeyRelease(key),
            ScriptAction::Pointer { x, y } => InputEvent::PointerMove { x, y },
            ScriptAction::Quit => InputEvent::Quit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    event: Vec<ScriptEntry>,
}

/// Replays timed input events against a clock, standing in for a window's
/// event queue when running headless.
pub struct ScriptedInput<C> {
    clock: C,
    start: u64,
    pending: VecDeque<(u64, InputEvent)>,
}

impl<C: Clock> ScriptedInput<C> {
    pub fn new(clock: C, mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by_key(|e| e.at_ms);
        let pending = entries
            .iter()
            .map(|e| (e.at_ms.saturating_mul(1_000_000), InputEvent::from(&e.action)))
            .collect();
        let start = clock.now();
        Self { clock, start, pending }
    }

    pub fn load(path: impl AsRef<Path>, clock: C) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script {}", path.display()))?;
        let file: ScriptFile = toml::from_str(&text)
            .with_context(|| format!("failed to parse input script {}", path.display()))?;
        Ok(Self::new(clock, file.event))
    }

    /// Pointer sweep with a few key impulses, ending in a quit after ~4 s.
    pub fn demo(clock: C) -> Self {
        let pointer =
            |at_ms, x, y| ScriptEntry { at_ms, action: ScriptAction::Pointer { x, y } };
        let press = |at_ms, key| ScriptEntry { at_ms, action: ScriptAction::Press { key } };

        Self::new(
            clock,
            vec![
                pointer(0, 640.0, 360.0),
                press(500, Key::D),
                press(600, Key::D),
                pointer(1500, 100.0, 600.0),
                press(2000, Key::W),
                pointer(2500, 1200.0, 80.0),
                ScriptEntry { at_ms: 4000, action: ScriptAction::Quit },
            ],
        )
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl<C: Clock> InputSource for ScriptedInput<C> {
    fn poll(&mut self) -> Option<InputEvent> {
        let elapsed = self.clock.now().saturating_sub(self.start);
        match self.pending.front() {
            Some(&(at, _)) if at <= elapsed => self.pending.pop_front().map(|(_, ev)| ev),
            _ => None,
        }
    }
}
