//! Scripted keyboard input.
//!
//! A timeline of key transitions keyed by frame index, loadable from JSON:
//!
//! ```json
//! [
//!   { "frame": 0,  "key": "right", "action": "press" },
//!   { "frame": 30, "key": "space", "action": "press" },
//!   { "frame": 31, "key": "space", "action": "release" }
//! ]
//! ```

use anyhow::Context;
use platformer_client::input::{Key, Keyboard};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub key: Key,
    pub action: KeyAction,
}

/// Frame-ordered key events. Events on the same frame keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    events: Vec<ScriptedEvent>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let mut script: Self = serde_json::from_str(s).context("parse input script")?;
        script.events.sort_by_key(|e| e.frame);
        Ok(script)
    }

    pub fn push(mut self, frame: u64, key: Key, action: KeyAction) -> Self {
        let at = self.events.partition_point(|e| e.frame <= frame);
        self.events.insert(at, ScriptedEvent { frame, key, action });
        self
    }

    pub fn press(self, frame: u64, key: Key) -> Self {
        self.push(frame, key, KeyAction::Press)
    }

    pub fn release(self, frame: u64, key: Key) -> Self {
        self.push(frame, key, KeyAction::Release)
    }

    /// Press on `frame`, release on the next one.
    pub fn tap(self, frame: u64, key: Key) -> Self {
        self.press(frame, key).release(frame + 1, key)
    }

    /// Held for frames `from..to`.
    pub fn hold(self, from: u64, to: u64, key: Key) -> Self {
        self.press(from, key).release(to, key)
    }

    pub fn events(&self) -> &[ScriptedEvent] {
        &self.events
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.events.last().map(|e| e.frame)
    }
}

/// Replays an [`InputScript`] onto a keyboard frame by frame.
#[derive(Debug, Clone, Default)]
pub struct ScriptPlayer {
    script: InputScript,
    cursor: usize,
}

impl ScriptPlayer {
    pub fn new(script: InputScript) -> Self {
        Self { script, cursor: 0 }
    }

    /// Applies every event scheduled at or before `frame` not yet applied.
    /// Returns how many were applied.
    pub fn apply(&mut self, frame: u64, keyboard: &Keyboard) -> usize {
        let start = self.cursor;
        while let Some(event) = self.script.events.get(self.cursor) {
            if event.frame > frame {
                break;
            }
            match event.action {
                KeyAction::Press => keyboard.press(event.key),
                KeyAction::Release => keyboard.release(event.key),
            };
            self.cursor += 1;
        }
        self.cursor - start
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.events.len()
    }
}
