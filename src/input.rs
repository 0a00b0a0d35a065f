//! Keyboard input handling
//!
//! Key down/up events arrive once per transition, not continuously, so
//! [`KeyboardState`] remembers which bound keys are still held and turns
//! that into a [`TickInput`] every tick.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver::InputSource;
use crate::error::InitError;
use crate::sim::TickInput;

/// Which keys drive which paddle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left_up: char,
    pub left_down: char,
    pub right_up: char,
    pub right_down: char,
    pub quit: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: 'a',
            left_down: 'z',
            right_up: 'i',
            right_down: '.',
            quit: 'q',
        }
    }
}

impl KeyBindings {
    pub fn is_bound(&self, key: char) -> bool {
        let key = key.to_ascii_lowercase();
        [
            self.left_up,
            self.left_down,
            self.right_up,
            self.right_down,
            self.quit,
        ]
        .contains(&key)
    }
}

/// A raw event from the keyboard or window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(char),
    Up(char),
    /// Window closed
    Close,
}

/// Held-key tracker for both players
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    bindings: KeyBindings,
    held: TickInput,
}

impl KeyboardState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: TickInput::default(),
        }
    }

    pub fn handle(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Close => self.held.quit = true,
            KeyEvent::Down(key) => self.set(key, true),
            KeyEvent::Up(key) => self.set(key, false),
        }
    }

    fn set(&mut self, key: char, pressed: bool) {
        let key = key.to_ascii_lowercase();
        let b = &self.bindings;
        if key == b.quit {
            // Quit latches: releasing the key does not resume the match
            self.held.quit |= pressed;
        } else if key == b.left_up {
            self.held.left_up = pressed;
        } else if key == b.left_down {
            self.held.left_down = pressed;
        } else if key == b.right_up {
            self.held.right_up = pressed;
        } else if key == b.right_down {
            self.held.right_down = pressed;
        } else {
            log::trace!("ignoring unbound key {:?}", key);
        }
    }

    /// Intents for the current tick
    pub fn input(&self) -> TickInput {
        self.held
    }
}

impl InputSource for KeyboardState {
    fn poll(&mut self) -> Option<TickInput> {
        Some(self.input())
    }
}

/// Built-in script for headless runs
pub const DEMO_SCRIPT: &str = "\
# ticks keys...
# Opening serve heads right; the right paddle waits for it
40
# Left paddle climbs while the right one drops
12 a
30 .
20 z i
60
45 a
30 z .
90
1 q
";

/// One scripted stretch of held keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    ticks: u32,
    input: TickInput,
}

/// Replays a text script of held keys, one line per stretch of ticks
///
/// Each line is `<ticks> [key ...]`; blank lines and `#` comments are skipped.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    segments: Vec<Segment>,
    index: usize,
    remaining: u32,
}

impl ScriptedInput {
    pub fn parse(script: &str, bindings: &KeyBindings) -> Result<Self, InitError> {
        let mut segments = Vec::new();

        for (i, raw) in script.lines().enumerate() {
            let line = i + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }

            let mut tokens = content.split_whitespace();
            let ticks = tokens
                .next()
                .unwrap_or_default()
                .parse::<u32>()
                .map_err(|e| InitError::Script {
                    line,
                    reason: format!("bad tick count: {e}"),
                })?;

            let mut keyboard = KeyboardState::new(bindings.clone());
            for token in tokens {
                let mut chars = token.chars();
                let key = match (chars.next(), chars.next()) {
                    (Some(key), None) => key,
                    _ => {
                        return Err(InitError::Script {
                            line,
                            reason: format!("expected a single key, got {token:?}"),
                        });
                    }
                };
                if !bindings.is_bound(key) {
                    return Err(InitError::Script {
                        line,
                        reason: format!("key {key:?} is not bound"),
                    });
                }
                keyboard.handle(KeyEvent::Down(key));
            }

            if ticks > 0 {
                segments.push(Segment {
                    ticks,
                    input: keyboard.input(),
                });
            }
        }

        let remaining = segments.first().map_or(0, |s| s.ticks);
        Ok(Self {
            segments,
            index: 0,
            remaining,
        })
    }

    pub fn load(path: &Path, bindings: &KeyBindings) -> Result<Self, InitError> {
        let text = fs::read_to_string(path).map_err(|source| InitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, bindings)
    }

    /// Total ticks the script covers
    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks as u64).sum()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<TickInput> {
        while self.remaining == 0 {
            self.index += 1;
            self.remaining = self.segments.get(self.index)?.ticks;
        }
        let input = self.segments.get(self.index)?.input;
        self.remaining -= 1;
        Some(input)
    }
}
