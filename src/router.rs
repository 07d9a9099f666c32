// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Deduplication of physical key events.
//!
//! Physical inputs repeat and misbehave: held keys auto-repeat, a drag
//! leaving a key produces a second up, a keymap can change mid-press. The
//! router pairs each source's down with exactly one up and forwards the
//! pair to the engine.

use std::collections::HashMap;

use tracing::debug;

use crate::engine::Engine;
use crate::note::NoteError;

/// Routes physical key-down/up events into the engine, deduplicated by
/// source identifier (a keyboard key code, a pointer id).
#[derive(Debug, Default)]
pub struct InputRouter {
    /// Currently-depressed sources and the MIDI number each was pressed
    /// with. Not musical state; used only for debouncing.
    pressed: HashMap<String, u8>,
}

impl InputRouter {
    /// Creates a new input router.
    pub fn new() -> InputRouter {
        InputRouter::default()
    }

    /// Handles a physical key-down for the given source. A repeated down
    /// for a source that is already pressed is dropped silently, matching
    /// hardware key-repeat suppression; Ok(false) reports the drop. The
    /// MIDI number is recorded with the source so the matching up releases
    /// the same note even if bindings or transposition change mid-press.
    pub fn on_down(&mut self, source: &str, midi: u8, engine: &mut Engine) -> Result<bool, NoteError> {
        if self.pressed.contains_key(source) {
            debug!(source, "Dropping repeated key-down.");
            return Ok(false);
        }

        engine.note_on(midi)?;
        self.pressed.insert(source.to_string(), midi);
        Ok(true)
    }

    /// Handles a physical key-up for the given source. An up for a source
    /// that isn't pressed is a no-op (duplicate ups are routine); returns
    /// false in that case.
    pub fn on_up(&mut self, source: &str, engine: &mut Engine) -> bool {
        match self.pressed.remove(source) {
            Some(midi) => {
                engine.note_off(midi);
                true
            }
            None => {
                debug!(source, "Dropping unmatched key-up.");
                false
            }
        }
    }

    /// Lifts every pressed source, e.g. when the host loses input focus
    /// and will never deliver the ups.
    pub fn release_all(&mut self, engine: &mut Engine) {
        for (_, midi) in self.pressed.drain() {
            engine.note_off(midi);
        }
    }

    /// Forgets every pressed source without notifying the engine. Used
    /// after a panic stop, which has already cleared the engine's state.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Returns true if the given source is currently pressed.
    pub fn is_pressed(&self, source: &str) -> bool {
        self.pressed.contains_key(source)
    }

    /// Gets the number of currently-pressed sources.
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }
}
