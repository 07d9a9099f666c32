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

//! The engine profile: octave shift, sink selection and keyboard bindings.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{MAX_OCTAVE_SHIFT, MIN_OCTAVE_SHIFT};
use crate::note::{HIGHEST_KEY, LOWEST_KEY};

/// Typed error for profile load/validation failures so callers can
/// distinguish e.g. file-not-found from a bad binding without string
/// matching.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("Profile parse error: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("Octave shift {0} is outside [{MIN_OCTAVE_SHIFT}, {MAX_OCTAVE_SHIFT}]")]
    OctaveShift(i8),
    #[error("Binding {0} -> {1} is outside the 88-key range [{LOWEST_KEY}, {HIGHEST_KEY}]")]
    Binding(String, u8),
}

/// A YAML representation of the engine profile.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Profile {
    /// The octave shift applied to future attacks.
    #[serde(default)]
    octave_shift: i8,

    /// The sink to drive.
    #[serde(default = "default_sink")]
    sink: String,

    /// Keyboard bindings from key code to untransposed MIDI note number.
    #[serde(default = "default_keymap")]
    keymap: HashMap<String, u8>,

    /// The key code acting as the sustain pedal.
    #[serde(default = "default_sustain_key")]
    sustain_key: String,

    /// The MIDI input port for the listen command.
    midi_device: Option<String>,
}

fn default_sink() -> String {
    "log".to_string()
}

fn default_sustain_key() -> String {
    "Space".to_string()
}

/// The default keyboard bindings: the middle octaves of the home row,
/// anchored at middle C.
fn default_keymap() -> HashMap<String, u8> {
    [
        ("KeyA", 60),
        ("KeyW", 61),
        ("KeyS", 62),
        ("KeyE", 63),
        ("KeyD", 64),
        ("KeyF", 65),
        ("KeyT", 66),
        ("KeyG", 67),
        ("KeyY", 68),
        ("KeyH", 69),
        ("KeyU", 70),
        ("KeyJ", 71),
        ("KeyK", 72),
        ("KeyO", 73),
        ("KeyL", 74),
        ("KeyP", 75),
        ("Semicolon", 76),
    ]
    .into_iter()
    .map(|(code, midi)| (code.to_string(), midi))
    .collect()
}

impl Default for Profile {
    fn default() -> Profile {
        Profile {
            octave_shift: 0,
            sink: default_sink(),
            keymap: default_keymap(),
            sustain_key: default_sustain_key(),
            midi_device: None,
        }
    }
}

impl Profile {
    /// Loads and validates a profile from the given YAML file.
    pub fn load(path: &Path) -> Result<Profile, ProfileError> {
        let profile: Profile = serde_yml::from_str(&fs::read_to_string(path)?)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if !(MIN_OCTAVE_SHIFT..=MAX_OCTAVE_SHIFT).contains(&self.octave_shift) {
            return Err(ProfileError::OctaveShift(self.octave_shift));
        }
        for (code, midi) in &self.keymap {
            if !(LOWEST_KEY..=HIGHEST_KEY).contains(midi) {
                return Err(ProfileError::Binding(code.to_string(), *midi));
            }
        }
        Ok(())
    }

    /// Gets the octave shift.
    pub fn octave_shift(&self) -> i8 {
        self.octave_shift
    }

    /// Gets the sink name.
    pub fn sink(&self) -> &str {
        &self.sink
    }

    /// Gets the keyboard bindings.
    pub fn keymap(&self) -> &HashMap<String, u8> {
        &self.keymap
    }

    /// Gets the sustain key code.
    pub fn sustain_key(&self) -> &str {
        &self.sustain_key
    }

    /// Gets the MIDI input port name, if configured.
    pub fn midi_device(&self) -> Option<&str> {
        self.midi_device.as_deref()
    }
}
