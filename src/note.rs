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

//! Note identity: conversions between MIDI note numbers and
//! note-name/octave pairs.

use std::fmt;
use std::str::FromStr;

/// The lowest key on an 88-key instrument (A0).
pub const LOWEST_KEY: u8 = 21;

/// The highest key on an 88-key instrument (C8).
pub const HIGHEST_KEY: u8 = 108;

/// The highest valid MIDI note number.
pub const MAX_MIDI_NOTE: u8 = 127;

/// Semitones per octave.
const OCTAVE_SEMITONES: i32 = 12;

/// Typed error for note conversions. Out-of-range values indicate a
/// programming error in the caller and are surfaced, never clamped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    #[error("MIDI note {0} is outside [0, 127]")]
    OutOfRange(i32),
    #[error("Unparseable note name '{0}'")]
    Unparseable(String),
}

/// One of the twelve semitone names within an octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// All pitch classes in semitone order starting from C.
const PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

impl PitchClass {
    /// Gets the semitone offset of this pitch class within its octave (C=0, B=11).
    pub fn semitone(&self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::CSharp => 1,
            PitchClass::D => 2,
            PitchClass::DSharp => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::FSharp => 6,
            PitchClass::G => 7,
            PitchClass::GSharp => 8,
            PitchClass::A => 9,
            PitchClass::ASharp => 10,
            PitchClass::B => 11,
        }
    }

    /// Gets the display label of this pitch class.
    pub fn label(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

/// A pitch class plus octave, e.g. C4 for MIDI note 60.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteName {
    pitch_class: PitchClass,
    octave: i8,
}

impl NoteName {
    /// Converts a MIDI note number into its note name.
    pub fn from_midi(midi: u8) -> Result<NoteName, NoteError> {
        if midi > MAX_MIDI_NOTE {
            return Err(NoteError::OutOfRange(midi as i32));
        }

        // C0 is MIDI note 12, so name octaves relative to it. MIDI notes
        // below 12 land in octave -1.
        let relative = midi as i32 - OCTAVE_SEMITONES;
        Ok(NoteName {
            pitch_class: PITCH_CLASSES[relative.rem_euclid(OCTAVE_SEMITONES) as usize],
            octave: relative.div_euclid(OCTAVE_SEMITONES) as i8,
        })
    }

    /// Converts this note name back into its MIDI note number. Round-trips
    /// exactly with from_midi over the full MIDI range.
    pub fn to_midi(&self) -> Result<u8, NoteError> {
        let midi = (self.octave as i32 + 1) * OCTAVE_SEMITONES + self.pitch_class.semitone() as i32;
        if !(0..=MAX_MIDI_NOTE as i32).contains(&midi) {
            return Err(NoteError::OutOfRange(midi));
        }
        Ok(midi as u8)
    }

    /// Gets the pitch class of this note name.
    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }

    /// Gets the octave of this note name.
    pub fn octave(&self) -> i8 {
        self.octave
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class.label(), self.octave)
    }
}

impl FromStr for NoteName {
    type Err = NoteError;

    /// Parses the Display rendering, e.g. "C4" or "F#2".
    fn from_str(s: &str) -> Result<NoteName, NoteError> {
        let (label, octave) = match s.find(|c: char| c == '-' || c.is_ascii_digit()) {
            Some(at) if at > 0 => s.split_at(at),
            _ => return Err(NoteError::Unparseable(s.to_string())),
        };
        let pitch_class = PITCH_CLASSES
            .iter()
            .find(|pc| pc.label() == label)
            .ok_or_else(|| NoteError::Unparseable(s.to_string()))?;
        let octave: i8 = octave
            .parse()
            .map_err(|_| NoteError::Unparseable(s.to_string()))?;
        Ok(NoteName {
            pitch_class: *pitch_class,
            octave,
        })
    }
}

/// Shifts a MIDI note number by the given number of octaves, failing when
/// the result leaves the MIDI range.
pub fn transpose(midi: u8, octaves: i8) -> Result<u8, NoteError> {
    if midi > MAX_MIDI_NOTE {
        return Err(NoteError::OutOfRange(midi as i32));
    }

    let shifted = midi as i32 + octaves as i32 * OCTAVE_SEMITONES;
    if !(0..=MAX_MIDI_NOTE as i32).contains(&shifted) {
        return Err(NoteError::OutOfRange(shifted));
    }
    Ok(shifted as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_notes() {
        let middle_c = NoteName::from_midi(60).expect("valid note");
        assert_eq!(middle_c.to_string(), "C4");
        assert_eq!(middle_c.pitch_class(), PitchClass::C);
        assert_eq!(middle_c.octave(), 4);

        assert_eq!(
            NoteName::from_midi(LOWEST_KEY).expect("valid note").to_string(),
            "A0"
        );
        assert_eq!(
            NoteName::from_midi(HIGHEST_KEY).expect("valid note").to_string(),
            "C8"
        );
        assert_eq!(NoteName::from_midi(61).expect("valid note").to_string(), "C#4");

        // The bottom of the MIDI range sits below C0.
        assert_eq!(NoteName::from_midi(0).expect("valid note").to_string(), "C-1");
        assert_eq!(NoteName::from_midi(11).expect("valid note").to_string(), "B-1");
    }

    #[test]
    fn test_round_trip() {
        for midi in 0..=MAX_MIDI_NOTE {
            let name = NoteName::from_midi(midi).expect("valid note");
            assert_eq!(name.to_midi().expect("valid name"), midi, "round trip for {}", midi);
        }
    }

    #[test]
    fn test_out_of_range() {
        for midi in [128u8, 129, 200, 255] {
            assert_eq!(
                NoteName::from_midi(midi),
                Err(NoteError::OutOfRange(midi as i32))
            );
        }
    }

    #[test]
    fn test_parse() {
        for s in ["C4", "F#2", "A0", "C8", "B-1", "G#7"] {
            let name: NoteName = s.parse().expect("parseable note");
            assert_eq!(name.to_string(), s);
        }

        assert!("".parse::<NoteName>().is_err());
        assert!("H4".parse::<NoteName>().is_err());
        assert!("C".parse::<NoteName>().is_err());
        assert!("4".parse::<NoteName>().is_err());
    }

    #[test]
    fn test_transpose() {
        assert_eq!(transpose(60, 1).expect("in range"), 72);
        assert_eq!(transpose(60, -2).expect("in range"), 36);
        assert_eq!(transpose(60, 0).expect("in range"), 60);

        assert_eq!(transpose(120, 1), Err(NoteError::OutOfRange(132)));
        assert_eq!(transpose(10, -1), Err(NoteError::OutOfRange(-2)));
        assert_eq!(transpose(200, 0), Err(NoteError::OutOfRange(200)));
    }
}
