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

//! Sustain pedal state and the set of notes held past their physical release.

use std::collections::HashSet;

use tracing::debug;

/// Tracks the sustain pedal and defers note releases while it is down.
#[derive(Debug, Default)]
pub struct SustainController {
    /// Whether the pedal is currently depressed.
    pedal_down: bool,
    /// Notes whose physical release arrived while the pedal was down.
    held_over: HashSet<u8>,
}

impl SustainController {
    /// Creates a new sustain controller with the pedal up.
    pub fn new() -> SustainController {
        SustainController::default()
    }

    /// Depresses the pedal. Has no effect on notes that are already
    /// sounding; notes still held over from a previous cycle stay held.
    pub fn press(&mut self) {
        if !self.pedal_down {
            debug!("Sustain pedal depressed.");
        }
        self.pedal_down = true;
    }

    /// Lifts the pedal, returning every note that was deferred while it was
    /// down. The caller is responsible for actually releasing them. Returns
    /// nothing when the pedal is already up.
    pub fn release(&mut self) -> Vec<u8> {
        if !self.pedal_down {
            return Vec::new();
        }

        self.pedal_down = false;
        let released: Vec<u8> = self.held_over.drain().collect();
        debug!(held = released.len(), "Sustain pedal released.");
        released
    }

    /// Defers the given note when the pedal is down, recording it in the
    /// held-over set. Returns true if the caller must hold its release.
    pub fn defer_if_needed(&mut self, midi: u8) -> bool {
        if self.pedal_down {
            self.held_over.insert(midi);
        }
        self.pedal_down
    }

    /// Drops a note from the held-over set without touching the pedal,
    /// e.g. when the note is retriggered while deferred. Returns true if
    /// the note was held over.
    pub fn forget(&mut self, midi: u8) -> bool {
        self.held_over.remove(&midi)
    }

    /// Clears the held-over set without touching the pedal.
    pub fn clear_held(&mut self) {
        self.held_over.clear();
    }

    /// Returns true if the pedal is currently depressed.
    pub fn is_down(&self) -> bool {
        self.pedal_down
    }

    /// Gets the number of notes currently held over.
    pub fn held_count(&self) -> usize {
        self.held_over.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut sustain = SustainController::new();
        assert!(!sustain.is_down());

        sustain.press();
        assert!(sustain.is_down());

        assert!(sustain.defer_if_needed(60));
        assert!(sustain.defer_if_needed(64));
        assert_eq!(sustain.held_count(), 2);

        let mut released = sustain.release();
        released.sort();
        assert_eq!(released, vec![60, 64]);
        assert!(!sustain.is_down());
        assert_eq!(sustain.held_count(), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut sustain = SustainController::new();
        assert!(sustain.release().is_empty());

        sustain.press();
        sustain.defer_if_needed(60);
        assert_eq!(sustain.release(), vec![60]);
        assert!(sustain.release().is_empty());
    }

    #[test]
    fn test_no_deferral_when_pedal_up() {
        let mut sustain = SustainController::new();
        assert!(!sustain.defer_if_needed(60));
        assert_eq!(sustain.held_count(), 0);
    }

    #[test]
    fn test_press_is_additive() {
        let mut sustain = SustainController::new();
        sustain.press();
        sustain.defer_if_needed(60);

        // A redundant press must not reset the held-over set.
        sustain.press();
        assert_eq!(sustain.held_count(), 1);
        assert_eq!(sustain.release(), vec![60]);
    }

    #[test]
    fn test_forget() {
        let mut sustain = SustainController::new();
        sustain.press();
        sustain.defer_if_needed(60);
        sustain.defer_if_needed(64);

        assert!(sustain.forget(60));
        assert!(!sustain.forget(60));
        assert_eq!(sustain.release(), vec![64]);
    }
}
