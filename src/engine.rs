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

//! The note-state engine: composes note identity, the active-note table and
//! sustain arbitration, and drives the sound sink.
//!
//! All operations are synchronous and run to completion. Within a single
//! operation the table is mutated before the corresponding sink command is
//! issued, so the table can never be left inconsistent by a misbehaving
//! sink.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::note::{self, NoteError, NoteName};
use crate::sink::SoundSink;
use crate::sustain::SustainController;
use crate::table::{ActiveNote, NoteStateTable};

/// The lowest octave shift the profile accepts.
pub const MIN_OCTAVE_SHIFT: i8 = -3;

/// The highest octave shift the profile accepts.
pub const MAX_OCTAVE_SHIFT: i8 = 3;

/// The polyphonic note-state engine. Owned as a plain value by the host;
/// hosts translate their input events into the methods below.
pub struct Engine {
    /// The sink receiving attack and release commands.
    sink: Arc<dyn SoundSink>,
    /// The authoritative table of active notes.
    table: NoteStateTable,
    /// Sustain pedal arbitration.
    sustain: SustainController,
    /// Octave transposition applied to future attacks only.
    octave_shift: i8,
}

impl Engine {
    /// Creates a new engine around the given sink.
    pub fn new(sink: Arc<dyn SoundSink>) -> Engine {
        Engine {
            sink,
            table: NoteStateTable::new(),
            sustain: SustainController::new(),
            octave_shift: 0,
        }
    }

    /// Begins sounding the given note, transposed by the current octave
    /// shift. The sounding name is captured on the table entry so later
    /// operations release exactly what was attacked. A note number that is
    /// already sounding (or being sustained) is released first; at most one
    /// instance per note number sounds at any instant.
    pub fn note_on(&mut self, midi: u8) -> Result<(), NoteError> {
        let note_name = NoteName::from_midi(note::transpose(midi, self.octave_shift)?)?;

        // The table performs the implicit release, handing back the entry
        // that was still active for this note number. If that entry was
        // deferred by the pedal it is no longer held over; this press
        // restarts it.
        if let Some(previous) = self.table.attack(midi, note_name) {
            self.sustain.forget(midi);
            self.sink.release(previous.note_name());
            debug!(midi, note = %previous.note_name(), "Retriggered, released previous instance.");
        }
        self.sink.attack(note_name);

        debug!(midi, note = %note_name, shift = self.octave_shift, "Note on.");
        Ok(())
    }

    /// Releases the given note, or defers the release while the sustain
    /// pedal is down. A note that isn't sounding is ignored; duplicate
    /// key-ups are routine.
    pub fn note_off(&mut self, midi: u8) {
        if !self.table.is_active(midi) {
            return;
        }

        if self.sustain.defer_if_needed(midi) {
            self.table.mark_sustained(midi);
            debug!(midi, "Note-off deferred by sustain pedal.");
            return;
        }

        if let Some(active) = self.table.release(midi) {
            self.sink.release(active.note_name());
            debug!(midi, note = %active.note_name(), "Note off.");
        }
    }

    /// Sets the sustain pedal state. Lifting the pedal releases every note
    /// that was deferred while it was down.
    pub fn set_sustain(&mut self, pressed: bool) {
        if pressed {
            self.sustain.press();
            return;
        }

        for midi in self.sustain.release() {
            if let Some(active) = self.table.release(midi) {
                self.sink.release(active.note_name());
            }
        }
    }

    /// Sets the octave shift for future attacks. Notes already sounding
    /// keep the pitch they were attacked with.
    pub fn set_octave_shift(&mut self, shift: i8) {
        debug!(shift, "Octave shift changed.");
        self.octave_shift = shift;
    }

    /// Gets the current octave shift.
    pub fn octave_shift(&self) -> i8 {
        self.octave_shift
    }

    /// Releases every note immediately, sustained or not, and clears the
    /// held-over set. Serves hosts that are being hidden or backgrounded
    /// and must not leave notes stuck. The table is drained before any sink
    /// command is issued.
    pub fn panic_stop_all(&mut self) {
        let drained = self.table.drain();
        self.sustain.clear_held();

        if drained.is_empty() {
            return;
        }
        for active in &drained {
            self.sink.release(active.note_name());
        }
        info!(stopped = drained.len(), "Stopped all notes.");
    }

    /// Returns true if the given note number is sounding or sustained.
    pub fn is_active(&self, midi: u8) -> bool {
        self.table.is_active(midi)
    }

    /// Gets the entry for the given note number.
    pub fn active_note(&self, midi: u8) -> Option<&ActiveNote> {
        self.table.get(midi)
    }

    /// Gets the current number of active notes.
    pub fn active_count(&self) -> usize {
        self.table.active_count()
    }

    /// Gets an unordered snapshot of every active note.
    pub fn all_active(&self) -> Vec<&ActiveNote> {
        self.table.all_active()
    }

    /// Returns true if the sustain pedal is depressed.
    pub fn sustain_down(&self) -> bool {
        self.sustain.is_down()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("sink", &self.sink.name())
            .field("active_notes", &self.table.active_count())
            .field("sustain_down", &self.sustain.is_down())
            .field("octave_shift", &self.octave_shift)
            .finish()
    }
}
