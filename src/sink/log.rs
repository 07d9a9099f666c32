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
use std::fmt;

use tracing::info;

use crate::note::NoteName;

/// A sink that logs every command it receives. Stands in for a real audio
/// backend when driving the engine from the CLI.
pub struct Sink {}

impl Sink {
    /// Creates a new logging sink.
    pub fn new() -> Sink {
        Sink {}
    }
}

impl Default for Sink {
    fn default() -> Sink {
        Sink::new()
    }
}

impl super::SoundSink for Sink {
    /// Returns the name of the sink.
    fn name(&self) -> String {
        "log".to_string()
    }

    /// Begins sounding the given note.
    fn attack(&self, note: NoteName) {
        info!(note = %note, "Attack.");
    }

    /// Stops sounding the given note.
    fn release(&self, note: NoteName) {
        info!(note = %note, "Release.");
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log (Sink)")
    }
}
