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
use std::{
    fmt,
    sync::{Arc, Mutex},
};

use crate::note::NoteName;

/// A command observed by the mock sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Attack(NoteName),
    Release(NoteName),
}

/// A mock sink. Doesn't produce any sound; records every command it
/// receives for inspection.
#[derive(Clone)]
pub struct Sink {
    name: String,
    commands: Arc<Mutex<Vec<Command>>>,
}

impl Sink {
    /// Gets the given mock sink.
    pub fn get(name: &str) -> Sink {
        Sink {
            name: name.to_string(),
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[cfg(test)]
    /// Gets the commands received so far, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.commands
            .lock()
            .expect("unable to get commands lock")
            .clone()
    }

    #[cfg(test)]
    /// Clears the recorded commands.
    pub fn reset(&self) {
        self.commands
            .lock()
            .expect("unable to get commands lock")
            .clear();
    }
}

impl super::SoundSink for Sink {
    /// Returns the name of the sink.
    fn name(&self) -> String {
        self.name.to_string()
    }

    /// Begins sounding the given note.
    fn attack(&self, note: NoteName) {
        self.commands
            .lock()
            .expect("unable to get commands lock")
            .push(Command::Attack(note));
    }

    /// Stops sounding the given note.
    fn release(&self, note: NoteName) {
        self.commands
            .lock()
            .expect("unable to get commands lock")
            .push(Command::Release(note));
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
