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
use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use tracing::warn;

use keybed::config::Profile;
use keybed::engine::Engine;
use keybed::note::NoteName;
use keybed::router::InputRouter;
use keybed::{midi, sink};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A polyphonic note-state engine."
)]
struct Cli {
    /// The path to the engine profile.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drives the engine from key events read line by line from stdin.
    ///
    /// Recognized lines: down <code>, up <code>, pedal on|off,
    /// octave <n>, panic, status, quit.
    Keys {},
    /// Attaches to a MIDI input port and drives the engine live.
    Listen {
        /// The MIDI input port name. Defaults to the profile's midi_device.
        device_name: Option<String>,
    },
    /// Lists the available MIDI input ports.
    MidiDevices {},
    /// Prints the active keyboard bindings.
    Keymap {},
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let profile = match cli.profile {
        Some(path) => Profile::load(&path)?,
        None => Profile::default(),
    };

    match cli.command {
        Commands::Keys {} => run_keys(&profile),
        Commands::Listen { device_name } => {
            let device_name = match device_name.or(profile.midi_device().map(String::from)) {
                Some(device_name) => device_name,
                None => return Err("no MIDI input port given or configured".into()),
            };

            let mut engine = Engine::new(sink::get_sink(profile.sink())?);
            engine.set_octave_shift(profile.octave_shift());
            midi::listen(&mut engine, &device_name)
        }
        Commands::MidiDevices {} => {
            let ports = midi::list_ports()?;

            if ports.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for port in ports {
                println!("- {}", port);
            }
            Ok(())
        }
        Commands::Keymap {} => {
            let mut bindings: Vec<(&String, &u8)> = profile.keymap().iter().collect();
            bindings.sort_by_key(|(_, midi)| **midi);

            println!("Bindings (sustain: {}):", profile.sustain_key());
            for (code, midi) in bindings {
                println!("- {} -> {}", code, NoteName::from_midi(*midi)?);
            }
            Ok(())
        }
    }
}

/// Reads key events from stdin until EOF or quit, forwarding them through
/// the router and engine. Stands in for the window toolkits that would
/// normally deliver these events.
fn run_keys(profile: &Profile) -> Result<(), Box<dyn Error>> {
    let mut engine = Engine::new(sink::get_sink(profile.sink())?);
    engine.set_octave_shift(profile.octave_shift());
    let mut router = InputRouter::new();

    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("down") => match parts.next() {
                Some(code) if code == profile.sustain_key() => engine.set_sustain(true),
                Some(code) => match profile.keymap().get(code) {
                    Some(&midi) => {
                        if let Err(e) = router.on_down(code, midi, &mut engine) {
                            warn!(code, err = %e, "Unplayable key.");
                        }
                    }
                    None => warn!(code, "Unbound key."),
                },
                None => warn!("Missing key code."),
            },
            Some("up") => match parts.next() {
                Some(code) if code == profile.sustain_key() => engine.set_sustain(false),
                Some(code) => {
                    router.on_up(code, &mut engine);
                }
                None => warn!("Missing key code."),
            },
            Some("pedal") => match parts.next() {
                Some("on") => engine.set_sustain(true),
                Some("off") => engine.set_sustain(false),
                other => warn!(state = ?other, "Expected pedal on|off."),
            },
            Some("octave") => match parts.next().map(str::parse::<i8>) {
                Some(Ok(shift)) => engine.set_octave_shift(shift),
                other => warn!(shift = ?other, "Expected octave <n>."),
            },
            Some("panic") => {
                engine.panic_stop_all();
                router.clear();
            }
            Some("status") => {
                println!("{:?}", engine);
                for note in engine.all_active() {
                    println!(
                        "- {} (midi {}{})",
                        note.note_name(),
                        note.midi(),
                        if note.is_sustained() { ", sustained" } else { "" }
                    );
                }
            }
            Some("quit") => break,
            Some(command) => warn!(command, "Unknown command."),
            None => {}
        }
    }

    engine.panic_stop_all();
    Ok(())
}
