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

//! Live MIDI input: parses raw events and drives the engine.
//!
//! MIDI keyboards debounce their own keys, so events go straight to the
//! engine rather than through the input router.

use std::error::Error;

use midir::MidiInput;
use midly::live::LiveEvent;
use midly::MidiMessage;
use tracing::{debug, info, warn};

use crate::engine::Engine;

/// The MIDI control change number of the sustain pedal.
const SUSTAIN_PEDAL_CC: u8 = 64;

/// The MIDI control change number of All Notes Off.
const ALL_NOTES_OFF_CC: u8 = 123;

/// Control values at or above this mean the pedal is down.
const PEDAL_DOWN_THRESHOLD: u8 = 64;

/// Applies a single raw MIDI event to the engine. Unparseable bytes and
/// message types the engine has no use for are dropped.
pub fn apply_event(engine: &mut Engine, raw_event: &[u8]) {
    let event = match LiveEvent::parse(raw_event) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = ?e, "Failed to parse MIDI event");
            return;
        }
    };

    let LiveEvent::Midi { message, .. } = event else {
        return;
    };
    match message {
        // Note On with velocity 0 is equivalent to Note Off.
        MidiMessage::NoteOn { key, vel } if u8::from(vel) == 0 => {
            engine.note_off(u8::from(key));
        }
        MidiMessage::NoteOn { key, .. } => {
            if let Err(e) = engine.note_on(u8::from(key)) {
                warn!(err = %e, "Ignoring unplayable note.");
            }
        }
        MidiMessage::NoteOff { key, .. } => {
            engine.note_off(u8::from(key));
        }
        MidiMessage::Controller { controller, value } => match u8::from(controller) {
            SUSTAIN_PEDAL_CC => engine.set_sustain(u8::from(value) >= PEDAL_DOWN_THRESHOLD),
            ALL_NOTES_OFF_CC => engine.panic_stop_all(),
            _ => {}
        },
        _ => {}
    }
}

/// Lists the names of the available MIDI input ports.
pub fn list_ports() -> Result<Vec<String>, Box<dyn Error>> {
    let input = MidiInput::new("keybed input")?;

    let mut port_names = Vec::new();
    for port in input.ports() {
        port_names.push(input.port_name(&port)?);
    }
    Ok(port_names)
}

/// Connects to the named input port and drives the engine with incoming
/// events until the connection goes away. The midir callback only moves
/// raw bytes over a channel; all engine mutation happens here.
pub fn listen(engine: &mut Engine, port_name: &str) -> Result<(), Box<dyn Error>> {
    let input = MidiInput::new("keybed input")?;

    let port = input
        .ports()
        .into_iter()
        .find(|port| {
            input
                .port_name(port)
                .map(|name| name == port_name)
                .unwrap_or(false)
        })
        .ok_or_else(|| format!("MIDI input port '{}' not found", port_name))?;

    let (sender, receiver) = crossbeam_channel::unbounded::<Vec<u8>>();
    let _connection = input.connect(
        &port,
        "keybed input watcher",
        move |_, raw_event, _| {
            if let Err(e) = sender.send(Vec::from(raw_event)) {
                warn!(
                    err = format!("{:?}", e),
                    "Error sending MIDI event to receiver."
                );
            }
        },
        (),
    )?;

    info!(port = port_name, "Listening for MIDI events.");
    for raw_event in receiver {
        apply_event(engine, &raw_event);
    }

    engine.panic_stop_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::note::NoteName;
    use crate::sink::test::{Command, Sink};

    fn create_test_engine() -> (Engine, Sink) {
        let sink = Sink::get("mock");
        (Engine::new(Arc::new(sink.clone())), sink)
    }

    fn raw(event: LiveEvent) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::with_capacity(8);
        event.write(&mut buf).expect("writable event");
        buf
    }

    fn note_on(key: u8, vel: u8) -> Vec<u8> {
        raw(LiveEvent::Midi {
            channel: 0.into(),
            message: MidiMessage::NoteOn {
                key: key.into(),
                vel: vel.into(),
            },
        })
    }

    fn note_off(key: u8) -> Vec<u8> {
        raw(LiveEvent::Midi {
            channel: 0.into(),
            message: MidiMessage::NoteOff {
                key: key.into(),
                vel: 0.into(),
            },
        })
    }

    fn controller(controller: u8, value: u8) -> Vec<u8> {
        raw(LiveEvent::Midi {
            channel: 0.into(),
            message: MidiMessage::Controller {
                controller: controller.into(),
                value: value.into(),
            },
        })
    }

    fn attack(midi: u8) -> Command {
        Command::Attack(NoteName::from_midi(midi).expect("valid note"))
    }

    fn release(midi: u8) -> Command {
        Command::Release(NoteName::from_midi(midi).expect("valid note"))
    }

    #[test]
    fn test_note_events() {
        let (mut engine, sink) = create_test_engine();

        apply_event(&mut engine, &note_on(60, 100));
        apply_event(&mut engine, &note_off(60));
        assert_eq!(sink.commands(), vec![attack(60), release(60)]);
    }

    #[test]
    fn test_note_on_velocity_zero_is_note_off() {
        let (mut engine, sink) = create_test_engine();

        apply_event(&mut engine, &note_on(60, 100));
        apply_event(&mut engine, &note_on(60, 0));
        assert_eq!(sink.commands(), vec![attack(60), release(60)]);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn test_sustain_pedal_cc() {
        let (mut engine, sink) = create_test_engine();

        apply_event(&mut engine, &controller(SUSTAIN_PEDAL_CC, 127));
        apply_event(&mut engine, &note_on(60, 100));
        apply_event(&mut engine, &note_off(60));
        assert_eq!(sink.commands(), vec![attack(60)]);
        assert!(engine.is_active(60));

        apply_event(&mut engine, &controller(SUSTAIN_PEDAL_CC, 0));
        assert_eq!(sink.commands(), vec![attack(60), release(60)]);
        assert!(!engine.is_active(60));
    }

    #[test]
    fn test_all_notes_off_cc() {
        let (mut engine, sink) = create_test_engine();

        apply_event(&mut engine, &note_on(60, 100));
        apply_event(&mut engine, &note_on(64, 100));
        apply_event(&mut engine, &controller(ALL_NOTES_OFF_CC, 0));

        assert_eq!(engine.active_count(), 0);
        let releases = sink
            .commands()
            .iter()
            .filter(|command| matches!(command, Command::Release(_)))
            .count();
        assert_eq!(releases, 2);
    }

    #[test]
    fn test_unparseable_and_irrelevant_events_are_dropped() {
        let (mut engine, sink) = create_test_engine();

        apply_event(&mut engine, &[0xF4]);
        apply_event(&mut engine, &[]);
        apply_event(&mut engine, &controller(1, 64));

        assert!(sink.commands().is_empty());
        assert_eq!(engine.active_count(), 0);
    }
}
