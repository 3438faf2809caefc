//! stepgrid: a step-pattern editor for a modular music tracker.
//!
//! The editing engine lives in the `sg-*` crates; this package adds the
//! text front end used by the `sg-cli` binary.

pub mod ui;

use sg_session::{Machine, Parameter};

/// A synth-like machine for trying the editor: a global volume and mute,
/// and per track a note, a velocity and a filter cutoff.
pub fn demo_machine(tracks: usize, connections: usize) -> Machine {
    let mut machine = Machine::new(
        "Demo",
        vec![Parameter::byte("Volume", 0, 0xFE), Parameter::switch("Mute")],
        vec![
            Parameter::note("Note"),
            Parameter::byte("Velocity", 0, 0x7F),
            Parameter::word("Cutoff", 0, 0xFFFE),
        ],
    );
    machine.set_track_count(tracks.max(1));
    for _ in 0..connections {
        machine.add_connection();
    }
    machine
}
