//! Property-based invariant tests for the editing operations.
//!
//! 1. encode → decode yields the selection's cells in enumeration order,
//!    and pasting them at the selection's origin reproduces the cells.
//! 2. reverse applied twice is the identity.
//! 3. double_length followed by halve_length is the identity.
//! 4. Any sequence of cursor moves leaves the cursor inside the pattern.
//! 5. An All-mode selection covers rows × cells-per-row cells.

use proptest::prelude::*;
use sg_edit::clipboard::{decode, encode, paste};
use sg_edit::transform::{double_length, halve_length, reverse};
use sg_edit::{all_columns, CommitLog, Position, Selection, SelectionMode};
use sg_ir::{linear_to_note, Group, Machine, ParamKind, Parameter, ParameterCatalog, Pattern};

// ── Helpers ─────────────────────────────────────────────────────────────

fn machine(tracks: usize, connections: usize) -> Machine {
    let mut m = Machine::new(
        "Synth",
        vec![Parameter::byte("Volume", 0, 0xFE), Parameter::switch("Mute")],
        vec![
            Parameter::note("Note"),
            Parameter::byte("Vel", 0, 0x7F),
            Parameter::word("Cutoff", 0, 0xFFFE),
        ],
    );
    m.set_track_count(tracks);
    for _ in 0..connections {
        m.add_connection();
    }
    m
}

/// Map an arbitrary seed onto a value the parameter accepts unchanged.
fn valid_value(param: &Parameter, seed: u32) -> u16 {
    if seed % 5 == 0 {
        return param.value_none;
    }
    match param.kind {
        ParamKind::Note => linear_to_note((seed % 120) as i32),
        _ => {
            let span = (param.value_max - param.value_min) as u32 + 1;
            param.value_min + (seed % span) as u16
        }
    }
}

/// A pattern whose cells are filled from `seeds`, cycling as needed.
fn filled(rows: u16, tracks: usize, connections: usize, seeds: &[u32]) -> Pattern {
    let m = machine(tracks, connections);
    let mut p = Pattern::new("00", rows, &m).unwrap();
    let mut seeds = seeds.iter().cycle();
    for column in all_columns(&p) {
        let param = p.describe(column.group, column.param as usize).clone();
        for row in 0..rows {
            let value = valid_value(&param, *seeds.next().unwrap());
            p.set(row, column.group, column.track, column.param, value).unwrap();
        }
    }
    p.take_edits();
    p
}

fn snapshot(p: &Pattern) -> Vec<u16> {
    let mut cells = Vec::new();
    for column in all_columns(p) {
        for row in 0..p.rows() {
            cells.push(p.get(row, column.group, column.track, column.param).unwrap());
        }
    }
    cells
}

fn mode_strategy() -> impl Strategy<Value = SelectionMode> {
    prop_oneof![
        Just(SelectionMode::Column),
        Just(SelectionMode::Track),
        Just(SelectionMode::Group),
        Just(SelectionMode::All),
    ]
}

fn seeds() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(any::<u32>(), 1..64)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Clipboard round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn copy_paste_reproduces_selection(
        seeds in seeds(),
        rows in 1u16..24,
        tracks in 1usize..4,
        begin in 0u16..24,
        len in 1u16..24,
        mode in mode_strategy(),
        track_pick in 0u8..4,
        param_pick in 0u8..3,
    ) {
        let src = filled(rows, tracks, 1, &seeds);
        let begin = begin % rows;
        let end = (begin + len).min(rows);
        let track = track_pick % tracks as u8;
        let cursor = Position { row: begin, group: Group::Track, track, param: param_pick, subfield: 0 };
        let sel = Selection::with_mode(&cursor, begin, end, mode);

        let data = decode(&encode(&src, &sel)).unwrap();
        let cells = sel.enumerate_cells(&src);
        prop_assert_eq!(data.mode, mode);
        prop_assert_eq!(data.records.len(), cells.len());
        for (record, cell) in data.records.iter().zip(&cells) {
            prop_assert_eq!(record.row_offset, cell.row - sel.begin_row);
            prop_assert_eq!(
                (record.group, record.track, record.param),
                (cell.group, cell.track, cell.param)
            );
            prop_assert_eq!(record.value, src.get(cell.row, cell.group, cell.track, cell.param).unwrap());
        }

        let mut dst = Pattern::new("01", rows, &machine(tracks, 1)).unwrap();
        paste(&mut dst, &cursor, &data);
        for cell in cells {
            prop_assert_eq!(
                dst.get(cell.row, cell.group, cell.track, cell.param).unwrap(),
                src.get(cell.row, cell.group, cell.track, cell.param).unwrap(),
                "cell {:?}", cell
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. reverse is an involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reverse_twice_is_identity(
        seeds in seeds(),
        rows in 1u16..32,
        begin in 0u16..32,
        len in 0u16..32,
        mode in mode_strategy(),
    ) {
        let mut p = filled(rows, 2, 1, &seeds);
        let before = snapshot(&p);
        let begin = begin % rows;
        let cursor = Position { row: begin, group: Group::Track, track: 1, param: 1, subfield: 0 };
        let sel = Selection::with_mode(&cursor, begin, begin.saturating_add(len), mode);
        let mut log = CommitLog::default();

        reverse(&mut p, &sel, &mut log);
        reverse(&mut p, &sel, &mut log);
        prop_assert_eq!(snapshot(&p), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. double then halve
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn double_then_halve_is_identity(seeds in seeds(), rows in 1u16..64) {
        let mut p = filled(rows, 2, 1, &seeds);
        let before = snapshot(&p);
        let mut log = CommitLog::default();

        prop_assert!(double_length(&mut p, &mut log));
        prop_assert_eq!(p.rows(), rows * 2);
        prop_assert!(halve_length(&mut p, &mut log));
        prop_assert_eq!(p.rows(), rows);
        prop_assert_eq!(snapshot(&p), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Navigation stays inside the pattern
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cursor_moves_stay_in_bounds(
        moves in proptest::collection::vec(0u8..9, 0..200),
        rows in 1u16..40,
        tracks in 1usize..4,
        connections in 0usize..3,
    ) {
        let p = Pattern::new("00", rows, &machine(tracks, connections)).unwrap();
        let mut pos = Position::first(&p);
        for m in moves {
            match m {
                0 => { pos.move_right(&p); }
                1 => { pos.move_left(&p); }
                2 => pos.move_up(3),
                3 => pos.move_down(&p, 5),
                4 => { pos.next_track(&p); }
                5 => { pos.prev_track(&p); }
                6 => pos.home(&p),
                7 => { pos.set_group(&p, 0); }
                _ => { pos.set_group(&p, 2); }
            }
            prop_assert!(pos.row < p.rows());
            prop_assert!(!p.is_group_empty(pos.group));
            prop_assert!((pos.track as usize) < p.track_count(pos.group));
            prop_assert!((pos.param as usize) < p.parameter_count(pos.group));
            prop_assert!((pos.subfield as usize) < pos.subfield_count(&p));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. All-mode selection size
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn all_mode_covers_every_cell(
        rows in 1u16..64,
        tracks in 1usize..5,
        connections in 0usize..3,
        begin in 0u16..64,
        len in 0u16..64,
    ) {
        let p = Pattern::new("00", rows, &machine(tracks, connections)).unwrap();
        let begin = begin % rows;
        let end = (begin + len).min(rows);
        let sel = Selection::with_mode(&Position::first(&p), begin, end, SelectionMode::All);
        let cells = sel.enumerate_cells(&p);
        prop_assert_eq!(cells.len(), (end - begin) as usize * p.cells_per_row());
        prop_assert!(cells.iter().all(|c| sel.contains(c)));
    }
}
