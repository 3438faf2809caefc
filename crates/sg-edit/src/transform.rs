//! Bulk operations over a selection or a whole pattern.
//!
//! Every operation first computes all of its writes from the current
//! contents and only then applies them, so no cell is read after another
//! one was written. An operation that changes at least one cell ends with
//! one named commit to the history.

use alloc::vec::Vec;
use sg_ir::{linear_to_note, note_to_linear, ParamKind, Parameter, ParameterCatalog, Pattern};

use crate::history::{
    History, CLEAR, DOUBLE_LENGTH, HALVE_LENGTH, INSERT_ROW, INTERPOLATE, REMOVE_ROW, REVERSE, TRANSPOSE,
};
use crate::position::Position;
use crate::selection::{all_columns, CellAddr, Column, Selection};

/// Externally defined bulk algorithm applied per column.
///
/// Receives the column's values across the selected rows in row order and
/// returns the same number of values. Returned values are validated
/// against the parameter before being written.
pub trait PatternEffect {
    fn apply(&self, values: &[u16], param: &Parameter) -> Vec<u16>;
}

impl<F: Fn(&[u16], &Parameter) -> Vec<u16>> PatternEffect for F {
    fn apply(&self, values: &[u16], param: &Parameter) -> Vec<u16> {
        self(values, param)
    }
}

fn read(pattern: &Pattern, cell: CellAddr) -> Option<u16> {
    pattern.get(cell.row, cell.group, cell.track, cell.param).ok()
}

fn describe(pattern: &Pattern, column: Column) -> &Parameter {
    pattern.describe(column.group, column.param as usize)
}

/// Values of `column` over `rows`, in row order.
fn column_values(pattern: &Pattern, column: Column, rows: core::ops::Range<u16>) -> Vec<u16> {
    rows.filter_map(|row| read(pattern, column.at(row))).collect()
}

/// Apply precomputed writes and commit once if anything changed.
fn write_all(pattern: &mut Pattern, writes: Vec<(CellAddr, u16)>, label: &str, history: &mut dyn History) -> usize {
    let mut changed = 0;
    for (cell, value) in writes {
        if read(pattern, cell).is_some_and(|old| old != value)
            && pattern.set(cell.row, cell.group, cell.track, cell.param, value).is_ok()
        {
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::debug!(label, changed, "transform applied");
        history.commit(label);
    }
    changed
}

/// Shift every note in the selection by `semitones`, clamped to the
/// parameter's range. Non-note cells, empty cells and note-offs are left
/// alone.
pub fn transpose(pattern: &mut Pattern, selection: &Selection, semitones: i32, history: &mut dyn History) -> usize {
    let mut writes = Vec::new();
    for cell in selection.enumerate_cells(pattern) {
        let param = pattern.describe(cell.group, cell.param as usize);
        if param.kind != ParamKind::Note {
            continue;
        }
        let Some(value) = read(pattern, cell) else { continue };
        if param.is_sentinel(value) {
            continue;
        }
        let Some(linear) = note_to_linear(value) else { continue };
        let lo = note_to_linear(param.value_min).unwrap_or(0);
        let hi = note_to_linear(param.value_max).unwrap_or(119);
        writes.push((cell, linear_to_note((linear + semitones).clamp(lo, hi))));
    }
    write_all(pattern, writes, TRANSPOSE, history)
}

/// Reverse the row order of every selected column.
pub fn reverse(pattern: &mut Pattern, selection: &Selection, history: &mut dyn History) -> usize {
    let rows = selection.rows(pattern);
    let mut writes = Vec::new();
    for column in selection.columns(pattern) {
        let values = column_values(pattern, column, rows.clone());
        writes.extend(rows.clone().zip(values.into_iter().rev()).map(|(row, v)| (column.at(row), v)));
    }
    write_all(pattern, writes, REVERSE, history)
}

/// Ramp each selected column linearly from its first to its last row.
/// Notes ramp in semitones; fractional steps truncate toward zero.
///
/// The ramp's end values are the first and last non-empty cells of the
/// column within the selection, so an empty trailing row is filled in.
/// Columns with fewer than two non-empty cells, or with a note-off at
/// either end, are skipped. Selections under two rows are a no-op.
pub fn interpolate(pattern: &mut Pattern, selection: &Selection, history: &mut dyn History) -> usize {
    let rows = selection.rows(pattern);
    if rows.len() < 2 {
        return 0;
    }
    let (first, last) = (rows.start, rows.end - 1);
    let steps = (last - first) as f64;

    let mut writes = Vec::new();
    for column in selection.columns(pattern) {
        let param = describe(pattern, column);
        let filled: Vec<(u16, u16)> = rows
            .clone()
            .filter_map(|row| read(pattern, column.at(row)).map(|v| (row, v)))
            .filter(|&(_, v)| v != param.value_none)
            .collect();
        let (Some(&(r1, v1)), Some(&(r2, v2))) = (filled.first(), filled.last()) else {
            continue;
        };
        if r1 == r2 || param.is_sentinel(v1) || param.is_sentinel(v2) {
            continue;
        }
        let (a, b) = match param.kind {
            ParamKind::Note => match (note_to_linear(v1), note_to_linear(v2)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            },
            ParamKind::Switch | ParamKind::Byte | ParamKind::Word => (v1 as i32, v2 as i32),
        };
        for row in rows.clone() {
            let f = (row - first) as f64 / steps;
            let x = libm::trunc(a as f64 + (b - a) as f64 * f) as i32;
            let value = match param.kind {
                ParamKind::Note => linear_to_note(x),
                _ => x as u16,
            };
            writes.push((column.at(row), param.sanitize(value).unwrap_or(value)));
        }
    }
    write_all(pattern, writes, INTERPOLATE, history)
}

/// Run an external effect over every selected column.
pub fn apply_effect(
    pattern: &mut Pattern,
    selection: &Selection,
    effect: &dyn PatternEffect,
    label: &str,
    history: &mut dyn History,
) -> usize {
    let rows = selection.rows(pattern);
    let mut writes = Vec::new();
    for column in selection.columns(pattern) {
        let param = describe(pattern, column);
        let values = column_values(pattern, column, rows.clone());
        let output = effect.apply(&values, param);
        if output.len() != values.len() {
            tracing::warn!(label, expected = values.len(), got = output.len(), "effect changed column length, skipped");
            continue;
        }
        for (row, value) in rows.clone().zip(output) {
            if let Some(value) = param.sanitize(value) {
                writes.push((column.at(row), value));
            }
        }
    }
    write_all(pattern, writes, label, history)
}

/// Empty every selected cell.
pub fn clear(pattern: &mut Pattern, selection: &Selection, label: &str, history: &mut dyn History) -> usize {
    let writes = selection
        .enumerate_cells(pattern)
        .into_iter()
        .map(|cell| (cell, pattern.describe(cell.group, cell.param as usize).value_none))
        .collect();
    write_all(pattern, writes, label, history)
}

/// [`clear`] with the standard label.
pub fn clear_selection(pattern: &mut Pattern, selection: &Selection, history: &mut dyn History) -> usize {
    clear(pattern, selection, CLEAR, history)
}

/// Columns a row command acts on: the selection's columns, or the
/// cursor's own column without a selection.
fn scope_columns(pattern: &Pattern, cursor: &Position, scope: Option<&Selection>) -> Vec<Column> {
    match scope.filter(|s| !s.is_empty()) {
        Some(selection) => selection.columns(pattern),
        None => {
            let column = Column { group: cursor.group, track: cursor.track, param: cursor.param };
            let valid = (column.track as usize) < pattern.track_count(column.group)
                && (column.param as usize) < pattern.parameter_count(column.group);
            if valid { alloc::vec![column] } else { Vec::new() }
        }
    }
}

/// Insert an empty row at the cursor, pushing the scoped columns down.
/// The last row's content falls off.
pub fn insert_row(pattern: &mut Pattern, cursor: &Position, scope: Option<&Selection>, history: &mut dyn History) -> usize {
    let start = cursor.row;
    let rows = pattern.rows();
    let mut writes = Vec::new();
    for column in scope_columns(pattern, cursor, scope) {
        let none = describe(pattern, column).value_none;
        for row in start..rows {
            let value = if row == start { Some(none) } else { read(pattern, column.at(row - 1)) };
            if let Some(value) = value {
                writes.push((column.at(row), value));
            }
        }
    }
    write_all(pattern, writes, INSERT_ROW, history)
}

/// Remove the cursor row from the scoped columns, pulling later rows up.
/// The last row becomes empty.
pub fn remove_row(pattern: &mut Pattern, cursor: &Position, scope: Option<&Selection>, history: &mut dyn History) -> usize {
    let start = cursor.row;
    let rows = pattern.rows();
    let mut writes = Vec::new();
    for column in scope_columns(pattern, cursor, scope) {
        let none = describe(pattern, column).value_none;
        for row in start..rows {
            let value = if row + 1 < rows { read(pattern, column.at(row + 1)) } else { Some(none) };
            if let Some(value) = value {
                writes.push((column.at(row), value));
            }
        }
    }
    write_all(pattern, writes, REMOVE_ROW, history)
}

/// Double the row count, moving row `r` to row `2r`. Odd rows end up
/// empty. Returns false if the doubled length does not fit.
pub fn double_length(pattern: &mut Pattern, history: &mut dyn History) -> bool {
    let old = pattern.rows();
    let Some(new) = old.checked_mul(2) else {
        tracing::debug!(rows = old, "double length rejected");
        return false;
    };
    let columns = all_columns(pattern);
    let snapshot: Vec<Vec<u16>> = columns.iter().map(|&c| column_values(pattern, c, 0..old)).collect();

    if pattern.resize(new).is_err() {
        return false;
    }
    for (column, values) in columns.iter().zip(snapshot) {
        let none = describe(pattern, *column).value_none;
        for row in 0..new {
            let value = if row % 2 == 0 { values[(row / 2) as usize] } else { none };
            let _ = pattern.set(row, column.group, column.track, column.param, value);
        }
    }
    history.commit(DOUBLE_LENGTH);
    true
}

/// Halve the row count, keeping even rows (`2r` → `r`). A one-row
/// pattern is left alone and false is returned.
pub fn halve_length(pattern: &mut Pattern, history: &mut dyn History) -> bool {
    let old = pattern.rows();
    if old <= 1 {
        tracing::debug!(rows = old, "halve length rejected");
        return false;
    }
    let new = old / 2;
    let columns = all_columns(pattern);
    let snapshot: Vec<Vec<u16>> = columns
        .iter()
        .map(|&c| (0..new).filter_map(|row| read(pattern, c.at(row * 2))).collect())
        .collect();

    for (column, values) in columns.iter().zip(snapshot) {
        for (row, value) in (0..new).zip(values) {
            let _ = pattern.set(row, column.group, column.track, column.param, value);
        }
    }
    if pattern.resize(new).is_err() {
        return false;
    }
    history.commit(HALVE_LENGTH);
    true
}
