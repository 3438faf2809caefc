//! The cell grid of one pattern.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::catalog::{Group, Parameter, ParameterCatalog};
use crate::edit::Edit;
use crate::error::PatternError;

/// Largest supported row count.
pub const MAX_ROWS: u16 = u16::MAX;

/// Largest track count per group. Track addresses are one byte.
pub const MAX_TRACKS: usize = u8::MAX as usize + 1;

/// Cells of one group, stored row-major:
/// `cells[(row * tracks + track) * params.len() + param]`.
#[derive(Clone, Debug, Default)]
struct GroupData {
    params: Vec<Parameter>,
    tracks: usize,
    cells: Vec<u16>,
}

impl GroupData {
    fn new(params: Vec<Parameter>, tracks: usize, rows: u16) -> Self {
        let mut data = Self { params, tracks: tracks.min(MAX_TRACKS), cells: Vec::new() };
        for _ in 0..rows {
            data.push_empty_row();
        }
        data
    }

    fn row_len(&self) -> usize {
        self.tracks * self.params.len()
    }

    fn push_empty_row(&mut self) {
        for _ in 0..self.tracks {
            self.cells.extend(self.params.iter().map(|p| p.value_none));
        }
    }

    /// Change the track count, keeping surviving tracks' cells.
    fn set_tracks(&mut self, tracks: usize, rows: u16) {
        let tracks = tracks.min(MAX_TRACKS);
        if tracks == self.tracks {
            return;
        }
        let params = self.params.len();
        let keep = tracks.min(self.tracks);
        let mut cells = Vec::with_capacity(rows as usize * tracks * params);
        for row in 0..rows as usize {
            let start = row * self.tracks * params;
            cells.extend_from_slice(&self.cells[start..start + keep * params]);
            for _ in keep..tracks {
                cells.extend(self.params.iter().map(|p| p.value_none));
            }
        }
        self.tracks = tracks;
        self.cells = cells;
    }

    /// Drop one track, shifting later tracks down.
    fn remove_track(&mut self, track: usize, rows: u16) {
        if track >= self.tracks {
            return;
        }
        let params = self.params.len();
        let mut cells = Vec::with_capacity(rows as usize * (self.tracks - 1) * params);
        for (i, chunk) in self.cells.chunks(params.max(1)).enumerate() {
            if params > 0 && i % self.tracks != track {
                cells.extend_from_slice(chunk);
            }
        }
        self.tracks -= 1;
        self.cells = cells;
    }
}

/// A pattern: `rows` rows of cells for every (group, track, parameter).
///
/// Every successful mutation is journaled as an [`Edit`]; a pattern with a
/// non-empty journal is dirty.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Pattern name, unique within its machine
    pub name: ArrayString<32>,
    rows: u16,
    groups: [GroupData; 3],
    journal: Vec<Edit>,
}

impl Pattern {
    /// Create an empty pattern laid out after `catalog`.
    pub fn new(name: &str, rows: u16, catalog: &impl ParameterCatalog) -> Result<Self, PatternError> {
        if rows == 0 {
            return Err(PatternError::InvalidRowCount(0));
        }
        let mut pattern_name = ArrayString::new();
        let _ = pattern_name.try_push_str(name);
        let groups = Group::ALL.map(|g| {
            let params = (0..catalog.parameter_count(g))
                .map(|i| catalog.describe(g, i).clone())
                .collect();
            GroupData::new(params, catalog.track_count(g), rows)
        });
        Ok(Self {
            name: pattern_name,
            rows,
            groups,
            journal: Vec::new(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, row: u16, group: Group, track: u8, param: u8) -> Result<usize, PatternError> {
        let data = &self.groups[group.index()];
        if row >= self.rows {
            return Err(PatternError::RowOutOfRange { row, rows: self.rows });
        }
        if track as usize >= data.tracks {
            return Err(PatternError::TrackOutOfRange { group, track, tracks: data.tracks });
        }
        if param as usize >= data.params.len() {
            return Err(PatternError::ParamOutOfRange { group, param, params: data.params.len() });
        }
        Ok((row as usize * data.tracks + track as usize) * data.params.len() + param as usize)
    }

    /// Read one cell.
    pub fn get(&self, row: u16, group: Group, track: u8, param: u8) -> Result<u16, PatternError> {
        let i = self.index(row, group, track, param)?;
        Ok(self.groups[group.index()].cells[i])
    }

    /// Write one cell. Writing `value_none` clears it.
    pub fn set(&mut self, row: u16, group: Group, track: u8, param: u8, value: u16) -> Result<(), PatternError> {
        let i = self.index(row, group, track, param)?;
        let cell = &mut self.groups[group.index()].cells[i];
        if *cell != value {
            self.journal.push(Edit::SetCell { row, group, track, param, old: *cell, new: value });
            *cell = value;
        }
        Ok(())
    }

    /// Grow or shrink the row count. New rows are empty; truncated rows
    /// are discarded.
    pub fn resize(&mut self, rows: u16) -> Result<(), PatternError> {
        if rows == 0 {
            return Err(PatternError::InvalidRowCount(0));
        }
        if rows == self.rows {
            return Ok(());
        }
        if rows < self.rows {
            for row in rows..self.rows {
                self.clear_row(row);
            }
            for data in &mut self.groups {
                let len = rows as usize * data.row_len();
                data.cells.truncate(len);
            }
        } else {
            for data in &mut self.groups {
                for _ in self.rows..rows {
                    data.push_empty_row();
                }
            }
        }
        self.journal.push(Edit::Resize { old: self.rows, new: rows });
        self.rows = rows;
        Ok(())
    }

    /// Journal clears for every non-empty cell of `row`.
    fn clear_row(&mut self, row: u16) {
        for group in Group::ALL {
            for track in 0..self.track_count(group) {
                for param in 0..self.parameter_count(group) {
                    let none = self.groups[group.index()].params[param].value_none;
                    // Indices come from the loops above.
                    let _ = self.set(row, group, track as u8, param as u8, none);
                }
            }
        }
    }

    /// Re-lay out the track counts after the owning machine changed them.
    ///
    /// Cells of removed tracks are dropped and not journaled; tracks that
    /// grow back start empty.
    pub fn sync_tracks(&mut self, catalog: &impl ParameterCatalog) {
        for group in Group::ALL {
            self.groups[group.index()].set_tracks(catalog.track_count(group), self.rows);
        }
        self.journal.clear();
    }

    /// Drop track `track` of `group`, e.g. when an incoming connection is
    /// removed. Later tracks move down by one.
    pub fn remove_track(&mut self, group: Group, track: usize) {
        self.groups[group.index()].remove_track(track, self.rows);
        self.journal.clear();
    }

    /// Replay a journaled edit.
    pub fn apply(&mut self, edit: &Edit) -> Result<(), PatternError> {
        match *edit {
            Edit::SetCell { row, group, track, param, new, .. } => self.set(row, group, track, param, new),
            Edit::Resize { new, .. } => self.resize(new),
        }
    }

    /// True if anything changed since the journal was last drained.
    pub fn is_dirty(&self) -> bool {
        !self.journal.is_empty()
    }

    /// Drain the edit journal.
    pub fn take_edits(&mut self) -> Vec<Edit> {
        core::mem::take(&mut self.journal)
    }
}

impl ParameterCatalog for Pattern {
    fn parameter_count(&self, group: Group) -> usize {
        self.groups[group.index()].params.len()
    }

    fn track_count(&self, group: Group) -> usize {
        self.groups[group.index()].tracks
    }

    fn describe(&self, group: Group, index: usize) -> &Parameter {
        &self.groups[group.index()].params[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Machine;

    fn machine() -> Machine {
        let mut m = Machine::new(
            "Test",
            alloc::vec![Parameter::byte("Volume", 0, 0xFE)],
            alloc::vec![Parameter::note("Note"), Parameter::byte("Vel", 0, 0x7F)],
        );
        m.set_track_count(2);
        m
    }

    #[test]
    fn new_pattern_is_empty() {
        let m = machine();
        let p = Pattern::new("00", 4, &m).unwrap();
        assert_eq!(p.rows(), 4);
        assert_eq!(p.get(3, Group::Track, 1, 1).unwrap(), 0xFF);
        assert_eq!(p.get(0, Group::Track, 0, 0).unwrap(), 0);
        assert!(!p.is_dirty());
    }

    #[test]
    fn zero_rows_rejected() {
        assert_eq!(Pattern::new("00", 0, &machine()).unwrap_err(), PatternError::InvalidRowCount(0));
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut p = Pattern::new("00", 4, &machine()).unwrap();
        assert!(matches!(p.get(4, Group::Track, 0, 0), Err(PatternError::RowOutOfRange { .. })));
        assert!(matches!(p.get(0, Group::Track, 2, 0), Err(PatternError::TrackOutOfRange { .. })));
        assert!(matches!(p.set(0, Group::Global, 0, 1, 5), Err(PatternError::ParamOutOfRange { .. })));
        assert!(matches!(p.get(0, Group::Incoming, 0, 0), Err(PatternError::TrackOutOfRange { .. })));
        assert!(!p.is_dirty());
    }

    #[test]
    fn set_marks_dirty_and_journals() {
        let mut p = Pattern::new("00", 4, &machine()).unwrap();
        p.set(1, Group::Track, 1, 0, 0x41).unwrap();
        assert_eq!(p.get(1, Group::Track, 1, 0).unwrap(), 0x41);
        assert!(p.is_dirty());
        let edits = p.take_edits();
        assert_eq!(
            edits,
            alloc::vec![Edit::SetCell { row: 1, group: Group::Track, track: 1, param: 0, old: 0, new: 0x41 }]
        );
        assert!(!p.is_dirty());
    }

    #[test]
    fn grow_pads_with_none() {
        let mut p = Pattern::new("00", 2, &machine()).unwrap();
        p.set(1, Group::Global, 0, 0, 0x40).unwrap();
        p.resize(4).unwrap();
        assert_eq!(p.rows(), 4);
        assert_eq!(p.get(1, Group::Global, 0, 0).unwrap(), 0x40);
        assert_eq!(p.get(3, Group::Global, 0, 0).unwrap(), 0xFF);
        assert_eq!(p.get(3, Group::Track, 1, 1).unwrap(), 0xFF);
    }

    #[test]
    fn shrink_truncates_and_is_reversible() {
        let mut p = Pattern::new("00", 4, &machine()).unwrap();
        p.set(3, Group::Track, 0, 0, 0x31).unwrap();
        p.take_edits();
        p.resize(2).unwrap();
        assert!(p.get(3, Group::Track, 0, 0).is_err());

        let edits = p.take_edits();
        for edit in edits.iter().rev() {
            p.apply(&edit.inverse()).unwrap();
        }
        assert_eq!(p.rows(), 4);
        assert_eq!(p.get(3, Group::Track, 0, 0).unwrap(), 0x31);
    }

    #[test]
    fn removed_tracks_do_not_resurrect() {
        let mut m = machine();
        let mut p = Pattern::new("00", 2, &m).unwrap();
        p.set(0, Group::Track, 1, 1, 0x10).unwrap();
        p.set(0, Group::Track, 0, 1, 0x20).unwrap();

        m.set_track_count(1);
        p.sync_tracks(&m);
        assert_eq!(p.track_count(Group::Track), 1);
        assert_eq!(p.get(0, Group::Track, 0, 1).unwrap(), 0x20);

        m.set_track_count(2);
        p.sync_tracks(&m);
        assert_eq!(p.get(0, Group::Track, 1, 1).unwrap(), 0xFF);
    }
}
