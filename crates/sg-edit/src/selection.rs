//! Row-range selections scoped to a column, track, group or the whole row.

use alloc::vec::Vec;
use sg_ir::{Group, ParameterCatalog, Pattern};

use crate::position::Position;

/// How many columns a selection spans, narrowest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectionMode {
    /// One parameter of one track
    #[default]
    Column,
    /// Every parameter of one track
    Track,
    /// Every track of one group
    Group,
    /// Every group
    All,
}

impl SelectionMode {
    /// The next wider mode, if any.
    pub const fn wider(self) -> Option<SelectionMode> {
        match self {
            SelectionMode::Column => Some(SelectionMode::Track),
            SelectionMode::Track => Some(SelectionMode::Group),
            SelectionMode::Group => Some(SelectionMode::All),
            SelectionMode::All => None,
        }
    }

    /// Single hex digit used by the clipboard payload.
    pub const fn nibble(self) -> u8 {
        match self {
            SelectionMode::Column => 0,
            SelectionMode::Track => 1,
            SelectionMode::Group => 2,
            SelectionMode::All => 3,
        }
    }

    pub const fn from_nibble(nibble: u8) -> Option<SelectionMode> {
        match nibble {
            0 => Some(SelectionMode::Column),
            1 => Some(SelectionMode::Track),
            2 => Some(SelectionMode::Group),
            3 => Some(SelectionMode::All),
            _ => None,
        }
    }
}

/// One (group, track, parameter) column of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Column {
    pub group: Group,
    pub track: u8,
    pub param: u8,
}

impl Column {
    pub fn at(self, row: u16) -> CellAddr {
        CellAddr {
            row,
            group: self.group,
            track: self.track,
            param: self.param,
        }
    }
}

/// Address of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellAddr {
    pub row: u16,
    pub group: Group,
    pub track: u8,
    pub param: u8,
}

/// Every column of `group` that exists in the pattern, track-major.
fn group_columns(pattern: &Pattern, group: Group, out: &mut Vec<Column>) {
    for track in 0..pattern.track_count(group) {
        for param in 0..pattern.parameter_count(group) {
            out.push(Column { group, track: track as u8, param: param as u8 });
        }
    }
}

/// Every column of the pattern in group-major, track-major,
/// parameter-major order.
pub fn all_columns(pattern: &Pattern) -> Vec<Column> {
    let mut columns = Vec::with_capacity(pattern.cells_per_row());
    for group in Group::ALL {
        group_columns(pattern, group, &mut columns);
    }
    columns
}

/// Where a selection drag started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Anchor {
    row: u16,
    group: Group,
    track: u8,
    param: u8,
}

/// A selection: rows `begin_row..end_row` across the columns its mode
/// spans. Fields the mode spans (e.g. `param` in Track mode) are kept at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub begin_row: u16,
    /// Exclusive
    pub end_row: u16,
    pub mode: SelectionMode,
    pub group: Group,
    pub track: u8,
    pub param: u8,
    anchor: Anchor,
}

impl Selection {
    /// Start a selection at the cursor. It covers no rows until extended.
    pub fn begin(pos: &Position) -> Self {
        Self {
            begin_row: pos.row,
            end_row: pos.row,
            mode: SelectionMode::Column,
            group: pos.group,
            track: pos.track,
            param: pos.param,
            anchor: Anchor {
                row: pos.row,
                group: pos.group,
                track: pos.track,
                param: pos.param,
            },
        }
    }

    /// A selection of every row of the cursor's column.
    pub fn column_rows(pos: &Position, rows: u16) -> Self {
        let mut sel = Self::begin(pos);
        sel.begin_row = 0;
        sel.end_row = rows;
        sel.anchor.row = 0;
        sel
    }

    /// A selection covering the row range in the given mode.
    pub fn with_mode(pos: &Position, begin_row: u16, end_row: u16, mode: SelectionMode) -> Self {
        let mut sel = Self::begin(pos);
        sel.begin_row = begin_row.min(end_row);
        sel.end_row = begin_row.max(end_row);
        sel.anchor.row = sel.begin_row;
        sel.mode = mode;
        sel.focus(pos.group, pos.track, pos.param);
        sel
    }

    /// True when the selection covers no rows.
    pub fn is_empty(&self) -> bool {
        self.begin_row >= self.end_row
    }

    /// Number of rows covered.
    pub fn row_count(&self) -> u16 {
        self.end_row.saturating_sub(self.begin_row)
    }

    /// Narrowest mode covering both the anchor and `pos`.
    fn required_mode(&self, pos: &Position) -> SelectionMode {
        if pos.group != self.anchor.group {
            SelectionMode::All
        } else if pos.track != self.anchor.track {
            SelectionMode::Group
        } else if pos.param != self.anchor.param {
            SelectionMode::Track
        } else {
            SelectionMode::Column
        }
    }

    /// Extend the drag to `pos`. The row range spans anchor and cursor; the
    /// mode widens as the cursor crosses into other parameters, tracks or
    /// groups and never narrows during one drag.
    pub fn extend(&mut self, pos: &Position) {
        self.begin_row = self.anchor.row.min(pos.row);
        self.end_row = self.anchor.row.max(pos.row).saturating_add(1);
        self.mode = self.mode.max(self.required_mode(pos));
        self.focus(pos.group, pos.track, pos.param);
    }

    /// Move the columns the mode fixes onto the cursor after a cursor move.
    /// The drag anchor stays where the drag started.
    pub fn adjust(&mut self, cursor: &Position) {
        self.focus(cursor.group, cursor.track, cursor.param);
    }

    /// Widen the mode by one step. Returns false when already `All`.
    pub fn widen(&mut self) -> bool {
        match self.mode.wider() {
            Some(mode) => {
                self.mode = mode;
                self.focus(self.group, self.track, self.param);
                true
            }
            None => false,
        }
    }

    /// Set the public column fields, zeroing the ones the mode spans.
    fn focus(&mut self, group: Group, track: u8, param: u8) {
        self.group = group;
        self.track = track;
        self.param = param;
        if self.mode >= SelectionMode::Track {
            self.param = 0;
        }
        if self.mode >= SelectionMode::Group {
            self.track = 0;
        }
        if self.mode >= SelectionMode::All {
            self.group = Group::Incoming;
        }
    }

    /// Columns covered, in clipboard order. Columns that no longer exist
    /// in the pattern are left out.
    pub fn columns(&self, pattern: &Pattern) -> Vec<Column> {
        let mut columns = Vec::new();
        let tracks = pattern.track_count(self.group);
        let params = pattern.parameter_count(self.group);
        match self.mode {
            SelectionMode::Column => {
                if (self.track as usize) < tracks && (self.param as usize) < params {
                    columns.push(Column { group: self.group, track: self.track, param: self.param });
                }
            }
            SelectionMode::Track => {
                if (self.track as usize) < tracks {
                    for param in 0..params {
                        columns.push(Column { group: self.group, track: self.track, param: param as u8 });
                    }
                }
            }
            SelectionMode::Group => group_columns(pattern, self.group, &mut columns),
            SelectionMode::All => columns = all_columns(pattern),
        }
        columns
    }

    /// Rows covered that exist in the pattern.
    pub fn rows(&self, pattern: &Pattern) -> core::ops::Range<u16> {
        self.begin_row..self.end_row.min(pattern.rows())
    }

    /// Every covered cell, row-major then group, track and parameter.
    pub fn enumerate_cells(&self, pattern: &Pattern) -> Vec<CellAddr> {
        let columns = self.columns(pattern);
        let rows = self.rows(pattern);
        let mut cells = Vec::with_capacity(rows.len() * columns.len());
        for row in rows {
            cells.extend(columns.iter().map(|c| c.at(row)));
        }
        cells
    }

    /// True if the cell lies inside the selection.
    pub fn contains(&self, cell: &CellAddr) -> bool {
        if cell.row < self.begin_row || cell.row >= self.end_row {
            return false;
        }
        match self.mode {
            SelectionMode::Column => {
                cell.group == self.group && cell.track == self.track && cell.param == self.param
            }
            SelectionMode::Track => cell.group == self.group && cell.track == self.track,
            SelectionMode::Group => cell.group == self.group,
            SelectionMode::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_ir::{Machine, Parameter};

    fn pattern() -> Pattern {
        let mut m = Machine::new(
            "Test",
            vec![Parameter::byte("Volume", 0, 0xFE)],
            vec![Parameter::note("Note"), Parameter::byte("Vel", 0, 0x7F)],
        );
        m.set_track_count(2);
        m.add_connection();
        Pattern::new("00", 16, &m).unwrap()
    }

    fn pos(row: u16, group: Group, track: u8, param: u8) -> Position {
        Position { row, group, track, param, subfield: 0 }
    }

    #[test]
    fn begin_is_empty() {
        let sel = Selection::begin(&pos(4, Group::Track, 1, 1));
        assert!(sel.is_empty());
        assert_eq!(sel.mode, SelectionMode::Column);
        assert!(sel.enumerate_cells(&pattern()).is_empty());
    }

    #[test]
    fn extend_orders_rows() {
        let mut sel = Selection::begin(&pos(6, Group::Track, 0, 0));
        sel.extend(&pos(2, Group::Track, 0, 0));
        assert_eq!((sel.begin_row, sel.end_row), (2, 7));
        sel.extend(&pos(9, Group::Track, 0, 0));
        assert_eq!((sel.begin_row, sel.end_row), (6, 10));
        assert_eq!(sel.mode, SelectionMode::Column);
    }

    #[test]
    fn extend_escalates_and_never_narrows() {
        let mut sel = Selection::begin(&pos(0, Group::Track, 0, 0));
        sel.extend(&pos(1, Group::Track, 0, 1));
        assert_eq!(sel.mode, SelectionMode::Track);
        assert_eq!(sel.param, 0);

        sel.extend(&pos(2, Group::Track, 1, 1));
        assert_eq!(sel.mode, SelectionMode::Group);
        assert_eq!((sel.track, sel.param), (0, 0));

        sel.extend(&pos(3, Group::Track, 0, 0));
        assert_eq!(sel.mode, SelectionMode::Group);

        sel.extend(&pos(3, Group::Global, 0, 0));
        assert_eq!(sel.mode, SelectionMode::All);
        assert_eq!(sel.group, Group::Incoming);
    }

    #[test]
    fn adjust_follows_cursor() {
        let mut sel = Selection::with_mode(&pos(0, Group::Track, 0, 1), 0, 4, SelectionMode::Track);
        assert_eq!((sel.track, sel.param), (0, 0));
        sel.adjust(&pos(2, Group::Track, 1, 1));
        assert_eq!((sel.group, sel.track, sel.param), (Group::Track, 1, 0));
        assert_eq!((sel.begin_row, sel.end_row), (0, 4));
    }

    #[test]
    fn adjust_keeps_the_drag_anchor() {
        let mut sel = Selection::begin(&pos(0, Group::Track, 0, 0));
        sel.adjust(&pos(1, Group::Track, 1, 0));
        assert_eq!(sel.track, 1);
        assert_eq!(sel.mode, SelectionMode::Column);

        // Extending back onto the anchor's track stays narrow.
        sel.extend(&pos(2, Group::Track, 0, 0));
        assert_eq!(sel.mode, SelectionMode::Column);
        assert_eq!((sel.track, sel.begin_row, sel.end_row), (0, 0, 3));

        sel.adjust(&pos(2, Group::Track, 1, 0));
        sel.extend(&pos(2, Group::Track, 1, 0));
        assert_eq!(sel.mode, SelectionMode::Group);
    }

    #[test]
    fn enumerate_track_mode() {
        let p = pattern();
        let sel = Selection::with_mode(&pos(0, Group::Track, 1, 1), 3, 5, SelectionMode::Track);
        let cells = sel.enumerate_cells(&p);
        assert_eq!(
            cells,
            vec![
                CellAddr { row: 3, group: Group::Track, track: 1, param: 0 },
                CellAddr { row: 3, group: Group::Track, track: 1, param: 1 },
                CellAddr { row: 4, group: Group::Track, track: 1, param: 0 },
                CellAddr { row: 4, group: Group::Track, track: 1, param: 1 },
            ]
        );
    }

    #[test]
    fn enumerate_all_mode_is_group_major() {
        let p = pattern();
        let sel = Selection::with_mode(&pos(0, Group::Track, 0, 0), 0, 2, SelectionMode::All);
        let cells = sel.enumerate_cells(&p);
        // 2 incoming + 1 global + 2 tracks × 2 params
        assert_eq!(cells.len(), 2 * 7);
        assert_eq!(cells[0].group, Group::Incoming);
        assert_eq!(cells[2].group, Group::Global);
        assert_eq!(cells[3], CellAddr { row: 0, group: Group::Track, track: 0, param: 0 });
        assert_eq!(cells[6], CellAddr { row: 0, group: Group::Track, track: 1, param: 1 });
        assert_eq!(cells[7].row, 1);
    }

    #[test]
    fn enumerate_skips_rows_past_end() {
        let p = pattern();
        let sel = Selection::with_mode(&pos(0, Group::Global, 0, 0), 14, 40, SelectionMode::Column);
        assert_eq!(sel.enumerate_cells(&p).len(), 2);
    }

    #[test]
    fn contains_respects_mode() {
        let sel = Selection::with_mode(&pos(0, Group::Track, 1, 0), 2, 4, SelectionMode::Track);
        assert!(sel.contains(&CellAddr { row: 2, group: Group::Track, track: 1, param: 1 }));
        assert!(!sel.contains(&CellAddr { row: 4, group: Group::Track, track: 1, param: 1 }));
        assert!(!sel.contains(&CellAddr { row: 2, group: Group::Track, track: 0, param: 0 }));
    }

    #[test]
    fn widen_steps_to_all() {
        let mut sel = Selection::column_rows(&pos(5, Group::Track, 1, 1), 16);
        assert_eq!((sel.begin_row, sel.end_row), (0, 16));
        assert!(sel.widen());
        assert!(sel.widen());
        assert!(sel.widen());
        assert_eq!(sel.mode, SelectionMode::All);
        assert!(!sel.widen());
    }
}
