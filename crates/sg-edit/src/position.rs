//! Cursor position and navigation across the pattern grid.
//!
//! The horizontal axes nest as group → track → parameter → subfield.
//! Horizontal moves step the innermost axis first and carry into the
//! next one on overflow; vertical moves clamp to the pattern's rows.

use sg_ir::{Group, ParameterCatalog, Pattern};

/// A cursor address in a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub row: u16,
    pub group: Group,
    pub track: u8,
    pub param: u8,
    /// Sub-position inside the cell (note vs. octave, hex digit)
    pub subfield: u8,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            row: 0,
            group: Group::Incoming,
            track: 0,
            param: 0,
            subfield: 0,
        }
    }
}

/// First non-empty group strictly after (`step > 0`) or before (`step < 0`)
/// `from`, or `from` itself when `step == 0` and it is non-empty.
fn find_group(pattern: &impl ParameterCatalog, from: isize, step: isize) -> Option<Group> {
    let mut i = from;
    loop {
        let group = Group::from_index(usize::try_from(i).ok()?)?;
        if !pattern.is_group_empty(group) {
            return Some(group);
        }
        if step == 0 {
            return None;
        }
        i += step;
    }
}

impl Position {
    /// The first cell of the first non-empty group.
    pub fn first(pattern: &Pattern) -> Self {
        let mut pos = Self::default();
        pos.clamp(pattern);
        pos
    }

    /// Pull every field back into the pattern's current dimensions.
    pub fn clamp(&mut self, pattern: &Pattern) {
        self.row = self.row.min(pattern.rows().saturating_sub(1));
        if pattern.is_group_empty(self.group) {
            let from = self.group.index() as isize;
            if let Some(g) = find_group(pattern, from, 1).or_else(|| find_group(pattern, from, -1)) {
                self.group = g;
            }
        }
        self.clamp_columns(pattern);
    }

    fn clamp_columns(&mut self, pattern: &Pattern) {
        let tracks = pattern.track_count(self.group);
        let params = pattern.parameter_count(self.group);
        self.track = self.track.min(tracks.saturating_sub(1) as u8);
        self.param = self.param.min(params.saturating_sub(1) as u8);
        let subs = self.subfield_count(pattern);
        self.subfield = self.subfield.min(subs.saturating_sub(1) as u8);
    }

    /// Number of sub-positions in the cell under the cursor.
    pub fn subfield_count(&self, pattern: &Pattern) -> usize {
        if (self.param as usize) < pattern.parameter_count(self.group) {
            pattern.describe(self.group, self.param as usize).subfield_count()
        } else {
            1
        }
    }

    fn last_subfield(&self, pattern: &Pattern) -> u8 {
        self.subfield_count(pattern).saturating_sub(1) as u8
    }

    /// Step one sub-position right, carrying into parameter, track and
    /// group. Returns false at the last cell of the last non-empty group.
    pub fn move_right(&mut self, pattern: &Pattern) -> bool {
        if (self.subfield as usize) + 1 < self.subfield_count(pattern) {
            self.subfield += 1;
        } else if (self.param as usize) + 1 < pattern.parameter_count(self.group) {
            self.param += 1;
            self.subfield = 0;
        } else if (self.track as usize) + 1 < pattern.track_count(self.group) {
            self.track += 1;
            self.param = 0;
            self.subfield = 0;
        } else {
            let Some(group) = find_group(pattern, self.group.index() as isize + 1, 1) else {
                return false;
            };
            self.group = group;
            self.track = 0;
            self.param = 0;
            self.subfield = 0;
        }
        true
    }

    /// Step one sub-position left, carrying into parameter, track and
    /// group. Returns false at the first cell of the first non-empty group.
    pub fn move_left(&mut self, pattern: &Pattern) -> bool {
        if self.subfield > 0 {
            self.subfield -= 1;
        } else if self.param > 0 {
            self.param -= 1;
            self.subfield = self.last_subfield(pattern);
        } else if self.track > 0 {
            self.track -= 1;
            self.param = pattern.parameter_count(self.group).saturating_sub(1) as u8;
            self.subfield = self.last_subfield(pattern);
        } else {
            let Some(group) = find_group(pattern, self.group.index() as isize - 1, -1) else {
                return false;
            };
            self.group = group;
            self.track = pattern.track_count(group).saturating_sub(1) as u8;
            self.param = pattern.parameter_count(group).saturating_sub(1) as u8;
            self.subfield = self.last_subfield(pattern);
        }
        true
    }

    /// Move up `step` rows, stopping at row 0.
    pub fn move_up(&mut self, step: usize) {
        self.row = (self.row as usize).saturating_sub(step) as u16;
    }

    /// Move down `step` rows, stopping at the last row.
    pub fn move_down(&mut self, pattern: &Pattern, step: usize) {
        let last = pattern.rows().saturating_sub(1) as usize;
        self.row = (self.row as usize).saturating_add(step).min(last) as u16;
    }

    /// Jump to group `group` (clamped to the three groups). An empty target
    /// is skipped in the direction of travel. Returns whether a non-empty
    /// group was found; the position is unchanged otherwise.
    pub fn set_group(&mut self, pattern: &Pattern, group: isize) -> bool {
        let target = group.clamp(0, 2);
        let step = if target < self.group.index() as isize { -1 } else { 1 };
        let Some(found) = find_group(pattern, target, step) else {
            return false;
        };
        self.group = found;
        self.clamp_columns(pattern);
        true
    }

    /// Move to the first cell of the next track, continuing into the next
    /// non-empty group after the last track.
    pub fn next_track(&mut self, pattern: &Pattern) -> bool {
        if (self.track as usize) + 1 < pattern.track_count(self.group) {
            self.track += 1;
        } else {
            let Some(group) = find_group(pattern, self.group.index() as isize + 1, 1) else {
                return false;
            };
            self.group = group;
            self.track = 0;
        }
        self.param = 0;
        self.subfield = 0;
        true
    }

    /// Move to the first cell of the previous track.
    pub fn prev_track(&mut self, pattern: &Pattern) -> bool {
        if self.track > 0 {
            self.track -= 1;
        } else {
            let Some(group) = find_group(pattern, self.group.index() as isize - 1, -1) else {
                return false;
            };
            self.group = group;
            self.track = pattern.track_count(group).saturating_sub(1) as u8;
        }
        self.param = 0;
        self.subfield = 0;
        true
    }

    /// Four-stage home: first parameter of the track, then first track of
    /// the group, then the Track group, then row 0. Each press performs the
    /// first stage that is not already satisfied.
    pub fn home(&mut self, pattern: &Pattern) {
        if self.param != 0 || self.subfield != 0 {
            self.param = 0;
            self.subfield = 0;
            return;
        }
        if self.track != 0 {
            self.track = 0;
            return;
        }
        let current = self.group.index() as isize;
        let step = if Group::Track.index() as isize >= current { -1 } else { 1 };
        let target = find_group(pattern, Group::Track.index() as isize, step);
        if let Some(group) = target.filter(|&g| g != self.group) {
            self.group = group;
            return;
        }
        self.row = 0;
    }
}
