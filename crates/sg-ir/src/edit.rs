//! Journaled pattern mutations.

use crate::catalog::Group;

/// A single reversible mutation of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// One cell changed value.
    SetCell {
        row: u16,
        group: Group,
        track: u8,
        param: u8,
        old: u16,
        new: u16,
    },
    /// The row count changed. Cells dropped by a shrink are journaled as
    /// separate `SetCell` clears before this entry.
    Resize { old: u16, new: u16 },
}

impl Edit {
    /// The edit that undoes this one.
    pub fn inverse(&self) -> Edit {
        match *self {
            Edit::SetCell { row, group, track, param, old, new } => Edit::SetCell {
                row,
                group,
                track,
                param,
                old: new,
                new: old,
            },
            Edit::Resize { old, new } => Edit::Resize { old: new, new: old },
        }
    }
}
