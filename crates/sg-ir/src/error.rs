//! Error type for pattern store access.

use crate::catalog::Group;

/// A pattern access that violated the store's bounds contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Row index past the end of the pattern
    #[error("row {row} out of range (pattern has {rows} rows)")]
    RowOutOfRange { row: u16, rows: u16 },
    /// Track index past the group's track count
    #[error("track {track} out of range for {group:?} group ({tracks} tracks)")]
    TrackOutOfRange { group: Group, track: u8, tracks: usize },
    /// Parameter index past the group's parameter count
    #[error("parameter {param} out of range for {group:?} group ({params} parameters)")]
    ParamOutOfRange { group: Group, param: u8, params: usize },
    /// Row counts must be at least 1
    #[error("invalid row count {0}")]
    InvalidRowCount(u32),
    /// No pattern with this id or name in the machine's pool
    #[error("unknown pattern")]
    UnknownPattern,
}
