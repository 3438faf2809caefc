//! Text payload for copying selections between patterns.
//!
//! Layout: the magic tag, one hex digit for the selection mode, then one
//! fixed-width record per cell with no separators:
//!
//! ```text
//! PATTERNDATA 0 0002 2 01 00 0041 ...
//!             |   |  |  |  |   `- value (4)
//!             |   |  |  |  `- parameter (2)
//!             |   |  |  `- track (2)
//!             |   |  `- group (1)
//!             |   `- row offset from the selection's first row (4)
//!             `- mode (1)
//! ```
//! (spaces added for readability). Digits are lower-case hex on output
//! and either case on input.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use sg_ir::{Group, ParameterCatalog, Pattern};

use crate::history::{History, SystemClipboard, PASTE};
use crate::position::Position;
use crate::selection::{Selection, SelectionMode};

/// Prefix identifying pattern data on the clipboard.
pub const CLIPBOARD_MAGIC: &str = "PATTERNDATA";

/// Characters per cell record.
const RECORD_LEN: usize = 4 + 1 + 2 + 2 + 4;

/// A clipboard payload that could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// Text does not start with the magic tag
    #[error("clipboard does not hold pattern data")]
    ForeignData,
    /// Mode digit outside 0..=3
    #[error("invalid selection mode {0}")]
    InvalidMode(u32),
    /// Group digit outside 0..=2
    #[error("invalid group {group} at offset {offset}")]
    InvalidGroup { group: u32, offset: usize },
    /// Non-hex character
    #[error("invalid hex digit at offset {0}")]
    InvalidDigit(usize),
    /// Trailing characters do not form a whole record
    #[error("truncated record: {0} trailing characters")]
    TruncatedRecord(usize),
}

/// One copied cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRecord {
    pub row_offset: u16,
    pub group: Group,
    pub track: u8,
    pub param: u8,
    pub value: u16,
}

/// A decoded payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardData {
    pub mode: SelectionMode,
    pub records: Vec<ClipRecord>,
}

/// Serialize every cell of the selection.
pub fn encode(pattern: &Pattern, selection: &Selection) -> String {
    let cells = selection.enumerate_cells(pattern);
    let mut out = String::with_capacity(CLIPBOARD_MAGIC.len() + 1 + cells.len() * RECORD_LEN);
    out.push_str(CLIPBOARD_MAGIC);
    let _ = write!(out, "{:01x}", selection.mode.nibble());
    for cell in cells {
        // Cells come from the selection's own enumeration of this pattern.
        let value = pattern.get(cell.row, cell.group, cell.track, cell.param).unwrap_or_else(|_| {
            pattern.describe(cell.group, cell.param as usize).value_none
        });
        let _ = write!(
            out,
            "{:04x}{:01x}{:02x}{:02x}{:04x}",
            cell.row - selection.begin_row,
            cell.group.index(),
            cell.track,
            cell.param,
            value,
        );
    }
    out
}

fn hex_field(bytes: &[u8], offset: usize, width: usize) -> Result<u32, ClipboardError> {
    let mut value = 0u32;
    for (i, &b) in bytes[offset..offset + width].iter().enumerate() {
        let digit = (b as char).to_digit(16).ok_or(ClipboardError::InvalidDigit(offset + i))?;
        value = value << 4 | digit;
    }
    Ok(value)
}

/// Parse a payload. Surrounding whitespace is ignored.
pub fn decode(text: &str) -> Result<ClipboardData, ClipboardError> {
    let body = text
        .trim()
        .strip_prefix(CLIPBOARD_MAGIC)
        .ok_or(ClipboardError::ForeignData)?;
    let bytes = body.as_bytes();
    if bytes.is_empty() {
        return Err(ClipboardError::TruncatedRecord(0));
    }
    let mode_digit = hex_field(bytes, 0, 1)?;
    let mode = SelectionMode::from_nibble(mode_digit as u8).ok_or(ClipboardError::InvalidMode(mode_digit))?;

    let records_len = bytes.len() - 1;
    if records_len % RECORD_LEN != 0 {
        return Err(ClipboardError::TruncatedRecord(records_len % RECORD_LEN));
    }

    let mut records = Vec::with_capacity(records_len / RECORD_LEN);
    for start in (1..bytes.len()).step_by(RECORD_LEN) {
        let group_digit = hex_field(bytes, start + 4, 1)?;
        let group = Group::from_index(group_digit as usize).ok_or(ClipboardError::InvalidGroup {
            group: group_digit,
            offset: start + 4,
        })?;
        records.push(ClipRecord {
            row_offset: hex_field(bytes, start, 4)? as u16,
            group,
            track: hex_field(bytes, start + 5, 2)? as u8,
            param: hex_field(bytes, start + 7, 2)? as u8,
            value: hex_field(bytes, start + 9, 4)? as u16,
        });
    }
    Ok(ClipboardData { mode, records })
}

/// The value a record writes into `(group, param)`. A record holding its
/// own column's empty sentinel writes the destination's empty sentinel,
/// so an empty byte (0xFF) never lands in a note column as a note-off.
fn destination_value(pattern: &Pattern, record: &ClipRecord, group: Group, param: u8) -> Option<u16> {
    let dest = pattern.describe(group, param as usize);
    let source_empty = (record.param as usize) < pattern.parameter_count(record.group)
        && pattern.describe(record.group, record.param as usize).value_none == record.value;
    if source_empty {
        Some(dest.value_none)
    } else {
        dest.sanitize(record.value)
    }
}

/// Write decoded records at the cursor.
///
/// Rows are offset from the cursor row. Coordinates the payload's mode
/// held fixed (group, track and parameter for a column; group and track
/// for a track; group for a group) are taken from the cursor. Records that
/// land outside the pattern, or whose value the destination parameter
/// rejects, are skipped. Returns the number of cells changed.
pub fn paste(pattern: &mut Pattern, target: &Position, data: &ClipboardData) -> usize {
    let mut changed = 0;
    for record in &data.records {
        let group = if data.mode <= SelectionMode::Group { target.group } else { record.group };
        let track = if data.mode <= SelectionMode::Track { target.track } else { record.track };
        let param = if data.mode == SelectionMode::Column { target.param } else { record.param };
        let Some(row) = target.row.checked_add(record.row_offset) else {
            continue;
        };

        let Ok(old) = pattern.get(row, group, track, param) else {
            tracing::debug!(row, ?group, track, param, "paste record out of range, skipped");
            continue;
        };
        let Some(value) = destination_value(pattern, record, group, param) else {
            tracing::debug!(row, ?group, track, param, value = record.value, "paste value rejected");
            continue;
        };
        if value != old && pattern.set(row, group, track, param, value).is_ok() {
            changed += 1;
        }
    }
    changed
}

/// Copy the selection to the system clipboard.
pub fn copy_selection(pattern: &Pattern, selection: &Selection, clipboard: &mut dyn SystemClipboard) {
    clipboard.set_text(&encode(pattern, selection));
}

/// Paste the system clipboard at the cursor and commit if anything changed.
///
/// Foreign or malformed clipboard text leaves the pattern untouched.
pub fn paste_from(
    pattern: &mut Pattern,
    target: &Position,
    clipboard: &dyn SystemClipboard,
    history: &mut dyn History,
) -> usize {
    let Some(text) = clipboard.get_text() else {
        return 0;
    };
    let data = match decode(&text) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring clipboard contents");
            return 0;
        }
    };
    let changed = paste(pattern, target, &data);
    if changed > 0 {
        history.commit(PASTE);
    }
    changed
}
