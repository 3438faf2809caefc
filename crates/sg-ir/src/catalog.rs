//! Parameter descriptors and the catalog lookup.

use arrayvec::{ArrayString, ArrayVec};

/// Maximum number of editable sub-positions inside one cell.
pub const MAX_SUBFIELDS: usize = 4;

/// Note cell value meaning "no note".
pub const NOTE_NONE: u16 = 0;
/// Note cell value meaning "release the sounding note".
pub const NOTE_OFF: u16 = 255;
/// Lowest encodable note (C-0).
pub const NOTE_MIN: u16 = 0x01;
/// Highest encodable note (B-9).
pub const NOTE_MAX: u16 = 0x9C;

/// Switch cell value meaning "no change".
pub const SWITCH_NONE: u16 = 255;

/// One of the three parameter bands of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// One parameter set per incoming connection
    Incoming,
    /// Exactly one conceptual track
    Global,
    /// N identical tracks
    Track,
}

impl Group {
    /// All groups in navigation order.
    pub const ALL: [Group; 3] = [Group::Incoming, Group::Global, Group::Track];

    /// Position of this group in navigation order.
    pub const fn index(self) -> usize {
        match self {
            Group::Incoming => 0,
            Group::Global => 1,
            Group::Track => 2,
        }
    }

    /// Look up a group by its navigation index.
    pub const fn from_index(index: usize) -> Option<Group> {
        match index {
            0 => Some(Group::Incoming),
            1 => Some(Group::Global),
            2 => Some(Group::Track),
            _ => None,
        }
    }
}

/// How a parameter's values are interpreted and edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Note,
    Switch,
    Byte,
    Word,
}

impl ParamKind {
    /// Number of characters used to show one cell.
    pub const fn display_width(self) -> usize {
        match self {
            ParamKind::Note => 3,
            ParamKind::Switch => 1,
            ParamKind::Byte => 2,
            ParamKind::Word => 4,
        }
    }

    /// Character offsets of the independently editable sub-positions.
    ///
    /// A note has its name at offset 0 and its octave digit at offset 2;
    /// numeric kinds have one sub-position per hex digit.
    pub fn subfield_offsets(self) -> ArrayVec<u8, MAX_SUBFIELDS> {
        let mut offsets = ArrayVec::new();
        match self {
            ParamKind::Note => {
                offsets.push(0);
                offsets.push(2);
            }
            _ => {
                for i in 0..self.display_width() {
                    offsets.push(i as u8);
                }
            }
        }
        offsets
    }
}

/// Immutable descriptor of one pattern column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    /// Display name
    pub name: ArrayString<16>,
    /// Value interpretation
    pub kind: ParamKind,
    /// Smallest valid value (inclusive)
    pub value_min: u16,
    /// Largest valid value (inclusive)
    pub value_max: u16,
    /// Sentinel meaning "empty cell"
    pub value_none: u16,
    /// Value a freshly entered cell starts from
    pub default: u16,
    /// Characters used when the cell is shown
    pub display_width: usize,
    /// Character offset of each sub-position
    pub subfield_offsets: ArrayVec<u8, MAX_SUBFIELDS>,
}

impl Parameter {
    /// Create a parameter, deriving the display layout from its kind.
    pub fn new(name: &str, kind: ParamKind, value_min: u16, value_max: u16, value_none: u16, default: u16) -> Self {
        let mut param_name = ArrayString::new();
        let _ = param_name.try_push_str(name);
        Self {
            name: param_name,
            kind,
            value_min,
            value_max,
            value_none,
            default,
            display_width: kind.display_width(),
            subfield_offsets: kind.subfield_offsets(),
        }
    }

    /// A note column.
    pub fn note(name: &str) -> Self {
        Self::new(name, ParamKind::Note, NOTE_MIN, NOTE_MAX, NOTE_NONE, NOTE_NONE)
    }

    /// An on/off column.
    pub fn switch(name: &str) -> Self {
        Self::new(name, ParamKind::Switch, 0, 1, SWITCH_NONE, 0)
    }

    /// A one-byte column (`value_none` defaults to 0xFF).
    pub fn byte(name: &str, min: u16, max: u16) -> Self {
        Self::new(name, ParamKind::Byte, min, max, 0xFF, min)
    }

    /// A two-byte column (`value_none` defaults to 0xFFFF).
    pub fn word(name: &str, min: u16, max: u16) -> Self {
        Self::new(name, ParamKind::Word, min, max, 0xFFFF, min)
    }

    /// Override the empty-cell sentinel.
    pub fn with_none(mut self, value_none: u16) -> Self {
        self.value_none = value_none;
        self
    }

    /// Number of sub-positions the cursor can visit inside one cell.
    pub fn subfield_count(&self) -> usize {
        self.subfield_offsets.len()
    }

    /// True for the sentinel values that carry no pitch or magnitude.
    pub fn is_sentinel(&self, value: u16) -> bool {
        value == self.value_none || (self.kind == ParamKind::Note && value == NOTE_OFF)
    }

    /// Validate a value about to be written into a cell of this parameter.
    ///
    /// Sentinels pass through, malformed notes are rejected and everything
    /// else is clamped into bounds.
    pub fn sanitize(&self, value: u16) -> Option<u16> {
        if self.is_sentinel(value) {
            return Some(value);
        }
        match self.kind {
            ParamKind::Note => {
                let linear = note_to_linear(value)?;
                let lo = note_to_linear(self.value_min).unwrap_or(0);
                let hi = note_to_linear(self.value_max).unwrap_or(119);
                Some(linear_to_note(linear.clamp(lo, hi)))
            }
            ParamKind::Switch | ParamKind::Byte | ParamKind::Word => {
                Some(value.clamp(self.value_min, self.value_max))
            }
        }
    }
}

/// Decode a note cell value into a linear semitone number (C-0 = 0).
///
/// Encoding: high nibble = octave, low nibble = semitone 1..=12.
pub const fn note_to_linear(value: u16) -> Option<i32> {
    let octave = (value >> 4) as i32;
    let semi = (value & 0x0F) as i32;
    if value == NOTE_NONE || value == NOTE_OFF || semi < 1 || semi > 12 || octave > 9 {
        return None;
    }
    Some(octave * 12 + semi - 1)
}

/// Encode a linear semitone number as a note cell value.
pub const fn linear_to_note(linear: i32) -> u16 {
    let octave = linear.div_euclid(12);
    let semi = linear.rem_euclid(12);
    ((octave as u16) << 4) | (semi as u16 + 1)
}

/// Read-only access to the parameter layout of an owning machine.
pub trait ParameterCatalog {
    /// Number of parameters in one track of `group`.
    fn parameter_count(&self, group: Group) -> usize;

    /// Number of tracks in `group`.
    fn track_count(&self, group: Group) -> usize;

    /// Descriptor of parameter `index` in `group`. Callers bounds-check
    /// `index` against [`ParameterCatalog::parameter_count`].
    fn describe(&self, group: Group, index: usize) -> &Parameter;

    /// True when the group has no cells at all.
    fn is_group_empty(&self, group: Group) -> bool {
        self.parameter_count(group) * self.track_count(group) == 0
    }

    /// Total number of cells in one row across all groups.
    fn cells_per_row(&self) -> usize {
        Group::ALL
            .iter()
            .map(|&g| self.parameter_count(g) * self.track_count(g))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_linear_round_trip() {
        // C-4
        assert_eq!(note_to_linear(0x41), Some(48));
        assert_eq!(linear_to_note(48), 0x41);
        // B-9
        assert_eq!(note_to_linear(NOTE_MAX), Some(119));
        assert_eq!(linear_to_note(119), NOTE_MAX);
    }

    #[test]
    fn note_sentinels_do_not_decode() {
        assert_eq!(note_to_linear(NOTE_NONE), None);
        assert_eq!(note_to_linear(NOTE_OFF), None);
        assert_eq!(note_to_linear(0x40), None);
        assert_eq!(note_to_linear(0x4D), None);
    }

    #[test]
    fn subfield_layout_follows_kind() {
        assert_eq!(Parameter::note("Note").subfield_count(), 2);
        assert_eq!(Parameter::switch("Mute").subfield_count(), 1);
        assert_eq!(Parameter::byte("Vol", 0, 0xFE).subfield_count(), 2);
        let word = Parameter::word("Cutoff", 0, 0x8000);
        assert_eq!(word.subfield_count(), 4);
        assert_eq!(word.display_width, 4);
    }

    #[test]
    fn sanitize_clamps_and_rejects() {
        let byte = Parameter::byte("Vol", 0x10, 0x80);
        assert_eq!(byte.sanitize(0x05), Some(0x10));
        assert_eq!(byte.sanitize(0xF0), Some(0x80));
        assert_eq!(byte.sanitize(0xFF), Some(0xFF));

        let note = Parameter::note("Note");
        assert_eq!(note.sanitize(NOTE_OFF), Some(NOTE_OFF));
        assert_eq!(note.sanitize(0x4D), None);
        assert_eq!(note.sanitize(0x41), Some(0x41));
    }

    #[test]
    fn group_index_round_trip() {
        for g in Group::ALL {
            assert_eq!(Group::from_index(g.index()), Some(g));
        }
        assert_eq!(Group::from_index(3), None);
    }
}
