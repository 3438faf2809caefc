//! Value arithmetic for typing into a cell.

use sg_ir::{note_to_linear, ParamKind, Parameter};

/// Encode a note from an octave and a semitone offset. Offsets past 11
/// carry into higher octaves. None if the result is off the keyboard.
pub fn note_value(octave: u8, semitone: u8) -> Option<u16> {
    let linear = octave as u16 * 12 + semitone as u16;
    if linear >= 120 {
        return None;
    }
    Some(((linear / 12) << 4) | (linear % 12 + 1))
}

/// Replace the octave of a pitched note.
pub fn with_octave(value: u16, octave: u8) -> Option<u16> {
    note_to_linear(value)?;
    if octave > 9 {
        return None;
    }
    Some((octave as u16) << 4 | (value & 0x0F))
}

/// Type hex digit `digit` into the nibble `subfield` (0 = most significant)
/// of a numeric cell. An empty cell starts from the parameter's minimum.
/// The result is clamped into bounds.
pub fn replace_digit(param: &Parameter, current: u16, subfield: u8, digit: u8) -> Option<u16> {
    if param.kind == ParamKind::Note || digit > 0xF {
        return None;
    }
    let width = param.display_width.min(4) as u32;
    let subfield = (subfield as u32).min(width.saturating_sub(1));
    let base = if current == param.value_none { param.value_min } else { current } as u32;
    let shift = 4 * (width - 1 - subfield);
    let value = (base & !(0xF << shift)) | (digit as u32) << shift;
    Some((value as u16).clamp(param.value_min, param.value_max))
}
