//! Cell formatting for the text grid.

use sg_session::{ParamKind, Parameter};

const NOTE_NAMES: [&str; 12] = ["C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-"];

/// Format one cell at the parameter's display width.
pub fn format_cell(param: &Parameter, value: u16) -> String {
    if value == param.value_none {
        return ".".repeat(param.display_width);
    }
    match param.kind {
        ParamKind::Note => format_note(value),
        ParamKind::Switch => format!("{:X}", value & 0xF),
        ParamKind::Byte => format!("{:02X}", value & 0xFF),
        ParamKind::Word => format!("{:04X}", value),
    }
}

/// `C-4`, `C#4`, `off` for note-off, `???` for malformed values.
pub fn format_note(value: u16) -> String {
    if value == sg_session::NOTE_OFF {
        return "off".to_string();
    }
    let semi = (value & 0x0F) as usize;
    let octave = value >> 4;
    match NOTE_NAMES.get(semi.wrapping_sub(1)) {
        Some(name) if octave <= 9 => format!("{}{}", name, octave),
        _ => "???".to_string(),
    }
}

/// Parse a note name such as `C`, `c#`, `Db` or `F#5` into a semitone
/// (0 = C) and an optional explicit octave.
pub fn parse_note(name: &str) -> Option<(u8, Option<u8>)> {
    let mut chars = name.chars();
    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (semitone, rest) = match rest.chars().next() {
        Some('#') => ((base + 1) % 12, &rest[1..]),
        Some('b') => ((base + 11) % 12, &rest[1..]),
        Some('-') => (base, &rest[1..]),
        _ => (base, rest),
    };
    let octave = match rest {
        "" => None,
        digits => Some(digits.parse::<u8>().ok().filter(|&o| o <= 9)?),
    };
    Some((semitone, octave))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_session::Parameter;

    #[test]
    fn notes() {
        assert_eq!(format_note(0x41), "C-4");
        assert_eq!(format_note(0x42), "C#4");
        assert_eq!(format_note(0x9C), "B-9");
        assert_eq!(format_note(0xFF), "off");
        assert_eq!(format_note(0x4D), "???");
    }

    #[test]
    fn cells_use_display_width() {
        let note = Parameter::note("Note");
        assert_eq!(format_cell(&note, 0), "...");
        assert_eq!(format_cell(&note, 0x41), "C-4");

        let vel = Parameter::byte("Vel", 0, 0x7F);
        assert_eq!(format_cell(&vel, 0xFF), "..");
        assert_eq!(format_cell(&vel, 0x0A), "0A");

        let cutoff = Parameter::word("Cutoff", 0, 0x8000);
        assert_eq!(format_cell(&cutoff, 0xFFFF), "....");
        assert_eq!(format_cell(&cutoff, 0x1234), "1234");

        let mute = Parameter::switch("Mute");
        assert_eq!(format_cell(&mute, 1), "1");
        assert_eq!(format_cell(&mute, 255), ".");
    }

    #[test]
    fn note_names_parse() {
        assert_eq!(parse_note("C"), Some((0, None)));
        assert_eq!(parse_note("c#"), Some((1, None)));
        assert_eq!(parse_note("Db"), Some((1, None)));
        assert_eq!(parse_note("Cb"), Some((11, None)));
        assert_eq!(parse_note("F#5"), Some((6, Some(5))));
        assert_eq!(parse_note("A-3"), Some((9, Some(3))));
        assert_eq!(parse_note("H"), None);
        assert_eq!(parse_note("C12"), None);
    }
}
