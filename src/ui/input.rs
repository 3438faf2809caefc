//! Editor command scripts.
//!
//! One command per line; a word starting with `#` begins a comment. Pure
//! functions that turn script text into editor actions.

use sg_session::EditorAction;

use super::cell_format::parse_note;

/// A parsed script line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Action(EditorAction),
    /// Print the grid
    Print,
    /// Describe what is on the clipboard
    Clipboard,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("bad argument {arg:?} for {command}")]
    BadArgument { command: &'static str, arg: String },
}

/// A parse failure with its 1-based line number.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    pub source: ParseError,
}

fn arg<'a>(command: &'static str, arg: Option<&'a str>) -> Result<&'a str, ParseError> {
    arg.ok_or(ParseError::MissingArgument(command))
}

fn number<T: std::str::FromStr>(command: &'static str, arg: &str) -> Result<T, ParseError> {
    arg.parse().map_err(|_| ParseError::BadArgument { command, arg: arg.to_string() })
}

fn count(command: &'static str, arg: Option<&str>) -> Result<usize, ParseError> {
    arg.map_or(Ok(1), |a| number(command, a))
}

fn group(arg: &str) -> Result<isize, ParseError> {
    match arg.to_ascii_lowercase().as_str() {
        "incoming" | "in" => Ok(0),
        "global" => Ok(1),
        "track" => Ok(2),
        other => number("group", other),
    }
}

fn hex_digit(arg: &str) -> Result<u8, ParseError> {
    let mut chars = arg.chars();
    match (chars.next().and_then(|c| c.to_digit(16)), chars.next()) {
        (Some(d), None) => Ok(d as u8),
        _ => Err(ParseError::BadArgument { command: "digit", arg: arg.to_string() }),
    }
}

/// Parse one line. Blank lines and comments yield `None`.
///
/// A comment starts at a word beginning with `#`, so `note C#` keeps
/// its sharp.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace().take_while(|w| !w.starts_with('#'));
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let first = words.next();

    let action = match name {
        "print" => return Ok(Some(Command::Print)),
        "clipboard" => return Ok(Some(Command::Clipboard)),
        "up" => EditorAction::MoveUp(count("up", first)?),
        "down" => EditorAction::MoveDown(count("down", first)?),
        "left" => EditorAction::MoveLeft,
        "right" => EditorAction::MoveRight,
        "pgup" => EditorAction::PageUp,
        "pgdn" => EditorAction::PageDown,
        "home" => EditorAction::Home,
        "group" => EditorAction::SetGroup(group(arg("group", first)?)?),
        "tab" => EditorAction::TabForward,
        "backtab" => EditorAction::TabBackward,
        "begin" => EditorAction::BeginSelection,
        "extend" => EditorAction::ExtendSelection,
        "select" => EditorAction::SelectCycle,
        "clear-selection" => EditorAction::ClearSelection,
        "note" => {
            let name = arg("note", first)?;
            let (semitone, octave) = parse_note(name)
                .ok_or_else(|| ParseError::BadArgument { command: "note", arg: name.to_string() })?;
            EditorAction::EnterNote { semitone, octave }
        }
        "off" => EditorAction::NoteOff,
        "digit" => EditorAction::EnterHexDigit(hex_digit(arg("digit", first)?)?),
        "clear" => EditorAction::DeleteCell,
        "erase" => EditorAction::EraseSelection,
        "octave" => EditorAction::AdjustOctave(number("octave", arg("octave", first)?)?),
        "step" => EditorAction::AdjustStep(number("step", arg("step", first)?)?),
        "copy" => EditorAction::Copy,
        "cut" => EditorAction::Cut,
        "paste" => EditorAction::Paste,
        "transpose" => EditorAction::Transpose(number("transpose", arg("transpose", first)?)?),
        "reverse" => EditorAction::Reverse,
        "interpolate" => EditorAction::Interpolate,
        "double" => EditorAction::DoubleLength,
        "halve" => EditorAction::HalveLength,
        "insert-row" => EditorAction::InsertRow,
        "remove-row" => EditorAction::RemoveRow,
        "undo" => EditorAction::Undo,
        "redo" => EditorAction::Redo,
        "new-pattern" => {
            let name = arg("new-pattern", first)?.to_string();
            let rows = words.next().map(|r| number("new-pattern", r)).transpose()?;
            EditorAction::NewPattern { name, rows }
        }
        "switch" => EditorAction::SwitchPattern(arg("switch", first)?.to_string()),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(Command::Action(action)))
}

/// Parse a whole script, keeping each command's line number.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>, ScriptError> {
    let mut commands = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let parsed = parse_line(line).map_err(|source| ScriptError { line: i + 1, source })?;
        if let Some(command) = parsed {
            commands.push((i + 1, command));
        }
    }
    Ok(commands)
}
