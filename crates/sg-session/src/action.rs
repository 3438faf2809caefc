//! Commands an editor front end sends to a session.

/// One editor command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorAction {
    MoveUp(usize),
    MoveDown(usize),
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    Home,
    SetGroup(isize),
    TabForward,
    TabBackward,
    BeginSelection,
    ExtendSelection,
    SelectCycle,
    ClearSelection,
    /// Semitone offset from the base octave, or an explicit octave
    EnterNote { semitone: u8, octave: Option<u8> },
    NoteOff,
    EnterHexDigit(u8),
    DeleteCell,
    AdjustOctave(i8),
    AdjustStep(i8),
    Copy,
    Cut,
    Paste,
    EraseSelection,
    Transpose(i32),
    Reverse,
    Interpolate,
    DoubleLength,
    HalveLength,
    InsertRow,
    RemoveRow,
    Undo,
    Redo,
    NewPattern { name: String, rows: Option<u16> },
    SwitchPattern(String),
}
