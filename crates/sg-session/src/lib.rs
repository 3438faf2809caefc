//! Headless editing session for stepgrid.
//!
//! Owns a machine and its pattern pool, the cursor, the active selection,
//! an undo stack and a clipboard, and turns editor commands into calls on
//! the `sg-edit` operations. Front ends (the CLI, tests) drive it through
//! [`EditSession::dispatch`] or the individual methods.

mod action;
mod config;
mod entry;
mod error;
mod session;
mod undo;

pub use action::EditorAction;
pub use config::EditorConfig;
pub use entry::{note_value, replace_digit, with_octave};
pub use error::SessionError;
pub use session::{EditSession, CLEAR_CELL, ENTER_NOTE, ENTER_NOTE_OFF, ENTER_VALUE};
pub use undo::{UndoEntry, UndoStack};

// Re-export common types so callers don't need sg-ir/sg-edit directly.
pub use sg_edit::{ClipboardData, MemoryClipboard, PatternEffect, Position, Selection, SelectionMode, SystemClipboard};
pub use sg_ir::{Group, Machine, ParamKind, Parameter, ParameterCatalog, Pattern, PatternId, NOTE_NONE, NOTE_OFF};
