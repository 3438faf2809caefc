//! The editing session: a machine, its active pattern, cursor, selection
//! and history.

use sg_edit::clipboard::{self, ClipboardData};
use sg_edit::history::CUT;
use sg_edit::transform;
use sg_edit::{CommitLog, History, MemoryClipboard, PatternEffect, Position, Selection, SelectionMode, SystemClipboard};
use sg_ir::{Machine, ParamKind, Parameter, ParameterCatalog, Pattern, PatternError, PatternId, NOTE_OFF};

use crate::action::EditorAction;
use crate::config::EditorConfig;
use crate::entry;
use crate::error::SessionError;
use crate::undo::{UndoEntry, UndoStack};

pub const ENTER_NOTE: &str = "enter note";
pub const ENTER_NOTE_OFF: &str = "note off";
pub const ENTER_VALUE: &str = "enter value";
pub const CLEAR_CELL: &str = "clear cell";

/// Headless pattern editor.
///
/// Every mutating command runs against the active pattern, drains the
/// pattern's edit journal and, when the command committed, records the
/// edits on the undo stack under the commit's label.
pub struct EditSession {
    machine: Machine,
    active: Option<PatternId>,
    cursor: Position,
    selection: Option<Selection>,
    config: EditorConfig,
    undo: UndoStack,
    clipboard: Box<dyn SystemClipboard>,
}

/// Parameter and current value of the cell under the cursor.
fn cell_at(pattern: &Pattern, cursor: &Position) -> Option<(Parameter, u16)> {
    let value = pattern.get(cursor.row, cursor.group, cursor.track, cursor.param).ok()?;
    Some((pattern.describe(cursor.group, cursor.param as usize).clone(), value))
}

fn write_cell(
    pattern: &mut Pattern,
    cursor: &Position,
    value: u16,
    label: &str,
    history: &mut dyn History,
) -> Result<(), PatternError> {
    let old = pattern.get(cursor.row, cursor.group, cursor.track, cursor.param)?;
    if old != value {
        pattern.set(cursor.row, cursor.group, cursor.track, cursor.param, value)?;
        history.commit(label);
    }
    Ok(())
}

impl EditSession {
    /// A session over `machine` with no pattern open and a process-local
    /// clipboard.
    pub fn new(machine: Machine, config: EditorConfig) -> Self {
        Self {
            machine,
            active: None,
            cursor: Position::default(),
            selection: None,
            undo: UndoStack::new(config.undo_limit),
            config,
            clipboard: Box::new(MemoryClipboard::default()),
        }
    }

    /// Share text with something other than this session.
    pub fn with_clipboard(mut self, clipboard: Box<dyn SystemClipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    // --- Accessors ---

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn cursor(&self) -> &Position {
        &self.cursor
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn active_id(&self) -> Option<PatternId> {
        self.active
    }

    /// The pattern being edited.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.active.and_then(|id| self.machine.pattern(id))
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.undo_label()
    }

    // --- Pattern management ---

    /// Make `id` the active pattern, resetting cursor and selection.
    pub fn open(&mut self, id: PatternId) -> Result<(), SessionError> {
        let pattern = self.machine.pattern(id).ok_or(PatternError::UnknownPattern)?;
        self.cursor = Position::first(pattern);
        self.selection = None;
        self.active = Some(id);
        Ok(())
    }

    /// Create a pattern in the machine's pool and open it.
    pub fn new_pattern(&mut self, name: &str, rows: Option<u16>) -> Result<PatternId, SessionError> {
        if self.machine.find_pattern(name).is_some() {
            return Err(SessionError::DuplicatePattern(name.to_string()));
        }
        let id = self.machine.create_pattern(name, rows.unwrap_or(self.config.default_rows))?;
        tracing::info!(name, "created pattern");
        self.open(id)?;
        Ok(id)
    }

    /// Open the pattern called `name`.
    pub fn switch_pattern(&mut self, name: &str) -> Result<(), SessionError> {
        let id = self
            .machine
            .find_pattern(name)
            .ok_or_else(|| SessionError::UnknownPattern(name.to_string()))?;
        self.open(id)
    }

    /// Remove a pattern and every history entry that touched it.
    pub fn remove_pattern(&mut self, id: PatternId) -> Option<Pattern> {
        let removed = self.machine.remove_pattern(id)?;
        self.undo.forget(id);
        if self.active == Some(id) {
            self.active = None;
            self.selection = None;
        }
        Some(removed)
    }

    // --- Layout ---
    //
    // Layout changes re-lay out every pattern, so recorded edits may no
    // longer address valid cells. History is reset.

    /// Returns the track count applied, capped at `MAX_TRACKS`.
    pub fn set_track_count(&mut self, tracks: usize) -> usize {
        let applied = self.machine.set_track_count(tracks);
        self.layout_changed();
        applied
    }

    /// Returns the new connection's track index, or `None` when the
    /// Incoming group is full.
    pub fn add_connection(&mut self) -> Option<usize> {
        let index = self.machine.add_connection();
        if index.is_some() {
            self.layout_changed();
        }
        index
    }

    pub fn remove_connection(&mut self, index: usize) -> bool {
        let removed = self.machine.remove_connection(index);
        if removed {
            self.layout_changed();
        }
        removed
    }

    fn layout_changed(&mut self) {
        tracing::info!("machine layout changed, history cleared");
        self.undo = UndoStack::new(self.config.undo_limit);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.navigate(|cursor, pattern| {
            cursor.clamp(pattern);
            true
        });
    }

    // --- Navigation ---

    /// Move the cursor with `f`, then bring the selection's fixed columns
    /// along with it.
    fn navigate(&mut self, f: impl FnOnce(&mut Position, &Pattern) -> bool) -> bool {
        let Some(pattern) = self.active.and_then(|id| self.machine.pattern(id)) else {
            return false;
        };
        let moved = f(&mut self.cursor, pattern);
        if let Some(selection) = self.selection.as_mut() {
            selection.adjust(&self.cursor);
        }
        moved
    }

    pub fn move_up(&mut self, rows: usize) {
        self.navigate(|cursor, _| {
            cursor.move_up(rows);
            true
        });
    }

    pub fn move_down(&mut self, rows: usize) {
        self.navigate(|cursor, pattern| {
            cursor.move_down(pattern, rows);
            true
        });
    }

    pub fn move_left(&mut self) -> bool {
        self.navigate(Position::move_left)
    }

    pub fn move_right(&mut self) -> bool {
        self.navigate(Position::move_right)
    }

    pub fn page_up(&mut self) {
        self.move_up(self.config.page_rows as usize);
    }

    pub fn page_down(&mut self) {
        self.move_down(self.config.page_rows as usize);
    }

    pub fn home(&mut self) {
        self.navigate(|cursor, pattern| {
            cursor.home(pattern);
            true
        });
    }

    pub fn set_group(&mut self, group: isize) -> bool {
        self.navigate(|cursor, pattern| cursor.set_group(pattern, group))
    }

    pub fn next_track(&mut self) -> bool {
        self.navigate(Position::next_track)
    }

    pub fn prev_track(&mut self) -> bool {
        self.navigate(Position::prev_track)
    }

    fn advance(&mut self) {
        self.move_down(self.config.step as usize);
    }

    // --- Selection ---

    /// Start a drag at the cursor.
    pub fn begin_selection(&mut self) {
        self.selection = Some(Selection::begin(&self.cursor));
    }

    /// Extend the drag to the cursor, starting one if needed.
    pub fn extend_selection(&mut self) {
        let cursor = self.cursor;
        self.selection
            .get_or_insert_with(|| Selection::begin(&cursor))
            .extend(&cursor);
    }

    /// Select every row of the cursor's column; each further call widens
    /// the selection by one mode, and a call at `All` clears it.
    pub fn select_cycle(&mut self) {
        let Some(rows) = self.pattern().map(Pattern::rows) else {
            return;
        };
        let cursor = self.cursor;
        match self.selection.as_mut() {
            None => self.selection = Some(Selection::column_rows(&cursor, rows)),
            Some(sel) if sel.mode == SelectionMode::All => self.selection = None,
            Some(sel) => {
                sel.adjust(&cursor);
                sel.widen();
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // --- Mutation plumbing ---

    /// Run `f` against the active pattern and record what it committed.
    fn edit<R>(
        &mut self,
        f: impl FnOnce(&mut Pattern, &Position, Option<&Selection>, &mut CommitLog) -> R,
    ) -> Result<R, SessionError> {
        let id = self.active.ok_or(SessionError::NoPattern)?;
        let pattern = self.machine.pattern_mut(id).ok_or(SessionError::NoPattern)?;
        let mut log = CommitLog::default();
        let result = f(pattern, &self.cursor, self.selection.as_ref(), &mut log);
        self.record(id, log);
        Ok(result)
    }

    fn record(&mut self, id: PatternId, mut log: CommitLog) {
        let Some(pattern) = self.machine.pattern_mut(id) else {
            return;
        };
        let edits = pattern.take_edits();
        let Some(label) = log.take_last() else {
            if !edits.is_empty() {
                tracing::debug!(edits = edits.len(), "uncommitted edits dropped from history");
            }
            return;
        };
        if edits.is_empty() {
            return;
        }
        tracing::info!(label = %label, edits = edits.len(), "commit");
        self.undo.push(UndoEntry { label, pattern: id, edits });
    }

    // --- Data entry ---

    /// Type a note into a Note cell and advance. Returns false when the
    /// cursor is not on a Note parameter.
    pub fn enter_note(&mut self, semitone: u8, octave: Option<u8>) -> Result<bool, SessionError> {
        let octave = octave.unwrap_or(self.config.base_octave);
        let accepted = self.edit(|pattern, cursor, _, log| {
            let Some((param, _)) = cell_at(pattern, cursor) else {
                return Ok(false);
            };
            if param.kind != ParamKind::Note {
                return Ok(false);
            }
            let Some(value) = entry::note_value(octave, semitone).and_then(|v| param.sanitize(v)) else {
                return Ok(false);
            };
            write_cell(pattern, cursor, value, ENTER_NOTE, log).map(|()| true)
        })??;
        if accepted {
            self.advance();
        }
        Ok(accepted)
    }

    /// Write a note-off into a Note cell and advance.
    pub fn note_off(&mut self) -> Result<bool, SessionError> {
        let accepted = self.edit(|pattern, cursor, _, log| match cell_at(pattern, cursor) {
            Some((param, _)) if param.kind == ParamKind::Note => {
                write_cell(pattern, cursor, NOTE_OFF, ENTER_NOTE_OFF, log).map(|()| true)
            }
            _ => Ok(false),
        })??;
        if accepted {
            self.advance();
        }
        Ok(accepted)
    }

    /// Type a hex digit at the cursor's subfield and advance.
    ///
    /// On a Note cell's octave subfield a decimal digit sets the octave.
    pub fn enter_digit(&mut self, digit: u8) -> Result<bool, SessionError> {
        let accepted = self.edit(|pattern, cursor, _, log| {
            let Some((param, old)) = cell_at(pattern, cursor) else {
                return Ok(false);
            };
            let value = match param.kind {
                ParamKind::Note if cursor.subfield == 1 => entry::with_octave(old, digit),
                ParamKind::Note => None,
                ParamKind::Switch | ParamKind::Byte | ParamKind::Word => {
                    entry::replace_digit(&param, old, cursor.subfield, digit)
                }
            };
            match value {
                Some(value) => write_cell(pattern, cursor, value, ENTER_VALUE, log).map(|()| true),
                None => Ok(false),
            }
        })??;
        if accepted {
            self.advance();
        }
        Ok(accepted)
    }

    /// Empty the cell under the cursor and advance.
    pub fn clear_cell(&mut self) -> Result<bool, SessionError> {
        let accepted = self.edit(|pattern, cursor, _, log| match cell_at(pattern, cursor) {
            Some((param, _)) => write_cell(pattern, cursor, param.value_none, CLEAR_CELL, log).map(|()| true),
            None => Ok(false),
        })??;
        if accepted {
            self.advance();
        }
        Ok(accepted)
    }

    // --- Clipboard ---

    /// Copy the selection to the clipboard. Returns the number of cells.
    pub fn copy(&mut self) -> Result<usize, SessionError> {
        let pattern = self.pattern().ok_or(SessionError::NoPattern)?;
        let Some(selection) = self.selection.as_ref() else {
            return Ok(0);
        };
        let cells = selection.enumerate_cells(pattern).len();
        let text = clipboard::encode(pattern, selection);
        self.clipboard.set_text(&text);
        Ok(cells)
    }

    /// Copy the selection, then empty it.
    pub fn cut(&mut self) -> Result<usize, SessionError> {
        let cells = self.copy()?;
        self.edit(|pattern, _, sel, log| sel.map_or(0, |s| transform::clear(pattern, s, CUT, log)))?;
        Ok(cells)
    }

    /// Paste the clipboard at the cursor. Text that is not pattern data is
    /// ignored.
    pub fn paste(&mut self) -> Result<usize, SessionError> {
        let id = self.active.ok_or(SessionError::NoPattern)?;
        let pattern = self.machine.pattern_mut(id).ok_or(SessionError::NoPattern)?;
        let mut log = CommitLog::default();
        let changed = clipboard::paste_from(pattern, &self.cursor, &*self.clipboard, &mut log);
        self.record(id, log);
        Ok(changed)
    }

    /// Decode what is on the clipboard without pasting it.
    pub fn clipboard_contents(&self) -> Result<Option<ClipboardData>, SessionError> {
        match self.clipboard.get_text() {
            Some(text) => Ok(Some(clipboard::decode(&text)?)),
            None => Ok(None),
        }
    }

    // --- Transforms ---

    pub fn erase_selection(&mut self) -> Result<usize, SessionError> {
        self.edit(|pattern, _, sel, log| sel.map_or(0, |s| transform::clear_selection(pattern, s, log)))
    }

    pub fn transpose(&mut self, semitones: i32) -> Result<usize, SessionError> {
        self.edit(|pattern, _, sel, log| sel.map_or(0, |s| transform::transpose(pattern, s, semitones, log)))
    }

    pub fn reverse(&mut self) -> Result<usize, SessionError> {
        self.edit(|pattern, _, sel, log| sel.map_or(0, |s| transform::reverse(pattern, s, log)))
    }

    pub fn interpolate(&mut self) -> Result<usize, SessionError> {
        self.edit(|pattern, _, sel, log| sel.map_or(0, |s| transform::interpolate(pattern, s, log)))
    }

    /// Run an external effect over the selection, committed as `label`.
    pub fn apply_effect(&mut self, effect: &dyn PatternEffect, label: &str) -> Result<usize, SessionError> {
        self.edit(|pattern, _, sel, log| sel.map_or(0, |s| transform::apply_effect(pattern, s, effect, label, log)))
    }

    pub fn double_length(&mut self) -> Result<bool, SessionError> {
        let doubled = self.edit(|pattern, _, _, log| transform::double_length(pattern, log))?;
        self.clamp_cursor();
        Ok(doubled)
    }

    pub fn halve_length(&mut self) -> Result<bool, SessionError> {
        let halved = self.edit(|pattern, _, _, log| transform::halve_length(pattern, log))?;
        self.clamp_cursor();
        Ok(halved)
    }

    pub fn insert_row(&mut self) -> Result<usize, SessionError> {
        self.edit(|pattern, cursor, sel, log| transform::insert_row(pattern, cursor, sel, log))
    }

    pub fn remove_row(&mut self) -> Result<usize, SessionError> {
        self.edit(|pattern, cursor, sel, log| transform::remove_row(pattern, cursor, sel, log))
    }

    // --- History ---

    /// Revert the last commit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        let Some(entry) = self.undo.undo() else {
            return Ok(false);
        };
        let id = entry.pattern;
        let pattern = self.machine.pattern_mut(id).ok_or(PatternError::UnknownPattern)?;
        for edit in entry.reverse() {
            pattern.apply(&edit)?;
        }
        pattern.take_edits();
        tracing::info!(label = %entry.label, "undo");
        self.reopen(id);
        Ok(true)
    }

    /// Replay the last undone commit.
    pub fn redo(&mut self) -> Result<bool, SessionError> {
        let Some(entry) = self.undo.redo() else {
            return Ok(false);
        };
        let id = entry.pattern;
        let pattern = self.machine.pattern_mut(id).ok_or(PatternError::UnknownPattern)?;
        for edit in &entry.edits {
            pattern.apply(edit)?;
        }
        pattern.take_edits();
        tracing::info!(label = %entry.label, "redo");
        self.reopen(id);
        Ok(true)
    }

    /// Bring the pattern a history step touched back into view.
    fn reopen(&mut self, id: PatternId) {
        if self.active != Some(id) {
            self.active = Some(id);
            self.selection = None;
        }
        self.clamp_cursor();
    }

    // --- Dispatch ---

    /// Run one editor command.
    pub fn dispatch(&mut self, action: EditorAction) -> Result<(), SessionError> {
        match action {
            EditorAction::MoveUp(rows) => self.move_up(rows),
            EditorAction::MoveDown(rows) => self.move_down(rows),
            EditorAction::MoveLeft => {
                self.move_left();
            }
            EditorAction::MoveRight => {
                self.move_right();
            }
            EditorAction::PageUp => self.page_up(),
            EditorAction::PageDown => self.page_down(),
            EditorAction::Home => self.home(),
            EditorAction::SetGroup(group) => {
                self.set_group(group);
            }
            EditorAction::TabForward => {
                self.next_track();
            }
            EditorAction::TabBackward => {
                self.prev_track();
            }
            EditorAction::BeginSelection => self.begin_selection(),
            EditorAction::ExtendSelection => self.extend_selection(),
            EditorAction::SelectCycle => self.select_cycle(),
            EditorAction::ClearSelection => self.clear_selection(),
            EditorAction::EnterNote { semitone, octave } => {
                self.enter_note(semitone, octave)?;
            }
            EditorAction::NoteOff => {
                self.note_off()?;
            }
            EditorAction::EnterHexDigit(digit) => {
                self.enter_digit(digit)?;
            }
            EditorAction::DeleteCell => {
                self.clear_cell()?;
            }
            EditorAction::AdjustOctave(delta) => self.config.adjust_octave(delta),
            EditorAction::AdjustStep(delta) => self.config.adjust_step(delta),
            EditorAction::Copy => {
                self.copy()?;
            }
            EditorAction::Cut => {
                self.cut()?;
            }
            EditorAction::Paste => {
                self.paste()?;
            }
            EditorAction::EraseSelection => {
                self.erase_selection()?;
            }
            EditorAction::Transpose(semitones) => {
                self.transpose(semitones)?;
            }
            EditorAction::Reverse => {
                self.reverse()?;
            }
            EditorAction::Interpolate => {
                self.interpolate()?;
            }
            EditorAction::DoubleLength => {
                self.double_length()?;
            }
            EditorAction::HalveLength => {
                self.halve_length()?;
            }
            EditorAction::InsertRow => {
                self.insert_row()?;
            }
            EditorAction::RemoveRow => {
                self.remove_row()?;
            }
            EditorAction::Undo => {
                self.undo()?;
            }
            EditorAction::Redo => {
                self.redo()?;
            }
            EditorAction::NewPattern { name, rows } => {
                self.new_pattern(&name, rows)?;
            }
            EditorAction::SwitchPattern(name) => self.switch_pattern(&name)?,
        }
        Ok(())
    }
}
