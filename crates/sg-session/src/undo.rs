//! Undo/redo stack of committed pattern edits.

use std::collections::VecDeque;

use sg_ir::{Edit, PatternId};

/// One commit: the edits a named operation made to one pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct UndoEntry {
    pub label: String,
    pub pattern: PatternId,
    pub edits: Vec<Edit>,
}

impl UndoEntry {
    /// Edits that revert this entry, in application order.
    pub fn reverse(&self) -> impl Iterator<Item = Edit> + '_ {
        self.edits.iter().rev().map(Edit::inverse)
    }
}

/// Undo/redo stack with a bounded length.
#[derive(Debug)]
pub struct UndoStack {
    entries: VecDeque<UndoEntry>,
    position: usize,
    limit: usize,
}

impl UndoStack {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            position: 0,
            limit: limit.max(1),
        }
    }

    /// Record a commit. Drops any redo history and, past the limit, the
    /// oldest entry.
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.truncate(self.position);
        self.entries.push_back(entry);
        if self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.position = self.entries.len();
    }

    /// Step back. Returns the entry to revert, or None at the bottom.
    pub fn undo(&mut self) -> Option<&UndoEntry> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.entries.get(self.position)
    }

    /// Step forward. Returns the entry to replay, or None at the top.
    pub fn redo(&mut self) -> Option<&UndoEntry> {
        let entry = self.entries.get(self.position)?;
        self.position += 1;
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.entries.len()
    }

    /// Label of the entry the next undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        let index = self.position.checked_sub(1)?;
        self.entries.get(index).map(|e| e.label.as_str())
    }

    /// Forget every entry touching `pattern`.
    pub fn forget(&mut self, pattern: PatternId) {
        let before = self.entries.iter().take(self.position).filter(|e| e.pattern == pattern).count();
        self.entries.retain(|e| e.pattern != pattern);
        self.position -= before;
    }
}
