//! Collaborator interfaces: the undo history and the system clipboard.

use alloc::string::String;
use alloc::vec::Vec;

pub const TRANSPOSE: &str = "transpose";
pub const REVERSE: &str = "reverse";
pub const INTERPOLATE: &str = "interpolate";
pub const DOUBLE_LENGTH: &str = "double length";
pub const HALVE_LENGTH: &str = "halve length";
pub const PASTE: &str = "paste selection";
pub const CUT: &str = "cut selection";
pub const CLEAR: &str = "clear selection";
pub const INSERT_ROW: &str = "insert row";
pub const REMOVE_ROW: &str = "remove row";

/// Receives a named checkpoint after each mutating operation.
pub trait History {
    fn commit(&mut self, description: &str);
}

impl<F: FnMut(&str)> History for F {
    fn commit(&mut self, description: &str) {
        self(description)
    }
}

/// Collects checkpoint labels in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitLog {
    pub labels: Vec<String>,
}

impl CommitLog {
    /// Remove and return the most recent label, clearing the log.
    pub fn take_last(&mut self) -> Option<String> {
        let last = self.labels.pop();
        self.labels.clear();
        last
    }
}

impl History for CommitLog {
    fn commit(&mut self, description: &str) {
        self.labels.push(String::from(description));
    }
}

/// Text clipboard shared with other applications.
pub trait SystemClipboard {
    fn set_text(&mut self, text: &str);
    fn get_text(&self) -> Option<String>;
}

/// Process-local clipboard.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl SystemClipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        self.text = Some(String::from(text));
    }

    fn get_text(&self) -> Option<String> {
        self.text.clone()
    }
}
