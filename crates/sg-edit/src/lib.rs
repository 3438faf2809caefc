//! Editing operations over stepgrid patterns.
//!
//! The cursor model, row selections, the text clipboard codec and the bulk
//! transforms. Every operation takes the pattern it works on explicitly;
//! undo is left to whoever implements [`History`].
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod clipboard;
pub mod history;
pub mod position;
pub mod selection;
pub mod transform;

pub use clipboard::{ClipRecord, ClipboardData, ClipboardError, CLIPBOARD_MAGIC};
pub use history::{CommitLog, History, MemoryClipboard, SystemClipboard};
pub use position::Position;
pub use selection::{all_columns, CellAddr, Column, Selection, SelectionMode};
pub use transform::PatternEffect;
