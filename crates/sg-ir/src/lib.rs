//! Core data types for the stepgrid pattern editor.
//!
//! Defines parameter descriptors, the pattern cell grid and the owning
//! machine that supplies a pattern's layout. The editing crates read and
//! write patterns only through these types.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod catalog;
mod edit;
mod error;
mod machine;
mod pattern;

pub use catalog::{
    linear_to_note, note_to_linear, Group, ParamKind, Parameter, ParameterCatalog, MAX_SUBFIELDS,
    NOTE_MAX, NOTE_MIN, NOTE_NONE, NOTE_OFF, SWITCH_NONE,
};
pub use edit::Edit;
pub use error::PatternError;
pub use machine::{Machine, PatternId};
pub use pattern::{Pattern, MAX_ROWS, MAX_TRACKS};
