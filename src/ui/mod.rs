//! Text front end: script input, cell formatting and the grid view.

pub mod cell_format;
pub mod grid;
pub mod input;
