//! Cursor state management
//!
//! The cursor tracks the (column, row) position on the active level slice.
//! All moves clamp at the slice edges; nothing wraps around.

use serde::{Deserialize, Serialize};

/// Cursor position on a level slice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Column position (0-indexed from the left)
    pub column: usize,
    /// Row position (0-indexed from the top)
    pub row: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move cursor to absolute position, clamping to bounds
    pub fn goto(&mut self, column: usize, row: usize, width: usize, height: usize) {
        self.column = column.min(width.saturating_sub(1));
        self.row = row.min(height.saturating_sub(1));
    }

    /// Move cursor left by one column
    pub fn move_left(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    /// Move cursor right by one column, clamping to max_column
    pub fn move_right(&mut self, max_column: usize) {
        self.column = (self.column + 1).min(max_column);
    }

    /// Move cursor up by one row
    pub fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// Move cursor down by one row, clamping to max_row
    pub fn move_down(&mut self, max_row: usize) {
        self.row = (self.row + 1).min(max_row);
    }
}
