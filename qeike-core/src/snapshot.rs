//! Render state and session snapshots
//!
//! `RenderState` is the borrowed view a renderer draws from. `Snapshot` is an
//! owned, serializable copy used for headless runs and deterministic tests.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::grid::{Coord, Dimensions, VoxelGrid};

/// Character used for occupied cells in text output
pub const OCCUPIED_CHAR: char = '#';
/// Character used for empty cells in text output
pub const EMPTY_CHAR: char = '.';

/// Everything a renderer may read from a session
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    pub grid: &'a VoxelGrid,
    pub cursor: Cursor,
    pub active_level: usize,
}

impl<'a> RenderState<'a> {
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Occupancy of (row, column) on the active level. Outside cells read as empty.
    pub fn cell(&self, row: usize, column: usize) -> bool {
        self.grid
            .get(self.active_level, row, column)
            .unwrap_or(false)
    }

    /// Occupancy of the cell under the cursor
    pub fn under_cursor(&self) -> bool {
        self.cell(self.cursor.row, self.cursor.column)
    }

    /// Text rows of the active level slice
    pub fn slice_rows(&self) -> Vec<String> {
        let dims = self.dimensions();
        let Ok(cells) = self.grid.level_slice(self.active_level) else {
            return Vec::new();
        };
        cells
            .chunks(dims.width)
            .map(|row| {
                row.iter()
                    .map(|&occupied| if occupied { OCCUPIED_CHAR } else { EMPTY_CHAR })
                    .collect()
            })
            .collect()
    }
}

/// A snapshot of the session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub dimensions: Dimensions,
    pub cursor: Cursor,
    pub active_level: usize,
    /// Occupied cells in canonical order
    pub occupied: Vec<Coord>,
    /// Active level slice, one string per row
    pub slice: Vec<String>,
    /// Whether the session has quit
    pub finished: bool,
}

impl Snapshot {
    /// Create a snapshot from a render state
    pub fn from_state(state: &RenderState<'_>) -> Self {
        Snapshot {
            dimensions: state.dimensions(),
            cursor: state.cursor,
            active_level: state.active_level,
            occupied: state.grid.occupied().collect(),
            slice: state.slice_rows(),
            finished: false,
        }
    }

    /// Get the text of a row of the active slice
    pub fn row_text(&self, row: usize) -> &str {
        self.slice.get(row).map(String::as_str).unwrap_or("")
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a simple text-based representation for debugging
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Size: {}\n", self.dimensions));
        s.push_str(&format!(
            "Cursor: ({}, {}) level={}\n",
            self.cursor.column, self.cursor.row, self.active_level
        ));
        s.push_str(&format!("Occupied: {}\n", self.occupied.len()));
        s.push_str("---\n");

        for (row_idx, line) in self.slice.iter().enumerate() {
            let cursor_marker = if row_idx == self.cursor.row {
                format!(" <- cursor at column {}", self.cursor.column)
            } else {
                String::new()
            };
            s.push_str(&format!("{:3}|{}|{}\n", row_idx, line, cursor_marker));
        }

        s
    }
}
