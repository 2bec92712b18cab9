//! ANSI screen renderer
//!
//! Draws the start screen, the dimension prompt and the editor frame with
//! plain escape sequences. Every frame is built in memory and written with a
//! single `write_all`, so the terminal never shows a half-drawn frame.
//!
//! Editor layout (0-based screen rows):
//! - row 0: active level, grid size and occupied count
//! - row 1: `vv` marker above the cursor column
//! - row 2: column labels
//! - rows 3..: boxed slice of the active level, `>` marking the cursor row,
//!   help text to the right
//! - below the box: export prompt and status line

use std::fmt::Write as _;
use std::io::{self, Write};

use qeike_core::{RenderState, HELP_TEXT};

use crate::prompt::START_MENU;

const CLEAR: &str = "\x1b[0m\x1b[H\x1b[2J";
const REVERSE: &str = "\x1b[7m";
const RESET: &str = "\x1b[0m";
const SHOW_CURSOR: &str = "\x1b[?25h";
const HIDE_CURSOR: &str = "\x1b[?25l";

/// Screen row of the column labels
const LABEL_ROW: usize = 2;
/// Screen column of the first cell
const CELL_COL: usize = 4;
/// Gap between the box and the help text
const HELP_GAP: usize = 3;
/// Rows below the box: blank, prompt, status
const FOOTER_ROWS: usize = 3;

/// Text shown while asking for an export file name
pub fn export_prompt_text(default_file: &str) -> String {
    format!("Enter filename (leave empty for {}): ", default_file)
}

/// Frame buffer with absolute positioning
struct Frame {
    buf: String,
}

impl Frame {
    fn new() -> Self {
        Self {
            buf: String::from(CLEAR),
        }
    }

    /// Move to a 0-based (row, column)
    fn goto(&mut self, row: usize, col: usize) {
        let _ = write!(self.buf, "\x1b[{};{}H", row + 1, col + 1);
    }

    fn put(&mut self, row: usize, col: usize, text: &str) {
        self.goto(row, col);
        self.buf.push_str(text);
    }

    fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn finish<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(self.buf.as_bytes())?;
        out.flush()
    }
}

/// Scroll window over the active slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub first_column: usize,
    pub columns: usize,
    pub first_row: usize,
    pub rows: usize,
}

impl Viewport {
    /// Largest window that fits a `term_cols` x `term_rows` terminal and
    /// keeps the cursor visible
    pub fn fit(state: &RenderState<'_>, term_cols: usize, term_rows: usize) -> Self {
        let dims = state.dimensions();
        let columns = (term_cols.saturating_sub(CELL_COL + 1) / 2).clamp(1, dims.width);
        let rows = term_rows
            .saturating_sub(LABEL_ROW + 3 + FOOTER_ROWS)
            .clamp(1, dims.height);

        Self {
            first_column: scroll_start(state.cursor.column, columns, dims.width),
            columns,
            first_row: scroll_start(state.cursor.row, rows, dims.height),
            rows,
        }
    }
}

/// First index of a `visible`-wide window over `total` items containing `pos`
fn scroll_start(pos: usize, visible: usize, total: usize) -> usize {
    if pos < visible {
        0
    } else {
        (pos + 1 - visible).min(total - visible)
    }
}

/// ANSI renderer for all screens
#[derive(Debug, Clone)]
pub struct Renderer {
    show_help: bool,
    term_size: (usize, usize),
}

impl Renderer {
    pub fn new(show_help: bool) -> Self {
        Self {
            show_help,
            term_size: (80, 24),
        }
    }

    /// Update the terminal size used for clipping
    pub fn set_size(&mut self, cols: usize, rows: usize) {
        self.term_size = (cols.max(1), rows.max(1));
    }

    /// Start screen with the menu and the typed choice
    pub fn draw_start<W: Write>(&self, out: &mut W, input: &str, message: Option<&str>) -> io::Result<()> {
        let mut frame = Frame::new();
        frame.put(0, 0, "Welcome to the Level Editor");
        frame.put(2, 0, "Type in a number or letter:");
        for (i, line) in START_MENU.iter().enumerate() {
            frame.put(3 + i, 0, line);
        }
        if let Some(message) = message {
            frame.put(8, 0, message);
        }
        frame.put(7, 0, "> ");
        frame.push(input);
        frame.push(SHOW_CURSOR);
        frame.finish(out)
    }

    /// Dimension prompt
    pub fn draw_dimension_prompt<W: Write>(
        &self,
        out: &mut W,
        input: &str,
        message: Option<&str>,
    ) -> io::Result<()> {
        let mut frame = Frame::new();
        frame.put(0, 0, "Enter dimensions for the level");
        frame.put(1, 0, "Width (columns), Height (rows) and Depth (levels)");
        if let Some(message) = message {
            frame.put(4, 0, message);
        }
        frame.put(2, 0, "> ");
        frame.push(input);
        frame.push(SHOW_CURSOR);
        frame.finish(out)
    }

    /// Editor frame. `prompt` is the export prompt line when one is open.
    pub fn draw_editor<W: Write>(
        &self,
        out: &mut W,
        state: &RenderState<'_>,
        prompt: Option<&str>,
        status: Option<&str>,
    ) -> io::Result<()> {
        let dims = state.dimensions();
        let (term_cols, term_rows) = self.term_size;
        let view = Viewport::fit(state, term_cols, term_rows);
        let cursor = state.cursor;

        let mut frame = Frame::new();
        frame.put(
            0,
            1,
            &format!(
                "Level: {}/{}   Size: {}   Occupied: {}",
                state.active_level,
                dims.depth - 1,
                dims,
                state.grid.count_occupied()
            ),
        );

        // Column marker
        let marker_col = CELL_COL + (cursor.column - view.first_column) * 2;
        frame.put(LABEL_ROW - 1, marker_col, "vv");

        // Column labels
        let mut labels = String::new();
        for column in view.first_column..view.first_column + view.columns {
            let _ = write!(labels, "{:<2}", column % 100);
        }
        frame.put(LABEL_ROW, CELL_COL, &labels);

        let border = format!("+{}+", "-".repeat(view.columns * 2));
        frame.put(LABEL_ROW + 1, CELL_COL - 1, &border);

        for (i, row) in (view.first_row..view.first_row + view.rows).enumerate() {
            let screen_row = LABEL_ROW + 2 + i;
            let row_marker = if row == cursor.row { '>' } else { ' ' };
            let mut line = format!("{}{:>2}|", row_marker, row % 100);
            for column in view.first_column..view.first_column + view.columns {
                let occupied = state.cell(row, column);
                let text = if row == cursor.row && column == cursor.column {
                    "##"
                } else {
                    "  "
                };
                if occupied {
                    line.push_str(REVERSE);
                    line.push_str(text);
                    line.push_str(RESET);
                } else {
                    line.push_str(text);
                }
            }
            line.push('|');
            frame.put(screen_row, 0, &line);
        }

        let bottom_row = LABEL_ROW + 2 + view.rows;
        frame.put(bottom_row, CELL_COL - 1, &border);

        let help_col = CELL_COL + view.columns * 2 + 1 + HELP_GAP;
        if self.show_help && help_col + 36 <= term_cols {
            for (i, line) in HELP_TEXT.iter().enumerate() {
                frame.put(LABEL_ROW + i, help_col, line);
            }
        }

        if let Some(status) = status {
            frame.put(bottom_row + 3, 0, status);
        }

        match prompt {
            Some(prompt) => {
                frame.put(bottom_row + 2, 0, prompt);
                frame.push(SHOW_CURSOR);
            }
            None => frame.push(HIDE_CURSOR),
        }

        frame.finish(out)
    }
}
