//! Line prompts: start menu, dimensions and file names
//!
//! Parsing is kept separate from the terminal so every rule can be tested
//! on plain strings. Invalid input is always an error value; the caller
//! shows its message and prompts again.

use qeike_core::{Dimensions, GridError, Key};
use thiserror::Error;

/// Longest line the prompt editor accepts
pub const MAX_LINE_LEN: usize = 255;

/// Prompt error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// Input was not in the expected shape
    #[error("{0}")]
    ParseFailure(String),

    /// Input parsed but named an empty grid
    #[error(transparent)]
    InvalidDimensions(#[from] GridError),

    /// Input parsed but the grid would not fit in memory comfortably
    #[error("A {dims} grid has {cells} cells; the limit is {max}")]
    GridTooLarge {
        dims: Dimensions,
        cells: u128,
        max: usize,
    },
}

/// Result type for prompt parsing
pub type Result<T> = std::result::Result<T, PromptError>;

/// Choice made on the start screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartChoice {
    /// Create and edit a new map
    NewMap,
    /// Open an existing map (not available; the app says so and exits)
    Open,
    /// Leave the program
    Exit,
}

/// Start screen menu lines
pub const START_MENU: &[&str] = &[
    "1) Create a [N]ew map",
    "2) [O]pen existing map to edit it (not supported)",
    "3) [E]xit",
];

/// Parse the start screen input. Only the first character counts.
pub fn parse_start_choice(input: &str) -> Result<StartChoice> {
    match input.trim_start().chars().next() {
        Some('1' | 'N' | 'n') => Ok(StartChoice::NewMap),
        Some('2' | 'O' | 'o') => Ok(StartChoice::Open),
        Some('3' | 'E' | 'e') => Ok(StartChoice::Exit),
        _ => Err(PromptError::ParseFailure(
            "Unrecognized choice. Try \"1\", \"O\" or \"e\".".to_string(),
        )),
    }
}

/// Parse "width height depth" as typed at the dimension prompt
pub fn parse_dimensions(input: &str) -> Result<Dimensions> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(PromptError::ParseFailure(format!(
            "Expected three numbers (width height depth), got {}",
            tokens.len()
        )));
    }
    dimensions_from_tokens(&tokens)
}

/// Parse a compact size such as `16x16x4` or `16,16,4`
pub fn parse_size(input: &str) -> Result<Dimensions> {
    let tokens: Vec<&str> = input
        .trim()
        .split(|c: char| c == 'x' || c == 'X' || c == ',')
        .map(str::trim)
        .collect();
    if tokens.len() != 3 {
        return Err(PromptError::ParseFailure(format!(
            "Expected WIDTHxHEIGHTxDEPTH, got {:?}",
            input
        )));
    }
    dimensions_from_tokens(&tokens)
}

fn dimensions_from_tokens(tokens: &[&str]) -> Result<Dimensions> {
    let mut values = [0i64; 3];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token
            .parse()
            .map_err(|_| PromptError::ParseFailure(format!("{:?} is not a whole number", token)))?;
    }

    // Non-positive axes are reported as zero-sized
    let axis = |v: i64| usize::try_from(v).unwrap_or(0);
    let dims = Dimensions::new(axis(values[0]), axis(values[1]), axis(values[2]));
    dims.validate()?;
    Ok(dims)
}

/// Reject grids with more than `max` cells
pub fn check_grid_size(dims: Dimensions, max: usize) -> Result<()> {
    let cells = (dims.width as u128)
        .saturating_mul(dims.height as u128)
        .saturating_mul(dims.depth as u128);
    if cells > max as u128 {
        return Err(PromptError::GridTooLarge { dims, cells, max });
    }
    Ok(())
}

/// What a key did to the line being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Still editing
    Pending,
    /// Enter pressed; the finished line
    Submitted(String),
    /// Escape pressed
    Cancelled,
}

/// Single-line input buffer for the prompts
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Apply one key
    pub fn handle_key(&mut self, key: Key) -> LineEvent {
        match key {
            Key::Enter => LineEvent::Submitted(std::mem::take(&mut self.buffer)),
            Key::Escape => {
                self.buffer.clear();
                LineEvent::Cancelled
            }
            Key::Backspace => {
                self.buffer.pop();
                LineEvent::Pending
            }
            Key::Ctrl('u') => {
                self.buffer.clear();
                LineEvent::Pending
            }
            Key::Char(c) if key.is_printable() => {
                if self.buffer.chars().count() < MAX_LINE_LEN {
                    self.buffer.push(c);
                }
                LineEvent::Pending
            }
            _ => LineEvent::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_choices() {
        for input in ["1", "N", "n", "new", "  1"] {
            assert_eq!(parse_start_choice(input), Ok(StartChoice::NewMap));
        }
        for input in ["2", "O", "open"] {
            assert_eq!(parse_start_choice(input), Ok(StartChoice::Open));
        }
        for input in ["3", "E", "exit"] {
            assert_eq!(parse_start_choice(input), Ok(StartChoice::Exit));
        }
    }

    #[test]
    fn test_invalid_start_choice() {
        for input in ["", "   ", "4", "x", "?"] {
            let err = parse_start_choice(input).unwrap_err();
            assert!(matches!(err, PromptError::ParseFailure(_)));
        }
        assert_eq!(
            parse_start_choice("9").unwrap_err().to_string(),
            "Unrecognized choice. Try \"1\", \"O\" or \"e\"."
        );
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("4 4 4"), Ok(Dimensions::new(4, 4, 4)));
        assert_eq!(
            parse_dimensions("  16\t8   2 "),
            Ok(Dimensions::new(16, 8, 2))
        );
    }

    #[test]
    fn test_parse_dimensions_failures() {
        assert!(matches!(
            parse_dimensions("abc"),
            Err(PromptError::ParseFailure(_))
        ));
        assert!(matches!(
            parse_dimensions("4 4"),
            Err(PromptError::ParseFailure(_))
        ));
        assert!(matches!(
            parse_dimensions("4 4 4 4"),
            Err(PromptError::ParseFailure(_))
        ));
        assert!(matches!(
            parse_dimensions("4 four 4"),
            Err(PromptError::ParseFailure(_))
        ));
        assert!(matches!(
            parse_dimensions(""),
            Err(PromptError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_parse_dimensions_non_positive() {
        assert_eq!(
            parse_dimensions("0 4 4"),
            Err(PromptError::InvalidDimensions(GridError::InvalidDimensions {
                width: 0,
                height: 4,
                depth: 4
            }))
        );
        assert!(matches!(
            parse_dimensions("4 -2 4"),
            Err(PromptError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("16x8x2"), Ok(Dimensions::new(16, 8, 2)));
        assert_eq!(parse_size("3,2,1"), Ok(Dimensions::new(3, 2, 1)));
        assert_eq!(parse_size(" 5 X 5 X 5 "), Ok(Dimensions::new(5, 5, 5)));
        assert!(matches!(parse_size("8x8"), Err(PromptError::ParseFailure(_))));
        assert!(matches!(
            parse_size("8x0x8"),
            Err(PromptError::InvalidDimensions(_))
        ));
        assert!(matches!(
            parse_size("8589934592x8589934592x1"),
            Err(PromptError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_check_grid_size() {
        assert!(check_grid_size(Dimensions::new(4, 4, 4), 64).is_ok());
        assert!(matches!(
            check_grid_size(Dimensions::new(4, 4, 5), 64),
            Err(PromptError::GridTooLarge { cells: 80, .. })
        ));
        let huge = Dimensions::new(usize::MAX, usize::MAX, 2);
        assert!(check_grid_size(huge, usize::MAX).is_err());
    }

    #[test]
    fn test_line_editor() {
        let mut line = LineEditor::new();
        for c in "castlex".chars() {
            assert_eq!(line.handle_key(Key::Char(c)), LineEvent::Pending);
        }
        line.handle_key(Key::Backspace);
        line.handle_key(Key::Up);
        assert_eq!(line.text(), "castle");
        assert_eq!(
            line.handle_key(Key::Enter),
            LineEvent::Submitted("castle".to_string())
        );
        assert_eq!(line.text(), "");
    }

    #[test]
    fn test_line_editor_cancel_and_kill() {
        let mut line = LineEditor::new();
        line.handle_key(Key::Char('a'));
        line.handle_key(Key::Ctrl('u'));
        assert_eq!(line.text(), "");

        line.handle_key(Key::Char('b'));
        assert_eq!(line.handle_key(Key::Escape), LineEvent::Cancelled);
        assert_eq!(line.text(), "");
    }

    #[test]
    fn test_line_editor_length_limit() {
        let mut line = LineEditor::new();
        for _ in 0..MAX_LINE_LEN + 10 {
            line.handle_key(Key::Char('a'));
        }
        assert_eq!(line.text().len(), MAX_LINE_LEN);
    }
}
