//! Edit commands and the key table that produces them

use serde::{Deserialize, Serialize};

use crate::key::Key;

/// A discrete editing command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Decrease the active level
    LevelDown,
    /// Increase the active level
    LevelUp,
    /// Mark the cell under the cursor occupied
    Set,
    /// Mark the cell under the cursor unoccupied
    Clear,
    /// Flip the cell under the cursor
    Toggle,
    /// Ask the host to export the grid
    Export,
    Quit,
}

impl Command {
    /// Map a key to its command. Unbound keys yield `None`.
    pub fn from_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Left => Command::MoveLeft,
            Key::Right => Command::MoveRight,
            Key::Up => Command::MoveUp,
            Key::Down => Command::MoveDown,
            Key::Char('j') => Command::LevelDown,
            Key::Char('k') => Command::LevelUp,
            Key::Char(' ') | Key::Char('t') => Command::Toggle,
            Key::Char('z') => Command::Set,
            Key::Char('x') => Command::Clear,
            Key::Char('e') => Command::Export,
            Key::Char('q') | Key::Ctrl('c') => Command::Quit,
            _ => return None,
        };
        Some(command)
    }

    /// Whether the command changes grid contents
    pub fn is_edit(&self) -> bool {
        matches!(self, Command::Set | Command::Clear | Command::Toggle)
    }
}

/// Result of applying a command to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Keep editing
    Continue,
    /// The host should prompt for a file name and export the grid
    ExportRequested,
    /// The session has ended
    Quit,
}

/// Help text shown beside the map
pub const HELP_TEXT: &[&str] = &[
    "Instructions:",
    "arrow keys - move in current level",
    "j/k        - down/up level",
    "space/t    - toggle set/unset tile",
    "z          - set",
    "x          - erase",
    "e          - export",
    "q          - quit",
];
