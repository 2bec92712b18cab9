//! Platform-independent key representation

use serde::{Deserialize, Serialize};

/// A decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character (space included)
    Char(char),
    /// Control + letter, stored lowercase
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

impl Key {
    /// Whether the key inserts text into a line prompt
    pub fn is_printable(&self) -> bool {
        matches!(self, Key::Char(c) if !c.is_control())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable() {
        assert!(Key::Char('a').is_printable());
        assert!(Key::Char(' ').is_printable());
        assert!(!Key::Char('\u{7}').is_printable());
        assert!(!Key::Left.is_printable());
        assert!(!Key::Ctrl('c').is_printable());
    }
}
