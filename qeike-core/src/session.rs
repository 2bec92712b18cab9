//! Edit session state machine
//!
//! An `EditSession` owns the grid, the cursor and the active level. It has a
//! single control state ("editing") and one terminal transition (quit). Every
//! key is mapped through the fixed key table and applied deterministically:
//! the same key sequence always produces the same session state.

use log::{debug, trace};

use crate::command::{Command, Outcome};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::grid::{Dimensions, VoxelGrid};
use crate::key::Key;
use crate::snapshot::{RenderState, Snapshot};

/// Interactive editing state over one grid
#[derive(Debug, Clone)]
pub struct EditSession {
    grid: VoxelGrid,
    cursor: Cursor,
    /// Level currently shown and edited
    level: usize,
    finished: bool,
}

impl EditSession {
    /// Start a session on an existing grid
    pub fn new(grid: VoxelGrid) -> Self {
        debug!("Starting edit session on {} grid", grid.dimensions());
        Self {
            grid,
            cursor: Cursor::new(),
            level: 0,
            finished: false,
        }
    }

    /// Start a session on a fresh grid with the given dimensions
    pub fn with_dimensions(dims: Dimensions) -> Result<Self> {
        Ok(Self::new(VoxelGrid::with_dimensions(dims)?))
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn into_grid(self) -> VoxelGrid {
        self.grid
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn active_level(&self) -> usize {
        self.level
    }

    /// Whether quit has been applied
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Occupancy of the cell under the cursor
    pub fn current_cell(&self) -> bool {
        self.render_state().under_cursor()
    }

    /// Apply the command bound to `key`. Unbound keys change nothing.
    pub fn handle_key(&mut self, key: Key) -> Outcome {
        match Command::from_key(key) {
            Some(command) => self.apply(command),
            None => {
                trace!("Ignoring unbound key {:?}", key);
                if self.finished {
                    Outcome::Quit
                } else {
                    Outcome::Continue
                }
            }
        }
    }

    /// Apply a command
    pub fn apply(&mut self, command: Command) -> Outcome {
        if self.finished {
            trace!("Session finished, ignoring {:?}", command);
            return Outcome::Quit;
        }

        let dims = self.grid.dimensions();
        match command {
            Command::MoveLeft => self.cursor.move_left(),
            Command::MoveRight => self.cursor.move_right(dims.width - 1),
            Command::MoveUp => self.cursor.move_up(),
            Command::MoveDown => self.cursor.move_down(dims.height - 1),
            Command::LevelDown => {
                self.level = self.level.saturating_sub(1);
                debug!("Active level {}", self.level);
            }
            Command::LevelUp => {
                self.level = (self.level + 1).min(dims.depth - 1);
                debug!("Active level {}", self.level);
            }
            Command::Set => self.edit(|grid, l, r, c| grid.set_occupied(l, r, c, true)),
            Command::Clear => self.edit(|grid, l, r, c| grid.set_occupied(l, r, c, false)),
            Command::Toggle => self.edit(|grid, l, r, c| grid.toggle(l, r, c).map(|_| ())),
            Command::Export => {
                debug!(
                    "Export requested with {} occupied cells",
                    self.grid.count_occupied()
                );
                return Outcome::ExportRequested;
            }
            Command::Quit => {
                debug!("Quit");
                self.finished = true;
                return Outcome::Quit;
            }
        }
        trace!(
            "{:?} -> cursor ({}, {}) level {}",
            command,
            self.cursor.column,
            self.cursor.row,
            self.level
        );
        Outcome::Continue
    }

    fn edit<F>(&mut self, op: F)
    where
        F: FnOnce(&mut VoxelGrid, usize, usize, usize) -> Result<()>,
    {
        let (level, row, column) = (self.level, self.cursor.row, self.cursor.column);
        if let Err(e) = op(&mut self.grid, level, row, column) {
            // Cursor and level are clamped on every move, so this is a bug.
            panic!("edit session left the grid: {}", e);
        }
    }

    /// Read-only view for the renderer
    pub fn render_state(&self) -> RenderState<'_> {
        RenderState {
            grid: &self.grid,
            cursor: self.cursor,
            active_level: self.level,
        }
    }

    /// Owned, serializable copy of the render state
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::from_state(&self.render_state());
        snapshot.finished = self.finished;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use proptest::prelude::*;

    fn session(width: usize, height: usize, depth: usize) -> EditSession {
        EditSession::with_dimensions(Dimensions::new(width, height, depth)).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let s = session(3, 2, 4);
        assert_eq!(s.cursor(), Cursor::default());
        assert_eq!(s.active_level(), 0);
        assert!(!s.is_finished());
        assert!(s.grid().is_empty());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(EditSession::with_dimensions(Dimensions::new(3, 0, 1)).is_err());
    }

    #[test]
    fn test_movement_clamps() {
        let mut s = session(3, 2, 2);
        s.apply(Command::MoveLeft);
        s.apply(Command::MoveUp);
        assert_eq!(s.cursor(), Cursor::default());

        for _ in 0..5 {
            s.apply(Command::MoveRight);
            s.apply(Command::MoveDown);
        }
        assert_eq!(s.cursor(), Cursor { column: 2, row: 1 });
    }

    #[test]
    fn test_level_clamps() {
        let mut s = session(2, 2, 3);
        s.apply(Command::LevelDown);
        assert_eq!(s.active_level(), 0);

        s.handle_key(Key::Char('k'));
        s.handle_key(Key::Char('k'));
        s.handle_key(Key::Char('k'));
        assert_eq!(s.active_level(), 2);

        s.handle_key(Key::Char('j'));
        assert_eq!(s.active_level(), 1);
    }

    #[test]
    fn test_set_clear_toggle() {
        let mut s = session(3, 3, 2);
        s.apply(Command::MoveRight);
        s.apply(Command::MoveDown);
        s.apply(Command::LevelUp);

        s.apply(Command::Set);
        assert!(s.grid().get(1, 1, 1).unwrap());
        assert!(s.current_cell());

        s.apply(Command::Clear);
        assert!(!s.grid().get(1, 1, 1).unwrap());

        s.handle_key(Key::Char(' '));
        assert!(s.current_cell());
        s.handle_key(Key::Char('t'));
        assert!(!s.current_cell());
        assert!(s.grid().is_empty());
    }

    #[test]
    fn test_edits_target_active_level() {
        let mut s = session(2, 2, 3);
        s.apply(Command::LevelUp);
        s.apply(Command::LevelUp);
        s.apply(Command::Set);
        let coords: Vec<Coord> = s.grid().occupied().collect();
        assert_eq!(coords, vec![Coord::new(0, 0, 2)]);
    }

    #[test]
    fn test_export_request_does_not_mutate() {
        let mut s = session(2, 2, 1);
        s.apply(Command::Set);
        let before = s.grid().clone();
        assert_eq!(s.handle_key(Key::Char('e')), Outcome::ExportRequested);
        assert_eq!(s.grid(), &before);
        assert!(!s.is_finished());
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut s = session(2, 2, 2);
        s.apply(Command::MoveRight);
        let before = s.snapshot();
        assert_eq!(s.handle_key(Key::Char('?')), Outcome::Continue);
        assert_eq!(s.handle_key(Key::Escape), Outcome::Continue);
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut s = session(2, 2, 2);
        assert_eq!(s.handle_key(Key::Char('q')), Outcome::Quit);
        assert!(s.is_finished());

        assert_eq!(s.apply(Command::Set), Outcome::Quit);
        assert_eq!(s.apply(Command::MoveRight), Outcome::Quit);
        assert_eq!(s.handle_key(Key::Char('?')), Outcome::Quit);
        assert!(s.grid().is_empty());
        assert_eq!(s.cursor(), Cursor::default());
    }

    fn any_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::MoveLeft),
            Just(Command::MoveRight),
            Just(Command::MoveUp),
            Just(Command::MoveDown),
            Just(Command::LevelDown),
            Just(Command::LevelUp),
            Just(Command::Set),
            Just(Command::Clear),
            Just(Command::Toggle),
            Just(Command::Export),
        ]
    }

    proptest! {
        #[test]
        fn prop_cursor_and_level_stay_in_bounds(
            w in 1usize..6,
            h in 1usize..6,
            d in 1usize..6,
            commands in proptest::collection::vec(any_command(), 0..64),
        ) {
            let mut s = session(w, h, d);
            for command in commands {
                prop_assert_ne!(s.apply(command), Outcome::Quit);
                prop_assert!(s.cursor().column < w);
                prop_assert!(s.cursor().row < h);
                prop_assert!(s.active_level() < d);
            }
        }
    }
}
