//! Qeike Core
//!
//! This crate provides the platform-independent voxel level editor core:
//! - Dense occupancy grid addressed by (level, row, column)
//! - Cursor state with edge clamping
//! - Key table and edit commands
//! - Edit session state machine
//! - Render state and serializable snapshots for testing
//!
//! This crate has NO terminal dependencies and can be driven headlessly.

pub mod command;
pub mod cursor;
pub mod error;
pub mod grid;
pub mod key;
pub mod session;
pub mod snapshot;

pub use command::{Command, Outcome, HELP_TEXT};
pub use cursor::Cursor;
pub use error::GridError;
pub use grid::{Coord, Dimensions, VoxelGrid};
pub use key::Key;
pub use session::EditSession;
pub use snapshot::{RenderState, Snapshot};
