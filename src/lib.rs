//! Qeike Level Editor Library
//!
//! The terminal front-end for the qeike voxel level editor:
//!
//! - `config`: CLI arguments, config file and environment overrides
//! - `input`: raw key bytes to keys
//! - `prompt`: start menu, dimension and file name prompts
//! - `render`: ANSI renderer for every screen
//! - `app`: screen state machine and the interactive loop
//! - `term`: raw mode and alternate screen guard
//!
//! Grid and session logic live in `qeike-core`; the map format in `qeike-map`.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod prompt;
pub mod render;
pub mod term;

pub use app::{App, Screen};
pub use config::{CliArgs, Config, ConfigError};
pub use error::AppError;
