//! Application error type

use std::io;

use qeike_map::MapError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::prompt::PromptError;

/// Errors that end the program
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Map(#[from] MapError),
}
