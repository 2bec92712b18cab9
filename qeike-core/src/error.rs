//! Error types for grid operations

use thiserror::Error;

/// Grid error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// One of the requested dimensions is zero
    #[error("Invalid dimensions {width}x{height}x{depth}: every axis must be at least 1")]
    InvalidDimensions {
        width: usize,
        height: usize,
        depth: usize,
    },

    /// The cell count does not fit in memory addresses
    #[error("Grid {width}x{height}x{depth} has too many cells")]
    TooLarge {
        width: usize,
        height: usize,
        depth: usize,
    },

    /// A cell index lies outside the grid
    #[error(
        "Cell (column {column}, row {row}, level {level}) is outside a {width}x{height}x{depth} grid"
    )]
    OutOfBounds {
        column: usize,
        row: usize,
        level: usize,
        width: usize,
        height: usize,
        depth: usize,
    },
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
