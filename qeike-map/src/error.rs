//! Error types for map encoding, decoding and export

use std::io;
use std::path::PathBuf;

use qeike_core::GridError;
use thiserror::Error;

/// Map error type
#[derive(Error, Debug)]
pub enum MapError {
    /// An axis is too long for 8-bit record coordinates
    #[error("Grid {axis} of {size} exceeds the map format limit of {max}")]
    DimensionTooLarge {
        axis: &'static str,
        size: usize,
        max: usize,
    },

    /// Magic, version or header length is wrong
    #[error("Malformed map header: {0}")]
    MalformedHeader(String),

    /// Fewer coordinate records than the header declares
    #[error("Truncated map data: header declares {expected} records, found {found}")]
    TruncatedData { expected: u32, found: usize },

    /// A record lies outside the declared dimensions
    #[error(
        "Record (column {column}, row {row}, level {level}) is outside the declared {width}x{height}x{depth} grid"
    )]
    CoordinateOutOfRange {
        column: u8,
        row: u8,
        level: u8,
        width: u16,
        height: u16,
        depth: u16,
    },

    /// The header declares a grid that cannot be built
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),

    /// The export target could not be created
    #[error("Error opening file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The export target could not be written
    #[error("Error writing file {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for map operations
pub type Result<T> = std::result::Result<T, MapError>;
