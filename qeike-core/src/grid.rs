//! Voxel occupancy grid
//!
//! The grid is a dense 3D array of boolean cells addressed by
//! (level, row, column). Levels run along the depth axis, rows along the
//! height axis and columns along the width axis. Cells are stored in a flat
//! buffer whose layout matches the canonical enumeration order: level
//! ascending, then row, then column.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Number of levels
    pub depth: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Check that every axis is at least 1 and the cell count fits a `usize`
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        if self.cell_count().is_none() {
            return Err(GridError::TooLarge {
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        Ok(())
    }

    /// Total number of cells, or `None` on overflow
    pub fn cell_count(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.depth)
    }

    /// Largest axis length
    pub fn max_axis(&self) -> usize {
        self.width.max(self.height).max(self.depth)
    }

    /// Whether a coordinate lies inside these dimensions
    pub fn contains(&self, coord: Coord) -> bool {
        coord.column < self.width && coord.row < self.height && coord.level < self.depth
    }

    fn coord_of(&self, index: usize) -> Coord {
        let layer = self.width * self.height;
        Coord {
            column: index % self.width,
            row: (index % layer) / self.width,
            level: index / layer,
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// Position of a single cell
///
/// Field order gives the derived `Ord` the canonical enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub level: usize,
    pub row: usize,
    pub column: usize,
}

impl Coord {
    /// Create a coordinate from (column, row, level), the order used by map records
    pub fn new(column: usize, row: usize, level: usize) -> Self {
        Self { level, row, column }
    }
}

/// Dense boolean occupancy grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    dims: Dimensions,
    cells: Vec<bool>,
    /// Number of occupied cells, kept in step with `cells`
    occupied: usize,
}

impl VoxelGrid {
    /// Create an empty grid. Every axis must be at least 1.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self> {
        Self::with_dimensions(Dimensions::new(width, height, depth))
    }

    /// Create an empty grid from a `Dimensions` value
    pub fn with_dimensions(dims: Dimensions) -> Result<Self> {
        dims.validate()?;
        let count = dims.cell_count().ok_or(GridError::TooLarge {
            width: dims.width,
            height: dims.height,
            depth: dims.depth,
        })?;
        Ok(Self {
            dims,
            cells: vec![false; count],
            occupied: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn depth(&self) -> usize {
        self.dims.depth
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Whether (level, row, column) addresses a cell of this grid
    pub fn contains(&self, level: usize, row: usize, column: usize) -> bool {
        self.dims.contains(Coord { level, row, column })
    }

    fn index(&self, level: usize, row: usize, column: usize) -> Result<usize> {
        if !self.contains(level, row, column) {
            return Err(GridError::OutOfBounds {
                column,
                row,
                level,
                width: self.dims.width,
                height: self.dims.height,
                depth: self.dims.depth,
            });
        }
        Ok((level * self.dims.height + row) * self.dims.width + column)
    }

    /// Get the occupancy of a cell
    pub fn get(&self, level: usize, row: usize, column: usize) -> Result<bool> {
        let idx = self.index(level, row, column)?;
        Ok(self.cells[idx])
    }

    /// Set the occupancy of a cell
    pub fn set_occupied(&mut self, level: usize, row: usize, column: usize, value: bool) -> Result<()> {
        let idx = self.index(level, row, column)?;
        let cell = &mut self.cells[idx];
        if *cell != value {
            *cell = value;
            if value {
                self.occupied += 1;
            } else {
                self.occupied -= 1;
            }
        }
        Ok(())
    }

    /// Flip the occupancy of a cell, returning the new value
    pub fn toggle(&mut self, level: usize, row: usize, column: usize) -> Result<bool> {
        let value = !self.get(level, row, column)?;
        self.set_occupied(level, row, column, value)?;
        Ok(value)
    }

    /// Number of occupied cells
    pub fn count_occupied(&self) -> usize {
        self.occupied
    }

    /// Whether no cell is occupied
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Iterate over occupied cells in canonical order
    /// (level ascending, then row, then column)
    pub fn occupied(&self) -> impl Iterator<Item = Coord> + '_ {
        let dims = self.dims;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell)
            .map(move |(idx, _)| dims.coord_of(idx))
    }

    /// Cells of one row of one level, indexed by column
    pub fn row(&self, level: usize, row: usize) -> Result<&[bool]> {
        let start = self.index(level, row, 0)?;
        Ok(&self.cells[start..start + self.dims.width])
    }

    /// All cells of one level, row-major
    pub fn level_slice(&self, level: usize) -> Result<&[bool]> {
        let start = self.index(level, 0, 0)?;
        Ok(&self.cells[start..start + self.dims.width * self.dims.height])
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.occupied = 0;
    }
}
