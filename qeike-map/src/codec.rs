//! QKM encoder and decoder
//!
//! A map is a header followed by one 3-byte (column, row, level) record per
//! occupied cell, in canonical order (level, then row, then column).
//! Encoding is deterministic: equal grids always produce identical bytes.

use log::{debug, warn};
use qeike_core::{Dimensions, VoxelGrid};

use crate::error::{MapError, Result};
use crate::header::{MapHeader, HEADER_LEN, MAX_DIMENSION, RECORD_LEN};

/// Check that every axis fits the 8-bit record coordinates
pub fn check_dimensions(dims: Dimensions) -> Result<()> {
    for (axis, size) in [
        ("width", dims.width),
        ("height", dims.height),
        ("depth", dims.depth),
    ] {
        if size > MAX_DIMENSION {
            return Err(MapError::DimensionTooLarge {
                axis,
                size,
                max: MAX_DIMENSION,
            });
        }
    }
    Ok(())
}

/// Encode a grid into QKM bytes
pub fn encode(grid: &VoxelGrid) -> Result<Vec<u8>> {
    let dims = grid.dimensions();
    check_dimensions(dims)?;

    // Both casts are lossless once the dimensions are checked.
    let header = MapHeader::new(
        grid.count_occupied() as u32,
        dims.width as u16,
        dims.height as u16,
        dims.depth as u16,
    );

    let mut out = Vec::with_capacity(header.encoded_len());
    out.extend_from_slice(&header.to_bytes());
    for coord in grid.occupied() {
        out.extend_from_slice(&[coord.column as u8, coord.row as u8, coord.level as u8]);
    }

    debug!(
        "Encoded {} grid with {} records into {} bytes",
        dims,
        header.occupied_count,
        out.len()
    );
    Ok(out)
}

/// Decode QKM bytes back into a grid
pub fn decode(bytes: &[u8]) -> Result<VoxelGrid> {
    let header = MapHeader::from_bytes(bytes)?;
    let dims = Dimensions::new(
        header.width as usize,
        header.height as usize,
        header.depth as usize,
    );
    if dims.max_axis() > MAX_DIMENSION {
        return Err(MapError::MalformedHeader(format!(
            "declared grid {} exceeds the format limit of {}",
            dims, MAX_DIMENSION
        )));
    }
    let mut grid = VoxelGrid::with_dimensions(dims)?;

    let body = &bytes[HEADER_LEN..];
    let expected = header.occupied_count;
    let available = body.len() / RECORD_LEN;
    if available < expected as usize {
        return Err(MapError::TruncatedData {
            expected,
            found: available,
        });
    }
    let used = expected as usize * RECORD_LEN;
    if body.len() > used {
        warn!("Ignoring {} trailing bytes after map records", body.len() - used);
    }

    for record in body[..used].chunks_exact(RECORD_LEN) {
        let (column, row, level) = (record[0], record[1], record[2]);
        let (c, r, l) = (column as usize, row as usize, level as usize);
        if !grid.contains(l, r, c) {
            return Err(MapError::CoordinateOutOfRange {
                column,
                row,
                level,
                width: header.width,
                height: header.height,
                depth: header.depth,
            });
        }
        grid.set_occupied(l, r, c, true)?;
    }

    debug!("Decoded {} grid with {} records", dims, expected);
    Ok(grid)
}
