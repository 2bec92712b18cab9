//! Legacy plain-text voxel listing (`.vxl`)
//!
//! One comment line, one blank line, then `v <column> <row> <level>` for
//! every occupied cell in canonical order. Write-only.

use std::fmt::Write;

use qeike_core::VoxelGrid;

/// First line of every text export
pub const TEXT_HEADER: &str = "# Automatically generated by level_editor";

/// Render the occupied cells of a grid as text
pub fn encode_text(grid: &VoxelGrid) -> String {
    let mut out = String::new();
    out.push_str(TEXT_HEADER);
    out.push_str("\n\n");
    for coord in grid.occupied() {
        // Writing into a String cannot fail
        let _ = writeln!(out, "v {} {} {}", coord.column, coord.row, coord.level);
    }
    out
}
