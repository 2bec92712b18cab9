//! Exporting grids to files
//!
//! Export always encodes before touching the filesystem, so an encoding
//! failure such as `DimensionTooLarge` never leaves a file behind. With
//! `atomic` set the bytes go to a sibling `.tmp` file that is renamed over
//! the target once fully written.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use qeike_core::VoxelGrid;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{MapError, Result};
use crate::text;

/// Base file name used when the user enters nothing
pub const DEFAULT_BASE_NAME: &str = "level";

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Binary QKM map
    #[default]
    Qkm,
    /// Legacy text listing
    Vxl,
}

impl ExportFormat {
    /// Parse format name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "qkm" | "binary" => Some(ExportFormat::Qkm),
            "vxl" | "text" => Some(ExportFormat::Vxl),
            _ => None,
        }
    }

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Qkm => "qkm",
            ExportFormat::Vxl => "vxl",
        }
    }

    /// Encode a grid in this format
    pub fn encode(self, grid: &VoxelGrid) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Qkm => codec::encode(grid),
            ExportFormat::Vxl => Ok(text::encode_text(grid).into_bytes()),
        }
    }
}

/// Turn the text typed at the export prompt into a target path.
///
/// Surrounding whitespace is ignored, an empty entry becomes `default_name`,
/// and the format extension is appended unless the name already ends with it.
pub fn resolve_export_path(
    input: &str,
    default_name: &str,
    format: ExportFormat,
    directory: Option<&Path>,
) -> PathBuf {
    let trimmed = input.trim();
    let base = if trimmed.is_empty() {
        default_name
    } else {
        trimmed
    };

    let suffix = format!(".{}", format.extension());
    let file_name = if base.ends_with(&suffix) {
        base.to_string()
    } else {
        format!("{}{}", base, suffix)
    };

    match directory {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Encode `grid` and write it to `path`. Returns the number of bytes written.
pub fn write_map(grid: &VoxelGrid, path: &Path, format: ExportFormat, atomic: bool) -> Result<usize> {
    let bytes = format.encode(grid)?;
    if atomic {
        write_atomic(path, &bytes)?;
    } else {
        write_direct(path, &bytes)?;
    }
    info!(
        "Exported {} cells to {} ({} bytes)",
        grid.count_occupied(),
        path.display(),
        bytes.len()
    );
    Ok(bytes.len())
}

fn write_direct(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|source| MapError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|source| MapError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    debug!("Writing {} bytes to {}", bytes.len(), temp.display());

    let result = write_direct(&temp, bytes).and_then(|_| {
        fs::rename(&temp, path).map_err(|source| MapError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    });

    if let Err(e) = &result {
        warn!("Export to {} failed: {}", path.display(), e);
        if temp.exists() {
            let _ = fs::remove_file(&temp);
        }
    }
    result
}
