//! Qeike Map Format
//!
//! This crate reads and writes qeike voxel maps:
//! - QKM: packed binary header plus one 3-byte record per occupied cell
//! - VXL: the legacy plain-text listing (write-only)
//! - Export helpers: path resolution and (atomic) file writes
//!
//! The encoder refuses grids whose axes do not fit 8-bit record
//! coordinates instead of truncating them.

pub mod codec;
pub mod error;
pub mod export;
pub mod header;
pub mod text;

pub use codec::{check_dimensions, decode, encode};
pub use error::MapError;
pub use export::{resolve_export_path, write_map, ExportFormat, DEFAULT_BASE_NAME};
pub use header::{MapHeader, HEADER_LEN, MAGIC, MAX_DIMENSION, RECORD_LEN, VERSION};
pub use text::encode_text;
