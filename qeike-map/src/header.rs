//! QKM map header
//!
//! The header is 19 bytes, packed, multi-byte fields little-endian:
//!
//! | offset | field          | type   |
//! |--------|----------------|--------|
//! | 0      | magic          | 8 B    |
//! | 8      | version        | u8     |
//! | 9      | occupied count | u32 LE |
//! | 13     | width          | u16 LE |
//! | 15     | height         | u16 LE |
//! | 17     | depth          | u16 LE |

use crate::error::{MapError, Result};

/// Magic bytes at the start of every map file
pub const MAGIC: &[u8; 8] = b"QEIKEMAP";

/// Current format version
pub const VERSION: u8 = 1;

/// Encoded header length in bytes
pub const HEADER_LEN: usize = 19;

/// Encoded length of one (column, row, level) record
pub const RECORD_LEN: usize = 3;

/// Largest axis length whose coordinates fit a record byte
pub const MAX_DIMENSION: usize = u8::MAX as usize;

/// Decoded map header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub version: u8,
    /// Number of coordinate records that follow the header
    pub occupied_count: u32,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
}

impl MapHeader {
    pub fn new(occupied_count: u32, width: u16, height: u16, depth: u16) -> Self {
        Self {
            version: VERSION,
            occupied_count,
            width,
            height,
            depth,
        }
    }

    /// Encode into the packed on-disk layout
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..8].copy_from_slice(MAGIC);
        out[8] = self.version;
        out[9..13].copy_from_slice(&self.occupied_count.to_le_bytes());
        out[13..15].copy_from_slice(&self.width.to_le_bytes());
        out[15..17].copy_from_slice(&self.height.to_le_bytes());
        out[17..19].copy_from_slice(&self.depth.to_le_bytes());
        out
    }

    /// Decode and validate the header at the start of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(MapError::MalformedHeader(format!(
                "expected {} header bytes, found {}",
                HEADER_LEN,
                bytes.len()
            )));
        }
        if &bytes[0..8] != MAGIC {
            return Err(MapError::MalformedHeader(format!(
                "bad magic {:?}",
                String::from_utf8_lossy(&bytes[0..8])
            )));
        }
        let version = bytes[8];
        if version != VERSION {
            return Err(MapError::MalformedHeader(format!(
                "unsupported version {} (expected {})",
                version, VERSION
            )));
        }

        Ok(Self {
            version,
            occupied_count: u32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]),
            width: u16::from_le_bytes([bytes[13], bytes[14]]),
            height: u16::from_le_bytes([bytes[15], bytes[16]]),
            depth: u16::from_le_bytes([bytes[17], bytes[18]]),
        })
    }

    /// Total encoded file length for this header
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.occupied_count as usize * RECORD_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = MapHeader::new(0x0102_0304, 3, 0x0201, 1);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..8], b"QEIKEMAP");
        assert_eq!(bytes[8], 1);
        assert_eq!(&bytes[9..13], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[13..15], &[3, 0]);
        assert_eq!(&bytes[15..17], &[0x01, 0x02]);
        assert_eq!(&bytes[17..19], &[1, 0]);
    }

    #[test]
    fn test_header_decode() {
        let header = MapHeader::new(7, 10, 20, 30);
        assert_eq!(MapHeader::from_bytes(&header.to_bytes()).unwrap(), header);
        assert_eq!(header.encoded_len(), 19 + 21);
    }

    #[test]
    fn test_header_too_short() {
        let bytes = MapHeader::new(0, 1, 1, 1).to_bytes();
        assert!(matches!(
            MapHeader::from_bytes(&bytes[..18]),
            Err(MapError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_header_bad_magic() {
        let mut bytes = MapHeader::new(0, 1, 1, 1).to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            MapHeader::from_bytes(&bytes),
            Err(MapError::MalformedHeader(msg)) if msg.contains("magic")
        ));
    }

    #[test]
    fn test_header_bad_version() {
        let mut bytes = MapHeader::new(0, 1, 1, 1).to_bytes();
        bytes[8] = 2;
        assert!(matches!(
            MapHeader::from_bytes(&bytes),
            Err(MapError::MalformedHeader(msg)) if msg.contains("version")
        ));
    }
}
