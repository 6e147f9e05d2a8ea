//! Export file header decoding.
//!
//! Block 0 of every export file carries the header: a format marker, the
//! format version code, feature flags, the block size governing the rest of
//! the file, the master-table location, a CRC-32C checksum, and three
//! length-prefixed strings recorded at export time (human-readable version
//! name, character-set identifier, export date).
//!
//! Header decoding is the only step that can reject the whole file; every
//! later failure is scoped to a single directory entry, table, or row.

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::dump::charset::Charset;
use crate::dump::constants::*;
use crate::DumpError;

/// Parsed and validated file header.
#[derive(Debug, Clone, Serialize)]
pub struct FileHeader {
    /// Format version code (e.g. 0x0401). Bytes 4-5.
    pub version_code: u16,
    /// Feature flags. Bytes 6-7.
    pub flags: u16,
    /// Block size in bytes, fixed for the whole file. Bytes 8-11.
    pub block_size: u32,
    /// First block of the master region (version 4.x; ignored by 3.x).
    pub master_start: u32,
    /// Block count of the master region (version 4.x; ignored by 3.x).
    pub master_blocks: u32,
    /// Stored CRC-32C over the header with this field zeroed.
    pub checksum: u32,
    /// Human-readable version name recorded at export time.
    pub version_name: String,
    /// Character set the export was taken in.
    pub charset: Charset,
    /// Export date string recorded at export time.
    pub export_date: String,
}

impl FileHeader {
    /// Parse and validate the header from the first bytes of the file.
    ///
    /// Fails fast: any violation rejects the file with no partial metadata.
    pub fn parse(data: &[u8]) -> Result<Self, DumpError> {
        if data.len() < HDR_FIXED_SIZE {
            return Err(DumpError::Format(format!(
                "file too small to hold a header: {} bytes",
                data.len()
            )));
        }

        if data[HDR_MARKER_OFFSET..HDR_MARKER_OFFSET + 4] != HDR_MARKER {
            return Err(DumpError::Format("unsupported version".to_string()));
        }

        let version_code = BigEndian::read_u16(&data[HDR_VERSION..]);
        if version_code != VERSION_3_0 && version_code != VERSION_4_1 {
            return Err(DumpError::Format(format!(
                "unsupported version: code 0x{:04x}",
                version_code
            )));
        }

        let flags = BigEndian::read_u16(&data[HDR_FLAGS..]);
        if flags & FLAG_COMPRESSED != 0 {
            return Err(DumpError::Unsupported(
                "compressed export stream".to_string(),
            ));
        }
        if flags & FLAG_ENCRYPTED != 0 {
            return Err(DumpError::Unsupported(
                "encrypted export stream".to_string(),
            ));
        }
        if flags & FLAG_MULTI_PART != 0 {
            return Err(DumpError::Unsupported(
                "multi-part export file set".to_string(),
            ));
        }

        let block_size = BigEndian::read_u32(&data[HDR_BLOCK_SIZE..]);
        if !block_size.is_power_of_two()
            || !(BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX).contains(&block_size)
        {
            return Err(DumpError::Format(format!(
                "invalid block size: {}",
                block_size
            )));
        }

        let master_start = BigEndian::read_u32(&data[HDR_MASTER_START..]);
        let master_blocks = BigEndian::read_u32(&data[HDR_MASTER_BLOCKS..]);
        let checksum = BigEndian::read_u32(&data[HDR_CHECKSUM..]);

        let mut pos = HDR_STRINGS;
        let version_name = read_string(data, &mut pos)?;
        let charset_name = read_string(data, &mut pos)?;
        let export_date = read_string(data, &mut pos)?;

        if pos > block_size as usize {
            return Err(DumpError::Format(
                "header overflows the header block".to_string(),
            ));
        }

        let mut hashed = data[..pos].to_vec();
        hashed[HDR_CHECKSUM..HDR_CHECKSUM + 4].fill(0);
        let computed = crc32c::crc32c(&hashed);
        if computed != checksum {
            return Err(DumpError::Format(format!(
                "header checksum mismatch: stored 0x{:08x}, computed 0x{:08x}",
                checksum, computed
            )));
        }

        Ok(FileHeader {
            version_code,
            flags,
            block_size,
            master_start,
            master_blocks,
            checksum,
            version_name,
            charset: Charset::from_identifier(&charset_name),
            export_date,
        })
    }

    /// Whether the file carries a master table.
    pub fn master_present(&self) -> bool {
        self.flags & FLAG_MASTER_TABLE != 0
    }

    /// Location of the master region as (first block, block count).
    ///
    /// Version 3.x files keep the master table at a fixed block right after
    /// the header; its extent is bounded by the region's own header. Later
    /// versions record the location explicitly.
    pub fn master_location(&self, file_blocks: u64) -> (u64, u64) {
        match self.version_code {
            VERSION_3_0 => (
                V3_MASTER_BLOCK,
                file_blocks.saturating_sub(V3_MASTER_BLOCK),
            ),
            _ => (self.master_start as u64, self.master_blocks as u64),
        }
    }
}

/// Read one u16-length-prefixed string at `*pos`, advancing it.
fn read_string(data: &[u8], pos: &mut usize) -> Result<String, DumpError> {
    if *pos + 2 > data.len() {
        return Err(DumpError::Format(
            "header string section truncated".to_string(),
        ));
    }
    let len = BigEndian::read_u16(&data[*pos..]) as usize;
    *pos += 2;
    if *pos + len > data.len() {
        return Err(DumpError::Format(
            "header string section truncated".to_string(),
        ));
    }
    let s = String::from_utf8_lossy(&data[*pos..*pos + len]).into_owned();
    *pos += len;
    Ok(s)
}
