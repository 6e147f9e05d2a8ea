/// Export file on-disk layout constants.
///
/// Offsets are relative to the start of the structure they belong to. All
/// multi-byte integers in the format are big-endian.
// Header block (block 0)
pub const HDR_MARKER: [u8; 4] = *b"EXPD";
pub const HDR_MARKER_OFFSET: usize = 0; // 4 bytes - format marker
pub const HDR_VERSION: usize = 4; // 2 bytes - format version code
pub const HDR_FLAGS: usize = 6; // 2 bytes - feature flags
pub const HDR_BLOCK_SIZE: usize = 8; // 4 bytes - block size in bytes
pub const HDR_MASTER_START: usize = 12; // 4 bytes - first block of master region
pub const HDR_MASTER_BLOCKS: usize = 16; // 4 bytes - block count of master region
pub const HDR_CHECKSUM: usize = 20; // 4 bytes - CRC-32C, field zeroed while hashing
pub const HDR_STRINGS: usize = 24; // length-prefixed version name, charset, date
pub const HDR_FIXED_SIZE: usize = 24;

// Recognized format version codes
pub const VERSION_3_0: u16 = 0x0300;
pub const VERSION_4_1: u16 = 0x0401;

// Header feature flag bits
pub const FLAG_MASTER_TABLE: u16 = 0x0001;
pub const FLAG_COMPRESSED: u16 = 0x0002;
pub const FLAG_ENCRYPTED: u16 = 0x0004;
pub const FLAG_MULTI_PART: u16 = 0x0008;

// Block size bounds (must also be a power of two)
pub const BLOCK_SIZE_MIN: u32 = 512;
pub const BLOCK_SIZE_MAX: u32 = 65536;

// Version 3.x files keep the master table at a fixed block
pub const V3_MASTER_BLOCK: u64 = 1;

// Data region header (at the start of a region's first block)
pub const REGION_MARKER: u16 = 0xDA7A;
pub const REGION_MARKER_OFFSET: usize = 0; // 2 bytes
pub const REGION_ROW_COUNT: usize = 2; // 4 bytes - number of rows in the region
pub const REGION_PAYLOAD_LEN: usize = 6; // 4 bytes - packed row bytes following
pub const REGION_HEADER_SIZE: usize = 10;

// Row encoding
pub const ROW_LEN_PREFIX_SIZE: usize = 2; // u16 payload length per row

// Packed-decimal numeric encoding
pub const NUMBER_MAX_BYTES: usize = 21;
pub const NUMBER_ZERO: u8 = 0x80;
pub const NUMBER_NEG_TERMINATOR: u8 = 102;

// Fixed-width value sizes
pub const DATE_ENCODED_LEN: usize = 7;
pub const BINARY_FLOAT_LEN: usize = 4;
pub const BINARY_DOUBLE_LEN: usize = 8;

// Master table column count (see master::master_columns)
pub const MASTER_COLUMN_COUNT: usize = 6;
