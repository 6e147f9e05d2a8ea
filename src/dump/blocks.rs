//! Export file block I/O.
//!
//! Provides [`ByteSource`], the read-only byte backing of an open export
//! file (memory-mapped file or owned buffer), and [`BlockReader`], which
//! carves it into fixed-size blocks. All reads are positioned `&self` reads
//! returning borrowed slices, so independent block ranges can be decoded
//! concurrently without a shared cursor.

use crate::DumpError;

/// Read-only byte backing for an open export file.
///
/// Files are memory-mapped rather than read through a seekable cursor: the
/// OS faults pages in on demand, and positioned reads need no coordination
/// between threads decoding different block ranges.
pub struct ByteSource {
    inner: SourceInner,
}

enum SourceInner {
    Mmap(memmap2::Mmap),
    Bytes(Vec<u8>),
}

impl ByteSource {
    /// Memory-map a file on disk.
    ///
    /// # Safety
    ///
    /// The underlying `mmap` call requires that the mapped file not be
    /// modified by another process while the mapping is active. Export files
    /// are write-once artifacts of a finished export, so this holds in
    /// practice.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, DumpError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| DumpError::Io(format!("Cannot open {}: {}", path.display(), e)))?;

        let mmap = unsafe {
            memmap2::Mmap::map(&file)
                .map_err(|e| DumpError::Io(format!("Cannot mmap {}: {}", path.display(), e)))?
        };

        Ok(ByteSource {
            inner: SourceInner::Mmap(mmap),
        })
    }

    /// Wrap an in-memory byte buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        ByteSource {
            inner: SourceInner::Bytes(data),
        }
    }

    /// The full byte contents.
    pub fn as_slice(&self) -> &[u8] {
        match &self.inner {
            SourceInner::Mmap(m) => m,
            SourceInner::Bytes(b) => b,
        }
    }

    /// Total length in bytes.
    pub fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    /// Returns true if the source holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Fixed-size block access over a [`ByteSource`].
///
/// Block size is fixed for the lifetime of the reader (it comes from the
/// validated file header). A block that lies wholly or partly beyond the
/// available bytes fails with [`DumpError::Truncated`].
pub struct BlockReader {
    source: ByteSource,
    block_size: u32,
    block_count: u64,
}

impl BlockReader {
    /// Create a reader with the given block size.
    ///
    /// Trailing bytes that do not fill a whole block are not addressable as
    /// a block and count as truncation when referenced.
    pub fn new(source: ByteSource, block_size: u32) -> Self {
        let block_count = source.len() / block_size as u64;
        BlockReader {
            source,
            block_size,
            block_count,
        }
    }

    /// Block size in bytes.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Number of whole blocks in the file.
    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// File size in bytes.
    pub fn file_size(&self) -> u64 {
        self.source.len()
    }

    /// Read a single block by index.
    ///
    /// Returns a borrowed slice of exactly `block_size` bytes.
    pub fn block(&self, index: u64) -> Result<&[u8], DumpError> {
        self.region(index, 1)
    }

    /// Read a contiguous range of blocks as one slice.
    pub fn region(&self, first_block: u64, block_count: u64) -> Result<&[u8], DumpError> {
        let end_block = first_block
            .checked_add(block_count)
            .ok_or_else(|| DumpError::Truncated("block range overflows".to_string()))?;
        if end_block > self.block_count {
            return Err(DumpError::Truncated(format!(
                "blocks {}..{} out of range (file has {} blocks)",
                first_block, end_block, self.block_count
            )));
        }
        let start = (first_block * self.block_size as u64) as usize;
        let len = (block_count * self.block_size as u64) as usize;
        Ok(&self.source.as_slice()[start..start + len])
    }
}
