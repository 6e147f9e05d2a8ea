//! The opened export file.
//!
//! [`DumpFile`] composes the block reader, the validated header, and the
//! decoded catalog into the one handle callers hold: metadata accessors,
//! table enumeration, and per-table row streaming. Everything is decoded
//! once at open (header, directory) or lazily per call (rows); nothing
//! mutates the underlying file.
//!
//! The handle is `Send + Sync`: all reads are positioned `&self` reads, so
//! independent tables may be decoded from separate threads without locking.

use crate::dump::blocks::{BlockReader, ByteSource};
use crate::dump::catalog::TableCatalog;
use crate::dump::column::TableDescriptor;
use crate::dump::header::FileHeader;
use crate::dump::master::decode_directory;
use crate::dump::row::RowIter;
use crate::DumpError;

/// An open, immutable export file.
pub struct DumpFile {
    reader: BlockReader,
    header: FileHeader,
    catalog: TableCatalog,
}

impl DumpFile {
    /// Open an export file from disk (memory-mapped).
    ///
    /// The header is validated and the directory decoded before this
    /// returns; a header-level violation rejects the whole file with no
    /// partial metadata.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, DumpError> {
        Self::init(ByteSource::open(path)?)
    }

    /// Open an export file held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, DumpError> {
        Self::init(ByteSource::from_bytes(data))
    }

    /// Shared initialization: validate the header, then decode and cache
    /// the directory.
    fn init(source: ByteSource) -> Result<Self, DumpError> {
        let header = FileHeader::parse(source.as_slice())?;
        let reader = BlockReader::new(source, header.block_size);

        let catalog = if header.master_present() {
            TableCatalog::new(decode_directory(&reader, &header)?)
        } else {
            TableCatalog::empty()
        };

        tracing::debug!(
            "opened export file: version {}, block size {}, {} tables",
            header.version_name,
            header.block_size,
            catalog.table_count()
        );

        Ok(DumpFile {
            reader,
            header,
            catalog,
        })
    }

    /// The validated header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Human-readable version name recorded at export time.
    pub fn version_name(&self) -> &str {
        &self.header.version_name
    }

    /// Export date string recorded at export time.
    pub fn export_date(&self) -> &str {
        &self.header.export_date
    }

    /// Character-set identifier recorded in the header.
    pub fn character_set(&self) -> &str {
        self.header.charset.identifier()
    }

    /// Block size in bytes, fixed for the whole file.
    pub fn block_size(&self) -> u32 {
        self.header.block_size
    }

    /// Whether the file carries a master table.
    pub fn has_master_table(&self) -> bool {
        self.header.master_present()
    }

    /// File size in bytes.
    pub fn file_size(&self) -> u64 {
        self.reader.file_size()
    }

    /// Number of whole blocks in the file.
    pub fn block_count(&self) -> u64 {
        self.reader.block_count()
    }

    /// The decoded catalog.
    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// Enumerate the exported tables.
    ///
    /// Restartable: each call re-derives the sequence from the cached
    /// directory without re-reading the file.
    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.catalog.table_descriptors()
    }

    /// Look up a table by exact, case-sensitive name.
    pub fn find_table(&self, name: &str) -> Result<&TableDescriptor, DumpError> {
        self.catalog.find_table(name)
    }

    /// Stream the rows of one table.
    ///
    /// Rows are decoded one at a time while iterating; the iterator may be
    /// abandoned at any point. The descriptor must come from this file's
    /// catalog (its block range is validated against this file either way).
    pub fn rows<'a>(&'a self, table: &'a TableDescriptor) -> Result<RowIter<'a>, DumpError> {
        let region = self.reader.region(table.data_start, table.data_blocks)?;
        RowIter::decode_region(region, &table.columns, &self.header.charset)
    }

    /// Stream the rows of the table with the given name.
    pub fn rows_by_name(&self, name: &str) -> Result<RowIter<'_>, DumpError> {
        self.rows(self.find_table(name)?)
    }
}
