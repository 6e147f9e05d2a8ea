//! Database export file decoding toolkit.
//!
//! The `oradump-utils` crate (library name `oradump`) provides Rust types and
//! functions for decoding block-structured bulk-export files: the versioned
//! file header, the embedded master table describing every exported object,
//! and the typed row data of each exported table. No server process is
//! involved; everything is decoded directly from the bytes of the file.
//!
//! # Library API
//!
//! Add `oradump` as a dependency to use the decoder directly:
//!
//! ```toml
//! [dependencies]
//! oradump = { package = "oradump-utils", version = "1" }
//! ```
//!
//! ## Quick example
//!
//! ```no_run
//! use oradump::dump::dumpfile::DumpFile;
//!
//! // Open an export file (header and catalog are decoded eagerly)
//! let dump = DumpFile::open("export.dmp").unwrap();
//! println!("Version:  {}", dump.version_name());
//! println!("Exported: {}", dump.export_date());
//! println!("Charset:  {}", dump.character_set());
//!
//! // Enumerate exported tables and stream their rows
//! for table in dump.tables() {
//!     println!("{} ({} columns)", table.name, table.columns.len());
//!     for row in dump.rows(table).unwrap() {
//!         let row = row.unwrap();
//!         println!("  {:?}", row.values());
//!     }
//! }
//! ```
//!
//! ## Key entry points
//!
//! | Type / Function | Purpose |
//! |-----------------|---------|
//! | [`DumpFile`](dump::dumpfile::DumpFile) | Open export files, metadata accessors, table enumeration, row streaming |
//! | [`FileHeader`](dump::header::FileHeader) | Decoded header block: version, timestamp, charset, block size |
//! | [`TableCatalog`](dump::catalog::TableCatalog) | Queryable view of the decoded master table |
//! | [`TableDescriptor`](dump::column::TableDescriptor) | One exported table: name, column schema, data locator |
//! | [`RowIter`](dump::row::RowIter) | Lazy, forward-only row decoding for one table |
//! | [`Value`](dump::row::Value) | One decoded column value (null, number, string, date, raw) |
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`dump::blocks`] | Byte source and positioned fixed-size block reads |
//! | [`dump::header`] | Header block decoding and validation |
//! | [`dump::charset`] | Character-set identifiers and text decoding |
//! | [`dump::number`] | Packed-decimal numeric value codec |
//! | [`dump::column`] | SQL types, column and table descriptors |
//! | [`dump::row`] | Row region decoding and typed values |
//! | [`dump::master`] | Master-table (directory) decoding |
//! | [`dump::catalog`] | Catalog queries over decoded directory entries |
//! | [`dump::dumpfile`] | Facade composing the above |
//! | [`dump::constants`] | On-disk layout constants |

pub mod dump;

use thiserror::Error;

/// Errors returned by `oradump` operations.
#[derive(Error, Debug)]
pub enum DumpError {
    /// An I/O error occurred (file open, stat, or map failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// A file-wide format violation: unrecognized marker or version,
    /// invalid block size, unlocatable directory region, or a row-boundary
    /// desynchronization that halts the remainder of one table.
    #[error("format error: {0}")]
    Format(String),

    /// A required block lies beyond the bytes actually present in the file.
    #[error("truncated file: {0}")]
    Truncated(String),

    /// The file declares compression, encryption, or a multi-part layout.
    /// These are reported distinctly and never misdecoded.
    #[error("unsupported feature: {0}")]
    Unsupported(String),

    /// The requested table name is absent from the decoded catalog.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A row's encoded shape disagrees with its column schema. Isolated to
    /// that row unless the row boundary itself is corrupt.
    #[error("type decoding error: {0}")]
    TypeDecoding(String),
}
