//! Catalog queries over the decoded directory.
//!
//! [`TableCatalog`] caches the outcome of the one-time directory decode and
//! answers every later question from memory: enumeration re-derives its
//! sequences from the cached records (restartable, never re-reads the file),
//! and name lookup is exact and case-sensitive, matching how the export
//! format stores object names.

use crate::dump::column::TableDescriptor;
use crate::dump::master::{CatalogRecord, DirectoryEntry, SkippedEntry};
use crate::DumpError;

/// Queryable, cached view of the decoded master table.
pub struct TableCatalog {
    records: Vec<CatalogRecord>,
    tables: Vec<TableDescriptor>,
}

impl TableCatalog {
    /// Build the catalog from decoded directory records, deriving the table
    /// views once.
    pub(crate) fn new(records: Vec<CatalogRecord>) -> Self {
        let tables = records
            .iter()
            .filter_map(|r| match r {
                CatalogRecord::Decoded(entry) => entry.as_table(),
                CatalogRecord::Skipped(_) => None,
            })
            .collect();
        TableCatalog { records, tables }
    }

    /// A catalog with no entries (file without a master table).
    pub(crate) fn empty() -> Self {
        TableCatalog {
            records: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// All per-row outcomes of the directory decode, in master-table order.
    pub fn records(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.iter()
    }

    /// Successfully decoded object entries of every kind.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.records.iter().filter_map(|r| match r {
            CatalogRecord::Decoded(entry) => Some(entry),
            CatalogRecord::Skipped(_) => None,
        })
    }

    /// Directory rows that failed to decode, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedEntry> {
        self.records.iter().filter_map(|r| match r {
            CatalogRecord::Skipped(s) => Some(s),
            CatalogRecord::Decoded(_) => None,
        })
    }

    /// Table-kind entries as row-decodable descriptors.
    ///
    /// Restartable: each call derives a fresh pass over the cached
    /// directory.
    pub fn table_descriptors(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter()
    }

    /// Number of table-kind entries.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Look up a table by exact, case-sensitive name.
    pub fn find_table(&self, name: &str) -> Result<&TableDescriptor, DumpError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DumpError::UnknownTable(name.to_string()))
    }
}
