//! Master-table (directory) decoding.
//!
//! The master table is the export's self-description: a row set, stored with
//! the same region/row mechanism as ordinary table data, in which each row
//! records one exported object (name, kind, declarative definition text, a
//! schema document for tables, and the block range of the object's data).
//!
//! Decoding is tolerant per entry: a malformed or unsupported row produces a
//! [`CatalogRecord::Skipped`] with its reason instead of aborting the whole
//! catalog, so one corrupt record never hides the rest of the export.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dump::blocks::BlockReader;
use crate::dump::column::{ColumnDescriptor, SqlType, TableDescriptor};
use crate::dump::constants::MASTER_COLUMN_COUNT;
use crate::dump::header::FileHeader;
use crate::dump::row::{Row, RowIter, Value};
use crate::DumpError;

/// Kind of an exported object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    /// A table; the only kind whose row data this decoder reads.
    Table,
    Index,
    Constraint,
    Sequence,
    /// Any other kind, retained with its recorded name.
    Other(String),
}

impl ObjectKind {
    /// Map the kind string recorded in the master table.
    pub fn from_name(name: &str) -> Self {
        match name {
            "TABLE" => ObjectKind::Table,
            "INDEX" => ObjectKind::Index,
            "CONSTRAINT" => ObjectKind::Constraint,
            "SEQUENCE" => ObjectKind::Sequence,
            other => ObjectKind::Other(other.to_string()),
        }
    }
}

/// One decoded object record from the master table.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    /// Object name.
    pub name: String,
    /// Object kind.
    pub kind: ObjectKind,
    /// Free-form declarative definition text.
    pub definition: String,
    /// Ordered column schema; empty for non-table kinds.
    pub columns: Vec<ColumnDescriptor>,
    /// Data region as (first block, block count); `None` when the object
    /// carries no row data.
    pub data_range: Option<(u64, u64)>,
}

impl DirectoryEntry {
    /// Derive the table view of this entry, if it is a table.
    pub fn as_table(&self) -> Option<TableDescriptor> {
        match (&self.kind, self.data_range) {
            (ObjectKind::Table, Some((start, blocks))) => Some(TableDescriptor {
                name: self.name.clone(),
                columns: self.columns.clone(),
                data_start: start,
                data_blocks: blocks,
            }),
            _ => None,
        }
    }
}

/// A master-table row that could not be decoded, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    /// Zero-based position of the row in the master table.
    pub index: usize,
    /// Why the entry was skipped.
    pub reason: String,
}

/// Tagged per-row outcome of the directory decode.
#[derive(Debug, Clone, Serialize)]
pub enum CatalogRecord {
    /// Successfully decoded object record.
    Decoded(DirectoryEntry),
    /// Recorded skip; the rest of the catalog is unaffected.
    Skipped(SkippedEntry),
}

// ---------------------------------------------------------------------------
// Schema document deserialization
// ---------------------------------------------------------------------------

/// Column layout document carried by table-kind master rows.
#[derive(Debug, Deserialize)]
struct SchemaDoc {
    #[serde(default)]
    columns: Vec<SchemaColumn>,
}

#[derive(Debug, Deserialize)]
struct SchemaColumn {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    length: u32,
    #[serde(default)]
    precision: u8,
    #[serde(default)]
    scale: i8,
    #[serde(default = "default_nullable")]
    nullable: bool,
    position: u32,
}

fn default_nullable() -> bool {
    true
}

impl SchemaColumn {
    fn into_descriptor(self) -> Result<ColumnDescriptor, String> {
        let sql_type = match self.type_name.as_str() {
            "NUMBER" => SqlType::Number {
                precision: self.precision,
                scale: self.scale,
            },
            "VARCHAR2" => SqlType::Varchar2 {
                length: self.length,
            },
            "CHAR" => SqlType::Char {
                length: self.length,
            },
            "DATE" => SqlType::Date,
            "RAW" => SqlType::Raw {
                length: self.length,
            },
            "BINARY_FLOAT" => SqlType::BinaryFloat,
            "BINARY_DOUBLE" => SqlType::BinaryDouble,
            other => return Err(format!("column {}: unsupported type {}", self.name, other)),
        };
        Ok(ColumnDescriptor {
            name: self.name,
            sql_type,
            nullable: self.nullable,
            position: self.position,
        })
    }
}

/// Parse and validate a schema document into an ordered column list.
fn columns_from_doc(doc: &str) -> Result<Vec<ColumnDescriptor>, String> {
    let parsed: SchemaDoc =
        serde_json::from_str(doc).map_err(|e| format!("malformed schema document: {}", e))?;
    if parsed.columns.is_empty() {
        return Err("schema document has no columns".to_string());
    }

    let mut columns = parsed
        .columns
        .into_iter()
        .map(SchemaColumn::into_descriptor)
        .collect::<Result<Vec<_>, _>>()?;
    columns.sort_by_key(|c| c.position);

    for (i, col) in columns.iter().enumerate() {
        if col.position != i as u32 {
            return Err(format!(
                "column positions not contiguous: {} at slot {}",
                col.position, i
            ));
        }
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// The implicit master schema
// ---------------------------------------------------------------------------

/// Column layout of the master table itself (format-defined, not stored).
pub fn master_columns() -> Vec<ColumnDescriptor> {
    let col = |name: &str, sql_type, nullable, position| ColumnDescriptor {
        name: name.to_string(),
        sql_type,
        nullable,
        position,
    };
    vec![
        col("NAME", SqlType::Varchar2 { length: 128 }, false, 0),
        col("KIND", SqlType::Varchar2 { length: 30 }, false, 1),
        col("DEFINITION", SqlType::Varchar2 { length: 4000 }, true, 2),
        col("SCHEMA_DOC", SqlType::Varchar2 { length: 4000 }, true, 3),
        col(
            "DATA_START",
            SqlType::Number {
                precision: 10,
                scale: 0,
            },
            true,
            4,
        ),
        col(
            "DATA_BLOCKS",
            SqlType::Number {
                precision: 10,
                scale: 0,
            },
            true,
            5,
        ),
    ]
}

// ---------------------------------------------------------------------------
// Directory decode
// ---------------------------------------------------------------------------

/// Decode the master table into tagged catalog records.
///
/// Fails only when the directory region itself cannot be located or does not
/// start with a valid region header; row-level failures are recorded as
/// `Skipped` entries. A row-boundary desynchronization mid-master keeps the
/// decoded prefix and records one terminal skip for the remainder.
pub fn decode_directory(
    reader: &BlockReader,
    header: &FileHeader,
) -> Result<Vec<CatalogRecord>, DumpError> {
    let (start, blocks) = header.master_location(reader.block_count());
    if blocks == 0 {
        return Err(DumpError::Format(
            "directory region unlocatable: empty master block range".to_string(),
        ));
    }
    let region = reader.region(start, blocks).map_err(|e| {
        DumpError::Format(format!("directory region unlocatable: {}", e))
    })?;

    let columns = master_columns();
    let iter = RowIter::decode_region(region, &columns, &header.charset)
        .map_err(|e| DumpError::Format(format!("directory region unlocatable: {}", e)))?;

    let mut records = Vec::new();
    let mut seen_tables: HashSet<String> = HashSet::new();

    for (index, item) in iter.enumerate() {
        match item {
            Ok(row) => match entry_from_row(&row, reader, &mut seen_tables) {
                Ok(entry) => records.push(CatalogRecord::Decoded(entry)),
                Err(reason) => {
                    tracing::warn!("skipping directory entry {}: {}", index, reason);
                    records.push(CatalogRecord::Skipped(SkippedEntry { index, reason }));
                }
            },
            Err(DumpError::TypeDecoding(reason)) => {
                tracing::warn!("skipping directory entry {}: {}", index, reason);
                records.push(CatalogRecord::Skipped(SkippedEntry { index, reason }));
            }
            Err(e) => {
                // Boundary desync: the remainder of the master table is
                // unreachable. Keep the decoded prefix and record the loss.
                let reason = format!("master table halted: {}", e);
                tracing::warn!("{}", reason);
                records.push(CatalogRecord::Skipped(SkippedEntry { index, reason }));
                break;
            }
        }
    }

    Ok(records)
}

/// Build a directory entry from one decoded master row.
fn entry_from_row(
    row: &Row,
    reader: &BlockReader,
    seen_tables: &mut HashSet<String>,
) -> Result<DirectoryEntry, String> {
    debug_assert_eq!(row.values().len(), MASTER_COLUMN_COUNT);

    let name = require_str(row, 0, "NAME")?;
    let kind_name = require_str(row, 1, "KIND")?;
    let definition = optional_str(row, 2, "DEFINITION")?.unwrap_or_default();
    let schema_doc = optional_str(row, 3, "SCHEMA_DOC")?;
    let data_start = optional_u64(row, 4, "DATA_START")?;
    let data_blocks = optional_u64(row, 5, "DATA_BLOCKS")?;

    let kind = ObjectKind::from_name(&kind_name);

    let (columns, data_range) = if kind == ObjectKind::Table {
        let doc = schema_doc.ok_or_else(|| {
            format!("table {} has no schema document", name)
        })?;
        let columns = columns_from_doc(&doc).map_err(|e| format!("table {}: {}", name, e))?;

        let start = data_start.ok_or_else(|| format!("table {} has no data range", name))?;
        let blocks = data_blocks.ok_or_else(|| format!("table {} has no data range", name))?;
        if blocks == 0 || start.saturating_add(blocks) > reader.block_count() {
            return Err(format!(
                "table {}: data blocks {}..{} out of file bounds ({} blocks)",
                name,
                start,
                start + blocks,
                reader.block_count()
            ));
        }

        if !seen_tables.insert(name.clone()) {
            return Err(format!("duplicate table name {}", name));
        }

        (columns, Some((start, blocks)))
    } else {
        (Vec::new(), None)
    };

    Ok(DirectoryEntry {
        name,
        kind,
        definition,
        columns,
        data_range,
    })
}

fn require_str(row: &Row, pos: usize, field: &str) -> Result<String, String> {
    match row.get(pos) {
        Some(Value::Str(s)) => Ok(s.clone()),
        other => Err(format!("{} is not text: {:?}", field, other)),
    }
}

fn optional_str(row: &Row, pos: usize, field: &str) -> Result<Option<String>, String> {
    match row.get(pos) {
        Some(Value::Str(s)) => Ok(Some(s.clone())),
        Some(Value::Null) => Ok(None),
        other => Err(format!("{} is not text: {:?}", field, other)),
    }
}

fn optional_u64(row: &Row, pos: usize, field: &str) -> Result<Option<u64>, String> {
    match row.get(pos) {
        Some(Value::Int(v)) if *v >= 0 => Ok(Some(*v as u64)),
        Some(Value::Null) => Ok(None),
        other => Err(format!("{} is not a block number: {:?}", field, other)),
    }
}
