//! SQL types, column descriptors, and table descriptors.
//!
//! A [`ColumnDescriptor`] is the decoded, immutable description of one
//! column as recorded in the master table; its ordinal position matches the
//! physical slot order used by the row decoder. A [`TableDescriptor`] is the
//! derived view a caller needs to stream one table: name, ordered columns,
//! and the block range holding the table's row data.

use serde::Serialize;

/// Declared SQL type of a column, with the storage parameters that drive
/// value decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SqlType {
    /// Packed-decimal numeric with declared precision and scale.
    Number { precision: u8, scale: i8 },
    /// Variable-length text, length-prefixed on disk.
    Varchar2 { length: u32 },
    /// Fixed-declared-length text; stored length-prefixed like `Varchar2`.
    Char { length: u32 },
    /// Fixed 7-byte packed date-time.
    Date,
    /// Variable-length binary, exposed hex-encoded.
    Raw { length: u32 },
    /// 4-byte IEEE 754 single.
    BinaryFloat,
    /// 8-byte IEEE 754 double.
    BinaryDouble,
}

impl SqlType {
    /// The SQL name of this type, without length/precision decoration.
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Number { .. } => "NUMBER",
            SqlType::Varchar2 { .. } => "VARCHAR2",
            SqlType::Char { .. } => "CHAR",
            SqlType::Date => "DATE",
            SqlType::Raw { .. } => "RAW",
            SqlType::BinaryFloat => "BINARY_FLOAT",
            SqlType::BinaryDouble => "BINARY_DOUBLE",
        }
    }
}

/// One column of an exported table, as recorded in the master table.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Declared SQL type with storage parameters.
    pub sql_type: SqlType,
    /// Whether the column allows NULL.
    pub nullable: bool,
    /// Physical slot position, contiguous from zero.
    pub position: u32,
}

/// One exported table: name, ordered column schema, and row-data locator.
///
/// Derived from a table-kind directory entry; holds no row data itself.
#[derive(Debug, Clone, Serialize)]
pub struct TableDescriptor {
    /// Table name, unique within the file.
    pub name: String,
    /// Columns in physical slot order.
    pub columns: Vec<ColumnDescriptor>,
    /// First block of the table's data region.
    pub data_start: u64,
    /// Number of blocks in the data region.
    pub data_blocks: u64,
}
