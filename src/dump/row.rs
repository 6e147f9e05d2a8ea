//! Row region decoding.
//!
//! A data region is a contiguous block range holding a region header (marker,
//! row count, payload length) followed by packed rows. Each row carries a
//! u16 length prefix, a per-row null bitmap, and one encoded value per
//! non-null column in ordinal order. The length prefix is the row boundary:
//! a malformed row body fails alone with [`DumpError::TypeDecoding`], while a
//! corrupt length prefix desynchronizes the stream and halts the region with
//! [`DumpError::Format`] — rows already yielded stay valid.
//!
//! Rows are materialized one at a time; abandoning the iterator early drops
//! nothing but borrowed slices.

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::dump::charset::Charset;
use crate::dump::column::{ColumnDescriptor, SqlType};
use crate::dump::constants::*;
use crate::dump::number::{self, DecodedNumber};
use crate::DumpError;

/// Decoded value of one column slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Integral numeric within `i64` range.
    Int(i64),
    /// Exact decimal rendering of a non-integral or oversized numeric.
    Number(String),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// Text value (VARCHAR2, CHAR) or formatted date.
    Str(String),
    /// Hex-encoded raw bytes.
    Hex(String),
}

impl Value {
    /// The value as an `i64`, if it is an integral numeric.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as text, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// One decoded row: an ordered value per column, same order as the schema.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// The decoded values in column ordinal order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the row, yielding its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value at the given column position.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }
}

/// Lazy, forward-only row decoding over one region's payload.
///
/// Yields `Result<Row, DumpError>`; a `TypeDecoding` item leaves the
/// iterator usable, a `Format` item (boundary desync) fuses it.
pub struct RowIter<'a> {
    columns: &'a [ColumnDescriptor],
    charset: &'a Charset,
    data: &'a [u8],
    rows_left: u32,
    done: bool,
}

impl<'a> RowIter<'a> {
    /// Validate a region slice and position the iterator at its first row.
    pub fn decode_region(
        region: &'a [u8],
        columns: &'a [ColumnDescriptor],
        charset: &'a Charset,
    ) -> Result<Self, DumpError> {
        if region.len() < REGION_HEADER_SIZE {
            return Err(DumpError::Format(format!(
                "data region too small: {} bytes",
                region.len()
            )));
        }
        let marker = BigEndian::read_u16(&region[REGION_MARKER_OFFSET..]);
        if marker != REGION_MARKER {
            return Err(DumpError::Format(format!(
                "data region marker mismatch: 0x{:04x}",
                marker
            )));
        }
        let rows_left = BigEndian::read_u32(&region[REGION_ROW_COUNT..]);
        let payload_len = BigEndian::read_u32(&region[REGION_PAYLOAD_LEN..]) as usize;
        if REGION_HEADER_SIZE + payload_len > region.len() {
            return Err(DumpError::Format(format!(
                "declared payload of {} bytes overruns the region",
                payload_len
            )));
        }

        Ok(RowIter {
            columns,
            charset,
            data: &region[REGION_HEADER_SIZE..REGION_HEADER_SIZE + payload_len],
            rows_left,
            done: false,
        })
    }

    /// Rows not yet yielded.
    pub fn rows_remaining(&self) -> u32 {
        self.rows_left
    }
}

impl Iterator for RowIter<'_> {
    type Item = Result<Row, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.rows_left == 0 {
            return None;
        }

        if self.data.len() < ROW_LEN_PREFIX_SIZE {
            self.done = true;
            return Some(Err(DumpError::Format(
                "row boundary desynchronized: payload exhausted before declared row count"
                    .to_string(),
            )));
        }
        let len = BigEndian::read_u16(self.data) as usize;
        if len == 0 || ROW_LEN_PREFIX_SIZE + len > self.data.len() {
            self.done = true;
            return Some(Err(DumpError::Format(format!(
                "row boundary desynchronized: declared row length {} with {} bytes left",
                len,
                self.data.len() - ROW_LEN_PREFIX_SIZE
            ))));
        }

        let payload = &self.data[ROW_LEN_PREFIX_SIZE..ROW_LEN_PREFIX_SIZE + len];
        self.data = &self.data[ROW_LEN_PREFIX_SIZE + len..];
        self.rows_left -= 1;

        Some(decode_row(payload, self.columns, self.charset))
    }
}

/// Decode one row payload against its column schema.
fn decode_row(
    payload: &[u8],
    columns: &[ColumnDescriptor],
    charset: &Charset,
) -> Result<Row, DumpError> {
    let bitmap_len = columns.len().div_ceil(8);
    if payload.len() < bitmap_len {
        return Err(DumpError::TypeDecoding(format!(
            "row of {} bytes cannot hold a {}-byte null bitmap",
            payload.len(),
            bitmap_len
        )));
    }
    let bitmap = &payload[..bitmap_len];
    let mut pos = bitmap_len;

    let mut values = Vec::with_capacity(columns.len());
    for (i, col) in columns.iter().enumerate() {
        let is_null = bitmap[i / 8] & (1 << (i % 8)) != 0;
        if is_null {
            if !col.nullable {
                return Err(DumpError::TypeDecoding(format!(
                    "NOT NULL column {} flagged null",
                    col.name
                )));
            }
            values.push(Value::Null);
            continue;
        }
        values.push(decode_value(payload, &mut pos, col, charset)?);
    }

    if pos != payload.len() {
        return Err(DumpError::TypeDecoding(format!(
            "{} trailing bytes after last column",
            payload.len() - pos
        )));
    }

    Ok(Row { values })
}

/// Decode one non-null value slot at `*pos`, advancing it.
fn decode_value(
    payload: &[u8],
    pos: &mut usize,
    col: &ColumnDescriptor,
    charset: &Charset,
) -> Result<Value, DumpError> {
    match col.sql_type {
        SqlType::Number { .. } => {
            let bytes = take(payload, pos, 1, &col.name)?;
            let n = bytes[0] as usize;
            if n == 0 || n > NUMBER_MAX_BYTES {
                return Err(DumpError::TypeDecoding(format!(
                    "column {}: numeric length byte {} out of range",
                    col.name, n
                )));
            }
            let digits = take(payload, pos, n, &col.name)?;
            match number::decode(digits)? {
                DecodedNumber::Int(v) => Ok(Value::Int(v)),
                DecodedNumber::Decimal(s) => Ok(Value::Number(s)),
            }
        }
        SqlType::Date => {
            let bytes = take(payload, pos, DATE_ENCODED_LEN, &col.name)?;
            decode_date(bytes, &col.name)
        }
        SqlType::Varchar2 { .. } | SqlType::Char { .. } => {
            let bytes = take_prefixed(payload, pos, &col.name)?;
            Ok(Value::Str(charset.decode_text(bytes)))
        }
        SqlType::Raw { .. } => {
            let bytes = take_prefixed(payload, pos, &col.name)?;
            Ok(Value::Hex(hex_string(bytes)))
        }
        SqlType::BinaryFloat => {
            let bytes = take(payload, pos, BINARY_FLOAT_LEN, &col.name)?;
            Ok(Value::Float(f32::from_bits(BigEndian::read_u32(bytes))))
        }
        SqlType::BinaryDouble => {
            let bytes = take(payload, pos, BINARY_DOUBLE_LEN, &col.name)?;
            Ok(Value::Double(f64::from_bits(BigEndian::read_u64(bytes))))
        }
    }
}

/// Take exactly `n` bytes from the row payload.
fn take<'a>(
    payload: &'a [u8],
    pos: &mut usize,
    n: usize,
    col_name: &str,
) -> Result<&'a [u8], DumpError> {
    if *pos + n > payload.len() {
        return Err(DumpError::TypeDecoding(format!(
            "column {}: value needs {} bytes, {} left in row",
            col_name,
            n,
            payload.len() - *pos
        )));
    }
    let slice = &payload[*pos..*pos + n];
    *pos += n;
    Ok(slice)
}

/// Take a u16-length-prefixed byte run from the row payload.
fn take_prefixed<'a>(
    payload: &'a [u8],
    pos: &mut usize,
    col_name: &str,
) -> Result<&'a [u8], DumpError> {
    let prefix = take(payload, pos, 2, col_name)?;
    let len = BigEndian::read_u16(prefix) as usize;
    take(payload, pos, len, col_name)
}

/// Decode the fixed 7-byte packed date: century+100, year-of-century+100,
/// month, day, hour+1, minute+1, second+1.
fn decode_date(bytes: &[u8], col_name: &str) -> Result<Value, DumpError> {
    let century = bytes[0] as i32 - 100;
    let year_in_century = bytes[1] as i32 - 100;
    let month = bytes[2];
    let day = bytes[3];
    let (hour, minute, second) = (
        bytes[4].wrapping_sub(1),
        bytes[5].wrapping_sub(1),
        bytes[6].wrapping_sub(1),
    );

    let valid = (0..=99).contains(&century)
        && (0..=99).contains(&year_in_century)
        && (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && hour <= 23
        && minute <= 59
        && second <= 59;
    if !valid {
        return Err(DumpError::TypeDecoding(format!(
            "column {}: malformed date bytes {}",
            col_name,
            hex_string(bytes)
        )));
    }

    Ok(Value::Str(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        century * 100 + year_in_century,
        month,
        day,
        hour,
        minute,
        second
    )))
}

/// Format bytes as a compact lowercase hex string (e.g. `"4a2f00ff"`).
fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}
