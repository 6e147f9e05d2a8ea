//! Character-set identifiers and text decoding.
//!
//! The header records the character set the export was taken in; text-typed
//! column values are decoded against it. UTF-8 family identifiers decode
//! strictly with lossy fallback, single-byte Latin identifiers map bytes
//! through ISO-8859-1, and anything unrecognized falls back to lossy UTF-8
//! so one exotic charset never blocks the rest of a row.

use serde::Serialize;

/// A character set recognized by the decoder, from its header identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Charset {
    /// `AL32UTF8` — UTF-8, 4-byte max.
    Al32Utf8,
    /// `UTF8` — CESU-8 in the source system; decoded here as UTF-8.
    Utf8,
    /// `WE8ISO8859P1` — ISO-8859-1 (Latin-1), single byte.
    We8Iso8859P1,
    /// `US7ASCII` — 7-bit ASCII, single byte.
    Us7Ascii,
    /// Any other identifier; decoded as lossy UTF-8.
    Other(String),
}

impl Charset {
    /// Map a header character-set identifier to a decoder.
    pub fn from_identifier(name: &str) -> Self {
        match name {
            "AL32UTF8" => Charset::Al32Utf8,
            "UTF8" => Charset::Utf8,
            "WE8ISO8859P1" => Charset::We8Iso8859P1,
            "US7ASCII" => Charset::Us7Ascii,
            other => Charset::Other(other.to_string()),
        }
    }

    /// The identifier as recorded in the header.
    pub fn identifier(&self) -> &str {
        match self {
            Charset::Al32Utf8 => "AL32UTF8",
            Charset::Utf8 => "UTF8",
            Charset::We8Iso8859P1 => "WE8ISO8859P1",
            Charset::Us7Ascii => "US7ASCII",
            Charset::Other(name) => name,
        }
    }

    /// Decode raw column bytes to text.
    ///
    /// Never fails: undecodable sequences are replaced, matching how the
    /// rest of the decoder isolates bad data instead of aborting.
    pub fn decode_text(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Al32Utf8 | Charset::Utf8 | Charset::Us7Ascii | Charset::Other(_) => {
                String::from_utf8_lossy(bytes).into_owned()
            }
            Charset::We8Iso8859P1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}
