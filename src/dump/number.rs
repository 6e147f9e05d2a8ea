//! Packed-decimal numeric value codec.
//!
//! Numeric column values are stored in a variable-length packed-decimal
//! encoding: an exponent byte carrying the sign and a base-100 exponent
//! (biased by 65), followed by base-100 digit bytes. Positive values store
//! each digit as `d + 1`; negative values complement the exponent byte,
//! store digits as `101 - d`, and append a terminator byte when space
//! allows. A single `0x80` byte encodes zero.
//!
//! The decoder is strict: out-of-range exponent or digit bytes fail with
//! [`DumpError::TypeDecoding`] rather than producing a wrong value.

use crate::dump::constants::{NUMBER_MAX_BYTES, NUMBER_NEG_TERMINATOR, NUMBER_ZERO};
use crate::DumpError;

/// A decoded numeric value.
///
/// Integral values that fit a machine word decode to `Int`; everything else
/// (fractional values, or magnitudes past `i64`) decodes to its exact
/// decimal string representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedNumber {
    /// Integral value within `i64` range.
    Int(i64),
    /// Exact decimal rendering, e.g. `"1234.56"` or `"-0.05"`.
    Decimal(String),
}

/// Decode a packed-decimal value from its encoded bytes.
///
/// `bytes` is the value slot without its one-byte length prefix.
pub fn decode(bytes: &[u8]) -> Result<DecodedNumber, DumpError> {
    if bytes.is_empty() {
        return Err(DumpError::TypeDecoding("empty numeric value".to_string()));
    }
    if bytes.len() > NUMBER_MAX_BYTES {
        return Err(DumpError::TypeDecoding(format!(
            "numeric value of {} bytes exceeds maximum {}",
            bytes.len(),
            NUMBER_MAX_BYTES
        )));
    }
    if bytes == [NUMBER_ZERO] {
        return Ok(DecodedNumber::Int(0));
    }

    let first = bytes[0];
    let negative = first & 0x80 == 0;

    // Exponent of the most significant base-100 digit.
    let base = if negative {
        62 - first as i32
    } else {
        first as i32 - 193
    };

    let mut digit_bytes = &bytes[1..];
    if negative && digit_bytes.last() == Some(&NUMBER_NEG_TERMINATOR) {
        digit_bytes = &digit_bytes[..digit_bytes.len() - 1];
    }
    if digit_bytes.is_empty() {
        return Err(DumpError::TypeDecoding(
            "numeric value has no digits".to_string(),
        ));
    }

    let mut digits = Vec::with_capacity(digit_bytes.len());
    for &b in digit_bytes {
        let d = if negative {
            if !(2..=101).contains(&b) {
                return Err(DumpError::TypeDecoding(format!(
                    "digit byte 0x{:02x} out of range for negative value",
                    b
                )));
            }
            101 - b
        } else {
            if !(1..=100).contains(&b) {
                return Err(DumpError::TypeDecoding(format!(
                    "digit byte 0x{:02x} out of range for positive value",
                    b
                )));
            }
            b - 1
        };
        digits.push(d);
    }

    Ok(render(negative, base, &digits))
}

/// Assemble the decimal representation of `±Σ digits[i] × 100^(base − i)`.
fn render(negative: bool, base: i32, digits: &[u8]) -> DecodedNumber {
    // Pairs past `base` fall to the right of the decimal point.
    let frac_pairs = ((digits.len() as i32 - 1) - base).max(0) as usize;
    let int_pairs = digits.len().saturating_sub(frac_pairs);

    let mut int_part = String::new();
    if int_pairs == 0 {
        int_part.push('0');
    } else {
        for (i, &d) in digits[..int_pairs].iter().enumerate() {
            if i == 0 {
                int_part.push_str(&d.to_string());
            } else {
                int_part.push_str(&format!("{:02}", d));
            }
        }
        // Trailing zero pairs are stripped in the encoding; restore them.
        for _ in 0..(base + 1 - int_pairs as i32).max(0) {
            int_part.push_str("00");
        }
    }

    let mut frac_part = String::new();
    // Leading zero pairs between the point and the first stored digit.
    for _ in 0..(-(base + 1)).max(0) {
        frac_part.push_str("00");
    }
    for &d in &digits[int_pairs..] {
        frac_part.push_str(&format!("{:02}", d));
    }
    while frac_part.ends_with('0') {
        frac_part.pop();
    }

    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        if let Ok(v) = format!("{}{}", sign, int_part).parse::<i64>() {
            return DecodedNumber::Int(v);
        }
        return DecodedNumber::Decimal(format!("{}{}", sign, int_part));
    }
    DecodedNumber::Decimal(format!("{}{}.{}", sign, int_part, frac_part))
}
