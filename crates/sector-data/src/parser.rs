//! Line-level parsing of raw sector sources into [`MonthlyRecord`]s.
//!
//! A line holds `date, open, close[, high[, low]]` separated by a single
//! delimiter character, e.g. `Jan-2020,100.50,102.25,104.00,99.10`.
//! Fields after `low` (volume, adjusted close) are ignored.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use sector_core::error::{Result, SectorError};
use sector_core::models::MonthlyRecord;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

const MIN_FIELDS: usize = 3;

/// Plain decimal text: optional minus, digits, optional fraction.
fn price_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("regex is valid"))
}

/// Converts one raw text line into a [`MonthlyRecord`].
#[derive(Debug, Clone, Copy)]
pub struct RecordParser {
    delimiter: char,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse a standalone line. Failures carry no source location.
    pub fn parse(&self, line: &str) -> Result<MonthlyRecord> {
        self.parse_fields(line)
            .map_err(|reason| malformed(None, None, line, reason))
    }

    /// Parse line `line_number` (1-based) of the source `key`.
    pub fn parse_at(&self, key: &str, line_number: usize, line: &str) -> Result<MonthlyRecord> {
        self.parse_fields(line)
            .map_err(|reason| malformed(Some(key), Some(line_number), line, reason))
    }

    /// Field-level parse; the `Err` string is the human-readable reason.
    fn parse_fields(&self, line: &str) -> std::result::Result<MonthlyRecord, String> {
        let fields: Vec<&str> = line.split(self.delimiter).map(str::trim).collect();

        if fields.len() < MIN_FIELDS {
            return Err(format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            ));
        }

        let open = parse_price("open", fields[1])?;
        let close = parse_price("close", fields[2])?;
        let high = parse_optional_price("high", fields.get(3).copied())?;
        let low = parse_optional_price("low", fields.get(4).copied())?;

        MonthlyRecord::new(fields[0], open, close)
            .and_then(|r| r.with_range(high, low))
            .map_err(|e| e.to_string())
    }
}

fn malformed(key: Option<&str>, line_number: Option<usize>, line: &str, reason: String) -> SectorError {
    SectorError::MalformedRecord {
        key: key.map(str::to_string),
        line_number,
        line: line.to_string(),
        reason,
    }
}

fn parse_price(name: &str, field: &str) -> std::result::Result<Decimal, String> {
    // `Decimal::from_str` also takes `1_000` and exponents; only plain
    // decimals survive a trip back through `to_line`.
    if !price_regex().is_match(field) {
        return Err(format!("invalid {} price {:?}", name, field));
    }
    Decimal::from_str(field).map_err(|_| format!("invalid {} price {:?}", name, field))
}

/// An absent or empty trailing field means the price is not present.
fn parse_optional_price(
    name: &str,
    field: Option<&str>,
) -> std::result::Result<Option<Decimal>, String> {
    match field {
        None | Some("") => Ok(None),
        Some(f) => parse_price(name, f).map(Some),
    }
}
