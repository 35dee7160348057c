use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sector pipeline.
#[derive(Error, Debug)]
pub enum SectorError {
    /// The raw source for a sector does not exist (data not yet fetched).
    #[error("Source not found for {key}: {path}")]
    SourceNotFound { key: String, path: PathBuf },

    /// The raw source exists but could not be read.
    #[error("Failed to read source {key}: {source}")]
    SourceRead {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A source line could not be turned into a monthly record.
    ///
    /// `key` and `line_number` are `None` for a line parsed on its own.
    #[error("Malformed record{} ({reason}): {line:?}", location(.key, .line_number))]
    MalformedRecord {
        key: Option<String>,
        line_number: Option<usize>,
        line: String,
        reason: String,
    },

    /// A price field holds a negative value.
    #[error("The {field} price must not be negative, got {price}")]
    NegativePrice { field: &'static str, price: Decimal },

    /// A growth computation would divide by a non-positive reference price.
    #[error("Invalid reference price {price} for sector {sector}")]
    InvalidPrice { sector: String, price: Decimal },

    /// The computed growth does not fit the integer result type.
    #[error("Growth for sector {sector} is out of range")]
    GrowthOutOfRange { sector: String },

    /// A sector name, symbol or label did not match any known sector.
    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    /// A month abbreviation is not one of `Jan`..`Dec`.
    #[error("Invalid month abbreviation: {0}")]
    InvalidMonth(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// `" in XLK at line 3"`, or only the known parts.
fn location(key: &Option<String>, line_number: &Option<usize>) -> String {
    let mut out = String::new();
    if let Some(k) = key {
        out.push_str(&format!(" in {}", k));
    }
    if let Some(n) = line_number {
        out.push_str(&format!(" at line {}", n));
    }
    out
}

impl SectorError {
    /// `true` when the error means a source has not been fetched yet.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, SectorError::SourceNotFound { .. })
    }
}

/// Convenience alias used throughout the sector crates.
pub type Result<T> = std::result::Result<T, SectorError>;
