//! Loads one sector's raw source into year buckets.

use std::collections::BTreeMap;

use sector_core::error::Result;
use sector_core::models::{MonthlyRecord, Sector, Year};
use tracing::debug;

use crate::parser::RecordParser;
use crate::source::RecordSource;

/// Records of one sector grouped by calendar year.
///
/// Each bucket keeps the source's line order; use
/// [`sector_core::ordering::sorted_months`] for a chronological view.
pub type YearlyRecords = BTreeMap<Year, Vec<MonthlyRecord>>;

/// Reads sector sources through a [`RecordSource`] and buckets them by year.
pub struct SectorLoader<'a, S: RecordSource + ?Sized> {
    source: &'a S,
    parser: RecordParser,
}

impl<'a, S: RecordSource + ?Sized> SectorLoader<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            parser: RecordParser::new(),
        }
    }

    pub fn with_parser(source: &'a S, parser: RecordParser) -> Self {
        Self { source, parser }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Load every record of `key`, bucketed by year.
    ///
    /// A missing source or any malformed line fails the whole load.
    pub fn load(&self, key: &str) -> Result<YearlyRecords> {
        let text = self.source.read(key)?;
        parse_source(&self.parser, key, &text)
    }

    /// [`load`](Self::load) for a known sector.
    pub fn load_sector(&self, sector: Sector) -> Result<YearlyRecords> {
        self.load(sector.symbol())
    }
}

/// Parse a whole source text into year buckets.
///
/// Blank lines are skipped; line numbers in errors are 1-based and count
/// blank lines.
pub fn parse_source(parser: &RecordParser, key: &str, text: &str) -> Result<YearlyRecords> {
    let mut buckets: YearlyRecords = BTreeMap::new();
    let mut count = 0usize;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parser.parse_at(key, idx + 1, line)?;
        buckets.entry(record.year()).or_default().push(record);
        count += 1;
    }

    debug!(
        "Source {}: {} records in {} years",
        key,
        count,
        buckets.len()
    );

    Ok(buckets)
}
