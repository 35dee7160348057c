//! Data ingestion layer for sector price sources.
//!
//! Responsible for reading raw per-sector text sources, parsing them into
//! monthly records, bucketing them by year, assembling the all-sector catalog
//! and computing per-sector growth between two reference dates.

pub mod catalog;
pub mod growth;
pub mod loader;
pub mod parser;
pub mod source;

pub use sector_core as core;

pub use catalog::SectorCatalog;
pub use growth::{compute_growth, GrowthCalculator, GrowthResult, InvalidPricePolicy};
pub use loader::{SectorLoader, YearlyRecords};
pub use parser::RecordParser;
pub use source::{all_sources_present, missing_sources, DirectorySource, MemorySource, RecordSource};
