//! Domain types shared by the sector crates.
//!
//! Holds the monthly record and sector models, the error taxonomy, the
//! ordering rules used for display, presentation helpers and CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod ordering;
pub mod settings;

pub use error::{Result, SectorError};
pub use models::{MonthlyRecord, Sector, Year};
