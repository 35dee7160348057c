//! The sector → year → month catalog built from every sector source.

use std::collections::HashMap;

use sector_core::error::Result;
use sector_core::models::{MonthlyRecord, Sector, Year};
use sector_core::ordering::{sorted_months, sorted_sectors};
use tracing::{debug, info};

use crate::loader::{SectorLoader, YearlyRecords};
use crate::source::RecordSource;

/// Immutable snapshot of all sectors' records.
///
/// Built once per load; consumers only get shared views.
#[derive(Debug, Clone, Default)]
pub struct SectorCatalog {
    sectors: HashMap<Sector, YearlyRecords>,
}

impl SectorCatalog {
    /// Load every known sector from `source`.
    ///
    /// Fails on the first sector that cannot be loaded; no partial catalog is
    /// returned. Each call reads the sources again.
    pub fn build_all<S: RecordSource + ?Sized>(source: &S) -> Result<Self> {
        Self::build_with(&SectorLoader::new(source))
    }

    /// [`build_all`](Self::build_all) with a preconfigured loader.
    pub fn build_with<S: RecordSource + ?Sized>(loader: &SectorLoader<'_, S>) -> Result<Self> {
        let mut sectors = HashMap::with_capacity(Sector::ALL.len());

        for sector in Sector::ALL {
            let yearly = loader.load_sector(sector)?;
            debug!("Loaded {} ({} years)", sector, yearly.len());
            sectors.insert(sector, yearly);
        }

        let catalog = Self { sectors };
        info!(
            "Built catalog: {} sectors, {} records",
            catalog.len(),
            catalog.record_count()
        );
        Ok(catalog)
    }

    /// Wrap already-grouped data, e.g. records produced outside the loader.
    pub fn from_map(sectors: HashMap<Sector, YearlyRecords>) -> Self {
        Self { sectors }
    }

    /// The full mapping, for consumers that walk it themselves.
    ///
    /// Iteration order is unspecified; see [`sector_core::ordering`].
    pub fn as_map(&self) -> &HashMap<Sector, YearlyRecords> {
        &self.sectors
    }

    pub fn get(&self, sector: Sector) -> Option<&YearlyRecords> {
        self.sectors.get(&sector)
    }

    /// Sectors present in the catalog, in display order.
    pub fn sectors(&self) -> Vec<Sector> {
        sorted_sectors(self.sectors.keys().copied())
    }

    /// Years available for `sector`, ascending.
    pub fn years(&self, sector: Sector) -> Vec<Year> {
        self.get(sector)
            .map(|y| y.keys().copied().collect())
            .unwrap_or_default()
    }

    /// One year bucket in source order.
    pub fn records(&self, sector: Sector, year: Year) -> Option<&[MonthlyRecord]> {
        self.get(sector)?.get(&year).map(Vec::as_slice)
    }

    /// One year bucket in calendar order; the stored bucket is not touched.
    pub fn months_chronological(&self, sector: Sector, year: Year) -> Vec<MonthlyRecord> {
        self.records(sector, year)
            .map(sorted_months)
            .unwrap_or_default()
    }

    /// All records of `sector`: years ascending, source order within a year.
    pub fn flattened(&self, sector: Sector) -> impl Iterator<Item = &MonthlyRecord> + '_ {
        self.get(sector)
            .into_iter()
            .flat_map(|yearly| yearly.values().flatten())
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Total number of records across all sectors.
    pub fn record_count(&self) -> usize {
        self.sectors
            .values()
            .flat_map(|yearly| yearly.values())
            .map(Vec::len)
            .sum()
    }
}
