//! Text and JSON rendering of catalog views and growth results.

use anyhow::Result;
use sector_core::formatting::{format_percentage, record_block, sector_label};
use sector_core::models::{Sector, Year};
use sector_data::{GrowthResult, SectorCatalog};
use serde_json::{json, Value};

/// Which part of the catalog the browse view shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowseFilter {
    pub sector: Option<Sector>,
    pub year: Option<Year>,
}

impl BrowseFilter {
    fn sectors(&self, catalog: &SectorCatalog) -> Vec<Sector> {
        match self.sector {
            Some(s) => vec![s],
            None => catalog.sectors(),
        }
    }

    fn years(&self, catalog: &SectorCatalog, sector: Sector) -> Vec<Year> {
        let years = catalog.years(sector);
        match self.year {
            Some(y) => years.into_iter().filter(|v| *v == y).collect(),
            None => years,
        }
    }
}

// ── Growth ────────────────────────────────────────────────────────────────────

/// Two-column table of sector labels and growth percentages.
pub fn growth_table(result: &GrowthResult, from: &str, to: &str) -> String {
    let rows: Vec<(String, String)> = result
        .iter()
        .map(|(sector, pct)| (sector_label(sector), format_percentage(pct)))
        .collect();
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut out = format!("Closing-price growth {} → {}\n", from, to);
    for (label, pct) in rows {
        out.push_str(&format!("{:<width$}  {:>6}\n", label, pct, width = width));
    }
    out
}

/// Growth result as a JSON document carrying the reference tokens.
pub fn growth_json(result: &GrowthResult, from: &str, to: &str) -> Result<String> {
    let doc = json!({
        "from": from,
        "to": to,
        "growth": result,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

// ── Browse ────────────────────────────────────────────────────────────────────

/// Sectors → years → months listing, each level in display order.
pub fn browse_text(catalog: &SectorCatalog, filter: BrowseFilter) -> String {
    let mut out = String::new();
    for sector in filter.sectors(catalog) {
        out.push_str(&format!("== {}\n", sector_label(sector)));
        for year in filter.years(catalog, sector) {
            out.push_str(&format!("-- {}\n", year));
            for record in catalog.months_chronological(sector, year) {
                out.push_str(&record_block(&record));
                out.push_str("\n\n");
            }
        }
    }
    out
}

/// Browse listing as JSON: `{ SECTOR: { "YYYY": [records..] } }`.
pub fn browse_json(catalog: &SectorCatalog, filter: BrowseFilter) -> Result<String> {
    let mut sectors = serde_json::Map::new();
    for sector in filter.sectors(catalog) {
        let mut years = serde_json::Map::new();
        for year in filter.years(catalog, sector) {
            let months = serde_json::to_value(catalog.months_chronological(sector, year))?;
            years.insert(year.to_string(), months);
        }
        sectors.insert(sector.canonical_name().to_string(), Value::Object(years));
    }
    Ok(serde_json::to_string_pretty(&Value::Object(sectors))?)
}
