mod bootstrap;
mod report;

use anyhow::{bail, Context, Result};
use sector_core::formatting::resolve_sector;
use sector_core::models::Year;
use sector_core::settings::Settings;
use sector_data::{missing_sources, DirectorySource, GrowthCalculator, InvalidPricePolicy, SectorCatalog};

use crate::report::BrowseFilter;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Sector growth v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = settings.resolved_data_dir();
    bootstrap::ensure_directories(&data_dir)?;
    tracing::info!("View: {}, data: {}", settings.view, data_dir.display());

    let source = DirectorySource::new(&data_dir);

    // The catalog build assumes every source exists; fetching is someone
    // else's job, so report what is missing and stop.
    let missing = missing_sources(&source);
    if !missing.is_empty() {
        let symbols: Vec<&str> = missing.iter().map(|s| s.symbol()).collect();
        bail!(
            "sector data not available in {}: missing {}",
            data_dir.display(),
            symbols.join(", ")
        );
    }

    let catalog = SectorCatalog::build_all(&source)
        .with_context(|| format!("loading sector data from {}", data_dir.display()))?;

    let output = match settings.view.as_str() {
        "growth" => {
            let (from, to) = settings.date_tokens()?;

            let result = GrowthCalculator::new(from, to)
                .with_invalid_price_policy(InvalidPricePolicy::DefaultToZero)
                .compute(&catalog)?;

            if settings.format == "json" {
                report::growth_json(&result, from, to)?
            } else {
                report::growth_table(&result, from, to)
            }
        }

        "browse" => {
            let filter = BrowseFilter {
                sector: settings.sector.as_deref().map(resolve_sector).transpose()?,
                year: settings.year.map(Year),
            };

            if settings.format == "json" {
                report::browse_json(&catalog, filter)?
            } else {
                report::browse_text(&catalog, filter)
            }
        }

        unknown => bail!("Unknown view mode: {}", unknown),
    };

    print!("{}", output);

    if let Err(e) = settings.persist() {
        tracing::warn!("Could not persist settings: {}", e);
    }
    Ok(())
}
