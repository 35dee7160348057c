//! Per-sector closing-price growth between two reference date tokens.
//!
//! For each sector the records whose label contains either token are taken
//! in catalog order (years ascending, source order inside a year). The first
//! matching close `d` and the second `t` give
//! `trunc(ceil_2dp((t - d) / d) * 100)`.
//!
//! Matching is a plain, case-sensitive substring test on the label text, so
//! the token `"2020"` matches every month of 2020.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sector_core::error::{Result, SectorError};
use sector_core::models::{MonthlyRecord, Sector};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::catalog::SectorCatalog;

/// What [`GrowthCalculator::compute`] does when a sector's reference close
/// price is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidPricePolicy {
    /// Fail the whole computation with [`SectorError::InvalidPrice`].
    #[default]
    Propagate,
    /// Report `0` for that sector and carry on.
    DefaultToZero,
}

// ── GrowthResult ──────────────────────────────────────────────────────────────

/// Growth percentage per sector, iterated in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowthResult {
    values: BTreeMap<Sector, i32>,
}

impl GrowthResult {
    pub fn get(&self, sector: Sector) -> Option<i32> {
        self.values.get(&sector).copied()
    }

    /// `(sector, pct)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Sector, i32)> + '_ {
        self.values.iter().map(|(s, v)| (*s, *v))
    }

    /// `(canonical name, pct)` pairs in display order.
    pub fn named(&self) -> Vec<(&'static str, i32)> {
        self.iter().map(|(s, v)| (s.canonical_name(), v)).collect()
    }

    /// Plain name → pct map for consumers keyed by string.
    pub fn to_name_map(&self) -> std::collections::HashMap<String, i32> {
        self.iter()
            .map(|(s, v)| (s.canonical_name().to_string(), v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for GrowthResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (sector, pct) in self.iter() {
            map.serialize_entry(sector.canonical_name(), &pct)?;
        }
        map.end()
    }
}

// ── GrowthCalculator ──────────────────────────────────────────────────────────

/// Computes [`GrowthResult`]s for one pair of reference date tokens.
///
/// Holds no state besides its inputs; each call computes a fresh result.
#[derive(Debug, Clone)]
pub struct GrowthCalculator {
    from_token: String,
    to_token: String,
    policy: InvalidPricePolicy,
}

impl GrowthCalculator {
    pub fn new(from_token: impl Into<String>, to_token: impl Into<String>) -> Self {
        Self {
            from_token: from_token.into(),
            to_token: to_token.into(),
            policy: InvalidPricePolicy::default(),
        }
    }

    pub fn with_invalid_price_policy(mut self, policy: InvalidPricePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_token(&self) -> &str {
        &self.from_token
    }

    pub fn to_token(&self) -> &str {
        &self.to_token
    }

    /// Growth for every sector in `catalog`.
    ///
    /// Sectors with fewer than two matching records get `0`.
    pub fn compute(&self, catalog: &SectorCatalog) -> Result<GrowthResult> {
        let mut values = BTreeMap::new();

        for sector in catalog.sectors() {
            let pct = match self.sector_growth(sector, catalog.flattened(sector)) {
                Ok(pct) => pct,
                Err(SectorError::InvalidPrice { sector: name, price })
                    if self.policy == InvalidPricePolicy::DefaultToZero =>
                {
                    warn!(
                        "Reference price {} for {} is not positive; using 0",
                        price, name
                    );
                    0
                }
                Err(e) => return Err(e),
            };
            values.insert(sector, pct);
        }

        Ok(GrowthResult { values })
    }

    /// Growth for one sector's records, given in catalog order.
    pub fn sector_growth<'r>(
        &self,
        sector: Sector,
        records: impl IntoIterator<Item = &'r MonthlyRecord>,
    ) -> Result<i32> {
        let closes: Vec<Decimal> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .map(MonthlyRecord::close)
            .take(2)
            .collect();

        let [d, t] = match closes.as_slice() {
            [d, t] => [*d, *t],
            _ => {
                debug!(
                    "{}: fewer than two records match {:?}/{:?}",
                    sector, self.from_token, self.to_token
                );
                return Ok(0);
            }
        };

        growth_percentage(sector, d, t)
    }

    fn matches(&self, record: &MonthlyRecord) -> bool {
        record.date().contains(self.to_token.as_str())
            || record.date().contains(self.from_token.as_str())
    }
}

/// `compute` with the default policy.
pub fn compute_growth(catalog: &SectorCatalog, from_token: &str, to_token: &str) -> Result<GrowthResult> {
    GrowthCalculator::new(from_token, to_token).compute(catalog)
}

/// `(t - d) / d`, rounded to two decimals toward positive infinity, times
/// 100, truncated toward zero.
pub fn growth_percentage(sector: Sector, d: Decimal, t: Decimal) -> Result<i32> {
    if d <= Decimal::ZERO {
        return Err(SectorError::InvalidPrice {
            sector: sector.canonical_name().to_string(),
            price: d,
        });
    }

    let out_of_range = || SectorError::GrowthOutOfRange {
        sector: sector.canonical_name().to_string(),
    };

    let ratio = (t - d)
        .checked_div(d)
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
    let pct = ratio.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(out_of_range)?;

    pct.trunc().to_i32().ok_or_else(out_of_range)
}
