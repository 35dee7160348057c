use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use chrono::Month;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SectorError};

// ── Month table ───────────────────────────────────────────────────────────────

/// English three-letter month abbreviations, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Resolve a three-letter English month abbreviation (ASCII case-insensitive).
pub fn month_from_abbreviation(abbrev: &str) -> Result<Month> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbrev))
        .map(|idx| MONTHS[idx])
        .ok_or_else(|| SectorError::InvalidMonth(abbrev.to_string()))
}

/// Abbreviation for `month`, e.g. `"Jan"`.
pub fn month_abbreviation(month: Month) -> &'static str {
    MONTH_ABBREVIATIONS[month.number_from_month() as usize - 1]
}

// ── Year ──────────────────────────────────────────────────────────────────────

/// A calendar year identifying one bucket of monthly records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub i32);

impl Year {
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── MonthLabel ────────────────────────────────────────────────────────────────

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]{3})-(\d{4})$").expect("regex is valid"))
}

/// Parse a `"Mon-YYYY"` label such as `"Jan-2020"` into its month and year.
pub fn parse_month_label(label: &str) -> Result<(Month, Year)> {
    let caps = label_regex()
        .captures(label)
        .ok_or_else(|| SectorError::InvalidMonth(label.to_string()))?;
    let month = month_from_abbreviation(&caps[1])?;
    let year: i32 = caps[2]
        .parse()
        .map_err(|_| SectorError::InvalidMonth(label.to_string()))?;
    Ok((month, Year(year)))
}

// ── MonthlyRecord ─────────────────────────────────────────────────────────────

/// One month of prices for a sector, as read from a single source line.
///
/// The raw `date` label is kept verbatim next to its parsed month and year;
/// growth matching works on the label text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    date: String,
    #[serde(skip)]
    month: Month,
    #[serde(skip)]
    year: Year,
    open: Decimal,
    close: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    high: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    low: Option<Decimal>,
}

impl MonthlyRecord {
    /// Build a record from a `"Mon-YYYY"` label and its open/close prices.
    ///
    /// Fails when the label is not a valid month label or a price is negative.
    pub fn new(date: impl Into<String>, open: Decimal, close: Decimal) -> Result<Self> {
        let date = date.into();
        let (month, year) = parse_month_label(&date)?;
        let record = Self {
            date,
            month,
            year,
            open,
            close,
            high: None,
            low: None,
        };
        record.check_prices()?;
        Ok(record)
    }

    /// Attach the optional high/low prices.
    pub fn with_range(mut self, high: Option<Decimal>, low: Option<Decimal>) -> Result<Self> {
        self.high = high;
        self.low = low;
        self.check_prices()?;
        Ok(self)
    }

    fn check_prices(&self) -> Result<()> {
        let prices = [
            ("open", Some(self.open)),
            ("close", Some(self.close)),
            ("high", self.high),
            ("low", self.low),
        ];
        for (name, price) in prices {
            if let Some(p) = price {
                if p < Decimal::ZERO {
                    return Err(SectorError::NegativePrice {
                        field: name,
                        price: p,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn open(&self) -> Decimal {
        self.open
    }

    pub fn close(&self) -> Decimal {
        self.close
    }

    pub fn high(&self) -> Option<Decimal> {
        self.high
    }

    pub fn low(&self) -> Option<Decimal> {
        self.low
    }

    /// Re-serialize the record as a source line using `delimiter`.
    ///
    /// A `low` without a `high` is written with an empty high field so the
    /// field positions stay stable.
    pub fn to_line(&self, delimiter: char) -> String {
        let mut fields = vec![
            self.date.clone(),
            self.open.to_string(),
            self.close.to_string(),
        ];
        match (self.high, self.low) {
            (Some(h), Some(l)) => {
                fields.push(h.to_string());
                fields.push(l.to_string());
            }
            (Some(h), None) => fields.push(h.to_string()),
            (None, Some(l)) => {
                fields.push(String::new());
                fields.push(l.to_string());
            }
            (None, None) => {}
        }
        fields.join(&delimiter.to_string())
    }
}

impl fmt::Display for MonthlyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(','))
    }
}

// ── Sector ────────────────────────────────────────────────────────────────────

/// The fixed set of sectors whose monthly prices are tracked.
///
/// Each sector carries a 1-based display order and the ETF symbol used as its
/// source key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Technology,
    Financials,
    Energy,
    HealthCare,
    Industrials,
    ConsumerDiscretionary,
    ConsumerStaples,
    Utilities,
    Materials,
    RealEstate,
    CommunicationServices,
}

impl Sector {
    /// Every sector, in display order.
    pub const ALL: [Sector; 11] = [
        Sector::Technology,
        Sector::Financials,
        Sector::Energy,
        Sector::HealthCare,
        Sector::Industrials,
        Sector::ConsumerDiscretionary,
        Sector::ConsumerStaples,
        Sector::Utilities,
        Sector::Materials,
        Sector::RealEstate,
        Sector::CommunicationServices,
    ];

    /// 1-based display position.
    pub fn order(self) -> u8 {
        match self {
            Sector::Technology => 1,
            Sector::Financials => 2,
            Sector::Energy => 3,
            Sector::HealthCare => 4,
            Sector::Industrials => 5,
            Sector::ConsumerDiscretionary => 6,
            Sector::ConsumerStaples => 7,
            Sector::Utilities => 8,
            Sector::Materials => 9,
            Sector::RealEstate => 10,
            Sector::CommunicationServices => 11,
        }
    }

    /// Source key: the sector ETF symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Sector::Technology => "XLK",
            Sector::Financials => "XLF",
            Sector::Energy => "XLE",
            Sector::HealthCare => "XLV",
            Sector::Industrials => "XLI",
            Sector::ConsumerDiscretionary => "XLY",
            Sector::ConsumerStaples => "XLP",
            Sector::Utilities => "XLU",
            Sector::Materials => "XLB",
            Sector::RealEstate => "XLRE",
            Sector::CommunicationServices => "XLC",
        }
    }

    /// Upper-case identifier used as the key of growth results.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Sector::Technology => "TECHNOLOGY",
            Sector::Financials => "FINANCIALS",
            Sector::Energy => "ENERGY",
            Sector::HealthCare => "HEALTH_CARE",
            Sector::Industrials => "INDUSTRIALS",
            Sector::ConsumerDiscretionary => "CONSUMER_DISCRETIONARY",
            Sector::ConsumerStaples => "CONSUMER_STAPLES",
            Sector::Utilities => "UTILITIES",
            Sector::Materials => "MATERIALS",
            Sector::RealEstate => "REAL_ESTATE",
            Sector::CommunicationServices => "COMMUNICATION_SERVICES",
        }
    }

    /// Human-readable name, e.g. `"Health care"`.
    pub fn display_name(self) -> String {
        let lower = self.canonical_name().replace('_', " ").to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Look up a sector by its source-key symbol (case-insensitive).
    pub fn from_symbol(symbol: &str) -> Result<Sector> {
        Self::ALL
            .into_iter()
            .find(|s| s.symbol().eq_ignore_ascii_case(symbol.trim()))
            .ok_or_else(|| SectorError::UnknownSector(symbol.to_string()))
    }

    /// Look up a sector by canonical or display name (case-insensitive;
    /// spaces, hyphens and underscores are interchangeable).
    pub fn from_name(name: &str) -> Result<Sector> {
        let wanted = name.trim().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|s| s.canonical_name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| SectorError::UnknownSector(name.to_string()))
    }

    /// Resolve either a name or a symbol.
    pub fn resolve(input: &str) -> Result<Sector> {
        Self::from_name(input).or_else(|_| Self::from_symbol(input))
    }
}

impl PartialOrd for Sector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order().cmp(&other.order())
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    // ── month table ───────────────────────────────────────────────────────────

    #[test]
    fn test_month_from_abbreviation() {
        assert_eq!(month_from_abbreviation("Jan").unwrap(), Month::January);
        assert_eq!(month_from_abbreviation("dec").unwrap(), Month::December);
        assert_eq!(month_from_abbreviation("SEP").unwrap(), Month::September);
    }

    #[test]
    fn test_month_from_abbreviation_rejects_unknown() {
        assert!(matches!(
            month_from_abbreviation("Sept"),
            Err(SectorError::InvalidMonth(_))
        ));
        assert!(month_from_abbreviation("").is_err());
    }

    #[test]
    fn test_month_abbreviation_inverse() {
        for abbrev in MONTH_ABBREVIATIONS {
            let month = month_from_abbreviation(abbrev).unwrap();
            assert_eq!(month_abbreviation(month), abbrev);
        }
    }

    // ── parse_month_label ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_month_label() {
        let (month, year) = parse_month_label("Mar-2021").unwrap();
        assert_eq!(month, Month::March);
        assert_eq!(year, Year(2021));
    }

    #[test]
    fn test_parse_month_label_rejects_bad_shapes() {
        assert!(parse_month_label("2021-03").is_err());
        assert!(parse_month_label("Mar 2021").is_err());
        assert!(parse_month_label("Mar-21").is_err());
        assert!(parse_month_label("Xyz-2021").is_err());
    }

    // ── MonthlyRecord ─────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_record_new() {
        let r = MonthlyRecord::new("Jan-2020", dec!(100.5), dec!(101.25)).unwrap();
        assert_eq!(r.date(), "Jan-2020");
        assert_eq!(r.month(), Month::January);
        assert_eq!(r.year(), Year(2020));
        assert_eq!(r.open(), dec!(100.5));
        assert_eq!(r.close(), dec!(101.25));
        assert!(r.high().is_none());
    }

    #[test]
    fn test_monthly_record_rejects_negative_close() {
        assert!(matches!(
            MonthlyRecord::new("Jan-2020", dec!(1), dec!(-1)),
            Err(SectorError::NegativePrice { field: "close", .. })
        ));
    }

    #[test]
    fn test_monthly_record_zero_close_is_allowed() {
        let r = MonthlyRecord::new("Jan-2020", dec!(0), dec!(0)).unwrap();
        assert!(r.close().is_zero());
    }

    #[test]
    fn test_monthly_record_to_line() {
        let r = MonthlyRecord::new("Feb-2019", dec!(10.50), dec!(11.00))
            .unwrap()
            .with_range(Some(dec!(12.00)), Some(dec!(9.75)))
            .unwrap();
        assert_eq!(r.to_line(','), "Feb-2019,10.50,11.00,12.00,9.75");
        assert_eq!(r.to_line(';'), "Feb-2019;10.50;11.00;12.00;9.75");
        assert_eq!(r.to_string(), "Feb-2019,10.50,11.00,12.00,9.75");
    }

    #[test]
    fn test_monthly_record_serializes_prices_and_label() {
        let r = MonthlyRecord::new("Feb-2019", dec!(10.50), dec!(11.00)).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["date"], "Feb-2019");
        assert!(json.get("high").is_none());
        assert!(json.get("month").is_none());
    }

    // ── Sector ────────────────────────────────────────────────────────────────

    #[test]
    fn test_sector_orders_are_a_permutation() {
        let orders: HashSet<u8> = Sector::ALL.iter().map(|s| s.order()).collect();
        let expected: HashSet<u8> = (1..=Sector::ALL.len() as u8).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_sector_all_is_in_display_order() {
        let mut sorted = Sector::ALL;
        sorted.sort();
        assert_eq!(sorted, Sector::ALL);
    }

    #[test]
    fn test_sector_symbols_unique() {
        let symbols: HashSet<&str> = Sector::ALL.iter().map(|s| s.symbol()).collect();
        assert_eq!(symbols.len(), Sector::ALL.len());
    }

    #[test]
    fn test_sector_serde_matches_canonical_name() {
        for sector in Sector::ALL {
            let json = serde_json::to_string(&sector).unwrap();
            assert_eq!(json, format!("\"{}\"", sector.canonical_name()));
        }
    }

    #[test]
    fn test_sector_display_name() {
        assert_eq!(Sector::Technology.display_name(), "Technology");
        assert_eq!(Sector::HealthCare.display_name(), "Health care");
    }

    #[test]
    fn test_sector_lookup() {
        assert_eq!(Sector::from_symbol("xlre").unwrap(), Sector::RealEstate);
        assert_eq!(Sector::from_name("health care").unwrap(), Sector::HealthCare);
        assert_eq!(Sector::from_name("REAL-ESTATE").unwrap(), Sector::RealEstate);
        assert_eq!(Sector::resolve("XLE").unwrap(), Sector::Energy);
        assert_eq!(Sector::resolve("energy").unwrap(), Sector::Energy);
        assert!(matches!(
            Sector::resolve("crypto"),
            Err(SectorError::UnknownSector(_))
        ));
    }
}
