//! Shared ordering rules for sectors, years and monthly records.
//!
//! Maps and catalogs never promise an iteration order to their consumers;
//! anything that needs a display order asks these functions.

use std::cmp::Ordering;

use crate::error::Result;
use crate::models::{month_from_abbreviation, MonthlyRecord, Sector, Year};

/// Sectors by their fixed display order, ascending.
pub fn compare_sectors(a: &Sector, b: &Sector) -> Ordering {
    a.order().cmp(&b.order())
}

/// Years by numeric value, ascending.
pub fn compare_years(a: &Year, b: &Year) -> Ordering {
    a.value().cmp(&b.value())
}

/// Records by calendar month, ascending.
///
/// Records are validated on construction, so their month is always known.
/// Records from different years compare equal when their months match; sort
/// within a single year bucket.
pub fn compare_months(a: &MonthlyRecord, b: &MonthlyRecord) -> Ordering {
    a.month()
        .number_from_month()
        .cmp(&b.month().number_from_month())
}

/// Compare two raw labels (`"Jan-2020"`, or a bare `"Jan"`) by month.
///
/// Fails with [`SectorError::InvalidMonth`](crate::error::SectorError) when
/// either label does not start with a known abbreviation.
pub fn compare_month_labels(a: &str, b: &str) -> Result<Ordering> {
    Ok(month_ordinal(a)?.cmp(&month_ordinal(b)?))
}

/// 1-based month number of a label, read from the text before its first `-`.
pub fn month_ordinal(label: &str) -> Result<u32> {
    let abbrev = label.split('-').next().unwrap_or(label);
    Ok(month_from_abbreviation(abbrev)?.number_from_month())
}

/// `sectors` in display order.
pub fn sorted_sectors(sectors: impl IntoIterator<Item = Sector>) -> Vec<Sector> {
    let mut out: Vec<Sector> = sectors.into_iter().collect();
    out.sort_by(compare_sectors);
    out
}

/// `years` in ascending order.
pub fn sorted_years(years: impl IntoIterator<Item = Year>) -> Vec<Year> {
    let mut out: Vec<Year> = years.into_iter().collect();
    out.sort_by(compare_years);
    out
}

/// A chronological copy of one year bucket; the input is left untouched.
pub fn sorted_months(records: &[MonthlyRecord]) -> Vec<MonthlyRecord> {
    let mut out = records.to_vec();
    // Stable sort: duplicate months keep their source order.
    out.sort_by(compare_months);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SectorError;
    use rust_decimal_macros::dec;

    fn record(label: &str) -> MonthlyRecord {
        MonthlyRecord::new(label, dec!(1), dec!(1)).unwrap()
    }

    #[test]
    fn test_compare_sectors_by_display_order() {
        assert_eq!(
            compare_sectors(&Sector::Technology, &Sector::Energy),
            Ordering::Less
        );
        assert_eq!(
            compare_sectors(&Sector::CommunicationServices, &Sector::Utilities),
            Ordering::Greater
        );
        assert_eq!(
            compare_sectors(&Sector::Materials, &Sector::Materials),
            Ordering::Equal
        );
    }

    #[test]
    fn test_sorted_sectors() {
        let sorted = sorted_sectors([Sector::RealEstate, Sector::Technology, Sector::Energy]);
        assert_eq!(
            sorted,
            vec![Sector::Technology, Sector::Energy, Sector::RealEstate]
        );
    }

    #[test]
    fn test_sorted_years() {
        let sorted = sorted_years([Year(2021), Year(1999), Year(2020)]);
        assert_eq!(sorted, vec![Year(1999), Year(2020), Year(2021)]);
    }

    #[test]
    fn test_sorted_months_is_chronological() {
        let bucket = vec![record("Mar-2020"), record("Jan-2020"), record("Dec-2020"), record("Feb-2020")];
        let sorted = sorted_months(&bucket);
        let labels: Vec<&str> = sorted.iter().map(|r| r.date()).collect();
        assert_eq!(labels, vec!["Jan-2020", "Feb-2020", "Mar-2020", "Dec-2020"]);
        // The source order is preserved in the original bucket.
        assert_eq!(bucket[0].date(), "Mar-2020");
    }

    #[test]
    fn test_compare_month_labels() {
        assert_eq!(
            compare_month_labels("Jan-2020", "Feb-2019").unwrap(),
            Ordering::Less
        );
        assert_eq!(compare_month_labels("Oct", "oct").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_month_labels_unknown_is_error() {
        assert!(matches!(
            compare_month_labels("Foo-2020", "Jan-2020"),
            Err(SectorError::InvalidMonth(_))
        ));
    }

    #[test]
    fn test_month_ordinal() {
        assert_eq!(month_ordinal("Jan-2020").unwrap(), 1);
        assert_eq!(month_ordinal("Dec").unwrap(), 12);
        // Only the text before the first `-` counts, not a fixed width.
        assert_eq!(month_ordinal("sep-2020").unwrap(), 9);
        assert!(month_ordinal("Sept-2020").is_err());
    }
}
