use rust_decimal::Decimal;

use crate::error::{Result, SectorError};
use crate::models::{MonthlyRecord, Sector};

/// Separator between a sector's display name and its symbol in labels.
pub const SYMBOL_SEPARATOR: &str = ", Symbol: ";

/// Format a price with thousands separators, keeping its own scale.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use sector_core::formatting::format_price;
///
/// assert_eq!(format_price(Decimal::new(123456, 2)), "1,234.56");
/// assert_eq!(format_price(Decimal::new(5, 0)), "5");
/// assert_eq!(format_price(Decimal::new(-1234567, 1)), "-123,456.7");
/// ```
pub fn format_price(price: Decimal) -> String {
    let text = price.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut result = group_thousands(int_part);
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }

    if price < Decimal::ZERO {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a growth percentage with an explicit sign.
///
/// # Examples
///
/// ```
/// use sector_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(50),  "+50%");
/// assert_eq!(format_percentage(-3),  "-3%");
/// assert_eq!(format_percentage(0),   "0%");
/// ```
pub fn format_percentage(pct: i32) -> String {
    if pct > 0 {
        format!("+{}%", pct)
    } else {
        format!("{}%", pct)
    }
}

/// Label shown when picking a sector, e.g. `"Technology, Symbol: XLK"`.
pub fn sector_label(sector: Sector) -> String {
    format!("{}{}{}", sector.display_name(), SYMBOL_SEPARATOR, sector.symbol())
}

/// Resolve a label produced by [`sector_label`] back to its sector.
///
/// Only the symbol half is consulted.
pub fn parse_sector_label(label: &str) -> Result<Sector> {
    let (_, symbol) = label
        .split_once(SYMBOL_SEPARATOR)
        .ok_or_else(|| SectorError::UnknownSector(label.to_string()))?;
    Sector::from_symbol(symbol)
}

/// Resolve user input naming a sector: a full label as printed by
/// [`sector_label`], a name, or a symbol.
pub fn resolve_sector(input: &str) -> Result<Sector> {
    let input = input.trim();
    if input.contains(SYMBOL_SEPARATOR) {
        parse_sector_label(input)
    } else {
        Sector::resolve(input)
    }
}

/// Multi-line block describing one month, as listed in the browse view.
pub fn record_block(record: &MonthlyRecord) -> String {
    format!(
        "{}\nOpening price: {}\nClosing price: {}",
        record.date(),
        format_price(record.open()),
        format_price(record.close())
    )
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // ── format_price ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_price_zero() {
        assert_eq!(format_price(dec!(0)), "0");
        assert_eq!(format_price(dec!(0.00)), "0.00");
    }

    #[test]
    fn test_format_price_keeps_scale() {
        assert_eq!(format_price(dec!(123.450)), "123.450");
    }

    #[test]
    fn test_format_price_with_thousands() {
        assert_eq!(format_price(dec!(1234.5)), "1,234.5");
        assert_eq!(format_price(dec!(1000)), "1,000");
    }

    #[test]
    fn test_format_price_millions() {
        assert_eq!(format_price(dec!(1234567)), "1,234,567");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(dec!(-9876.5)), "-9,876.5");
    }

    // ── format_percentage ────────────────────────────────────────────────────

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(120), "+120%");
        assert_eq!(format_percentage(-45), "-45%");
        assert_eq!(format_percentage(0), "0%");
    }

    // ── sector labels ────────────────────────────────────────────────────────

    #[test]
    fn test_sector_label() {
        assert_eq!(sector_label(Sector::Technology), "Technology, Symbol: XLK");
        assert_eq!(sector_label(Sector::RealEstate), "Real estate, Symbol: XLRE");
    }

    #[test]
    fn test_parse_sector_label_inverse() {
        for sector in Sector::ALL {
            assert_eq!(parse_sector_label(&sector_label(sector)).unwrap(), sector);
        }
    }

    #[test]
    fn test_parse_sector_label_without_separator() {
        assert!(matches!(
            parse_sector_label("Technology"),
            Err(SectorError::UnknownSector(_))
        ));
    }

    #[test]
    fn test_resolve_sector_accepts_labels_names_and_symbols() {
        assert_eq!(resolve_sector("Technology, Symbol: XLK").unwrap(), Sector::Technology);
        assert_eq!(resolve_sector(" Real estate, Symbol: XLRE ").unwrap(), Sector::RealEstate);
        assert_eq!(resolve_sector("health care").unwrap(), Sector::HealthCare);
        assert_eq!(resolve_sector("XLU").unwrap(), Sector::Utilities);
        assert!(matches!(
            resolve_sector("Technology, Symbol: XYZ"),
            Err(SectorError::UnknownSector(_))
        ));
    }

    // ── record_block ─────────────────────────────────────────────────────────

    #[test]
    fn test_record_block() {
        let r = MonthlyRecord::new("Jan-2020", dec!(1200.5), dec!(1310.25)).unwrap();
        assert_eq!(
            record_block(&r),
            "Jan-2020\nOpening price: 1,200.5\nClosing price: 1,310.25"
        );
    }
}
