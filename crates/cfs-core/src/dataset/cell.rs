//! Cell values and the value normalizer.
//!
//! Spreadsheet cells arrive as numbers, percent strings, thousands-separated
//! strings or blanks. [`normalize`] turns any of them into a `Decimal` and
//! never fails: anything it cannot read becomes zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single cell of a parsed sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(Decimal),
    Bool(bool),
    Text(String),
}

/// How the normalizer treats minus signs inside text cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Remove every `-` before parsing, so `"-4.2%"` reads as `4.2`.
    /// Matches the scores already published in the source workbook.
    #[default]
    StripMinus,
    /// Keep minus signs, so negative growth stays negative.
    Preserve,
}

impl CellValue {
    /// Text form of the cell, as it would be shown in the sheet.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// True for empty cells and text cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(d) => write!(f, "{}", d.normalize()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Number(d)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(Decimal::from(n))
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats and floats beyond `Decimal::MAX` (about 7.9e28)
    /// have no decimal form and become zero.
    fn from(n: f64) -> Self {
        CellValue::Number(Decimal::try_from(n).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a cell using the default [`SignPolicy::StripMinus`].
pub fn normalize(cell: &CellValue) -> Decimal {
    normalize_with(cell, SignPolicy::default())
}

/// Normalize a cell into a number.
///
/// Empty cells, booleans and unparseable text all yield zero. Numbers pass
/// through unchanged. Text whose magnitude exceeds `Decimal::MAX` (about
/// 7.9e28) does not parse and also yields zero.
pub fn normalize_with(cell: &CellValue, policy: SignPolicy) -> Decimal {
    match cell {
        CellValue::Empty | CellValue::Bool(_) => Decimal::ZERO,
        CellValue::Number(d) => *d,
        CellValue::Text(s) => normalize_text(s, policy),
    }
}

/// Normalize raw text, e.g. `"1,234.5%"` → `1234.5`.
pub fn normalize_text(raw: &str, policy: SignPolicy) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| match c {
            ',' | '%' => false,
            '-' => policy == SignPolicy::Preserve,
            _ => true,
        })
        .collect();

    parse_decimal(cleaned.trim()).unwrap_or(Decimal::ZERO)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    // rust_decimal tolerates '_' separators; a sheet value like "1_000" is text.
    if s.is_empty() || s.contains('_') {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_thousands_and_percent_are_stripped() {
        assert_eq!(normalize(&text("1,234.5%")), dec!(1234.5));
        assert_eq!(normalize(&text("12%")), dec!(12));
        assert_eq!(normalize(&text(" 1,000,000 ")), dec!(1000000));
    }

    #[test]
    fn test_lone_dash_is_zero() {
        assert_eq!(normalize(&text("-")), Decimal::ZERO);
        assert_eq!(normalize_with(&text("-"), SignPolicy::Preserve), Decimal::ZERO);
    }

    #[test]
    fn test_empty_and_bool_are_zero() {
        assert_eq!(normalize(&CellValue::Empty), Decimal::ZERO);
        assert_eq!(normalize(&CellValue::Bool(true)), Decimal::ZERO);
        assert_eq!(normalize(&text("   ")), Decimal::ZERO);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(normalize(&CellValue::from(42i64)), dec!(42));
        assert_eq!(normalize(&CellValue::Number(dec!(-3.5))), dec!(-3.5));
    }

    #[test]
    fn test_unparseable_text_is_zero() {
        assert_eq!(normalize(&text("n/a")), Decimal::ZERO);
        assert_eq!(normalize(&text("#DIV/0!")), Decimal::ZERO);
        assert_eq!(normalize(&text("1 234")), Decimal::ZERO);
        assert_eq!(normalize(&text("1_000")), Decimal::ZERO);
    }

    #[test]
    fn test_scientific_notation_and_plus_sign() {
        assert_eq!(normalize(&text("1.5e3")), dec!(1500));
        assert_eq!(normalize(&text("+7.25")), dec!(7.25));
    }

    #[test]
    fn test_default_policy_discards_negative_sign() {
        // Negative growth reads as a positive magnitude under the default.
        assert_eq!(normalize(&text("-12.5%")), dec!(12.5));
        assert_eq!(normalize(&text("(1,200)")), Decimal::ZERO);
        // Hyphens inside a value are dropped too.
        assert_eq!(normalize(&text("1-2")), dec!(12));
    }

    #[test]
    fn test_preserve_policy_keeps_negative_sign() {
        assert_eq!(
            normalize_with(&text("-12.5%"), SignPolicy::Preserve),
            dec!(-12.5)
        );
        assert_eq!(
            normalize_with(&text("-1,234"), SignPolicy::Preserve),
            dec!(-1234)
        );
    }

    #[test]
    fn test_non_finite_float_becomes_zero() {
        assert_eq!(normalize(&CellValue::from(f64::NAN)), Decimal::ZERO);
        assert_eq!(normalize(&CellValue::from(f64::INFINITY)), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_values_become_zero() {
        assert_eq!(normalize(&CellValue::from(1e30_f64)), Decimal::ZERO);
        assert_eq!(normalize_text("1e30", SignPolicy::Preserve), Decimal::ZERO);
        assert_eq!(
            normalize_text("100,000,000,000,000,000,000,000,000,000", SignPolicy::Preserve),
            Decimal::ZERO
        );
        // still in range
        assert_eq!(
            normalize_text("1e20", SignPolicy::Preserve),
            Decimal::from_i128_with_scale(10_i128.pow(20), 0)
        );
    }

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(text("  ").is_blank());
        assert!(!text("x").is_blank());
        assert!(!CellValue::from(0i64).is_blank());
    }

    #[test]
    fn test_display_of_number_drops_trailing_zeros() {
        assert_eq!(CellValue::Number(dec!(12.50)).as_text(), "12.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }
}
