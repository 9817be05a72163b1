//! Raw cells and type-aware comparison.
//!
//! Cells keep their content as text; parsing happens only when a comparison
//! needs it, driven by the owning column's [`DataType`].

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::enums::DataType;

/// Date and date-time layouts recognised for [`DataType::Date`] columns.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// One raw data point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub content: String,
    /// Source row this cell came from, or the group index for aggregated cells.
    pub row_index: usize,
}

impl Cell {
    pub fn new(content: impl Into<String>, row_index: usize) -> Self {
        Self {
            content: content.into(),
            row_index,
        }
    }

    /// Parse the content under the given column type.
    pub fn parse_as(&self, data_type: DataType) -> Option<TypedValue<'_>> {
        parse_value(&self.content, data_type)
    }
}

/// A cell's content interpreted under a column type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue<'a> {
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(&'a str),
}

impl TypedValue<'_> {
    fn cmp_same(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TypedValue::Bool(a), TypedValue::Bool(b)) => a.cmp(b),
            (TypedValue::Number(a), TypedValue::Number(b)) => a.total_cmp(b),
            (TypedValue::Date(a), TypedValue::Date(b)) => a.cmp(b),
            (TypedValue::Text(a), TypedValue::Text(b)) => a.cmp(b),
            // Both sides always come from the same DataType.
            _ => Ordering::Equal,
        }
    }
}

/// Parse `raw` under `data_type`. `String` never fails.
pub fn parse_value(raw: &str, data_type: DataType) -> Option<TypedValue<'_>> {
    match data_type {
        DataType::String => Some(TypedValue::Text(raw)),
        DataType::Bool => parse_bool(raw).map(TypedValue::Bool),
        DataType::Number => parse_number(raw).map(TypedValue::Number),
        DataType::Date => parse_date(raw).map(TypedValue::Date),
    }
}

/// Parse a boolean (`true`/`false`, case-insensitive).
pub fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a date or date-time. Plain dates resolve to midnight.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(value);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Plain lexicographic comparison of raw contents.
pub fn compare_raw(left: &str, right: &str) -> Ordering {
    left.cmp(right)
}

/// Type-aware comparison of two raw contents.
///
/// A value that fails to parse always sorts after one that parses; two
/// unparseable values compare equal.
pub fn compare_typed(left: &str, right: &str, data_type: DataType) -> Ordering {
    match (parse_value(left, data_type), parse_value(right, data_type)) {
        (Some(a), Some(b)) => a.cmp_same(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Type-aware equality: typed when both sides parse, raw text otherwise.
pub fn equals_typed(left: &str, right: &str, data_type: DataType) -> bool {
    match (parse_value(left, data_type), parse_value(right, data_type)) {
        (Some(a), Some(b)) => a.cmp_same(&b) == Ordering::Equal,
        _ => left == right,
    }
}

/// Render a number the way aggregated cells store it (`60`, `2.5`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_ordering_is_numeric() {
        assert_eq!(compare_typed("9", "10", DataType::Number), Ordering::Less);
        assert_eq!(compare_raw("9", "10"), Ordering::Greater);
    }

    #[test]
    fn test_unparseable_sorts_last() {
        assert_eq!(compare_typed("n/a", "10", DataType::Number), Ordering::Greater);
        assert_eq!(compare_typed("10", "n/a", DataType::Number), Ordering::Less);
        assert_eq!(compare_typed("x", "y", DataType::Number), Ordering::Equal);
    }

    #[test]
    fn test_string_never_fails() {
        assert!(parse_value("", DataType::String).is_some());
        assert_eq!(compare_typed("b", "a", DataType::String), Ordering::Greater);
    }

    #[test]
    fn test_dates_compare_chronologically() {
        assert_eq!(
            compare_typed("2024-01-15", "15.02.2023", DataType::Date),
            Ordering::Greater
        );
        assert_eq!(
            compare_typed("2024-01-15", "2024-01-15T08:00:00", DataType::Date),
            Ordering::Less
        );
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" false "), Some(false));
        assert_eq!(parse_bool("1"), None);
        assert_eq!(compare_typed("false", "true", DataType::Bool), Ordering::Less);
    }

    #[test]
    fn test_equals_typed() {
        assert!(equals_typed("35.0", "35", DataType::Number));
        assert!(!equals_typed("35.0", "35", DataType::String));
        assert!(equals_typed("n/a", "n/a", DataType::Number));
        assert!(!equals_typed("n/a", "N/A", DataType::Number));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(60.0), "60");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(""), None);
    }
}
