//! Column type inference.
//!
//! Every non-blank value of a column is inspected; the first type under which
//! all of them parse wins, in the order Bool, Number, Date. Anything else, and
//! a column with no non-blank values, is `String`.

use crate::cell::{parse_bool, parse_date, parse_number};
use crate::enums::DataType;

/// Infer the declared type of a column from its raw values.
pub fn infer_data_type<'a>(values: impl IntoIterator<Item = &'a str>) -> DataType {
    let mut any = false;
    let mut bool_ok = true;
    let mut number_ok = true;
    let mut date_ok = true;
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        any = true;
        bool_ok = bool_ok && parse_bool(trimmed).is_some();
        number_ok = number_ok && parse_number(trimmed).is_some();
        date_ok = date_ok && parse_date(trimmed).is_some();
        if !(bool_ok || number_ok || date_ok) {
            return DataType::String;
        }
    }
    if !any {
        DataType::String
    } else if bool_ok {
        DataType::Bool
    } else if number_ok {
        DataType::Number
    } else if date_ok {
        DataType::Date
    } else {
        DataType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(infer_data_type(["35", "25.5", ""]), DataType::Number);
    }

    #[test]
    fn test_mismatch_later_in_column_falls_back_to_string() {
        assert_eq!(infer_data_type(["35", "25", "unknown"]), DataType::String);
    }

    #[test]
    fn test_bools_and_dates() {
        assert_eq!(infer_data_type(["true", "False"]), DataType::Bool);
        assert_eq!(infer_data_type(["2024-01-15", "16.01.2024"]), DataType::Date);
    }

    #[test]
    fn test_blank_column_is_string() {
        assert_eq!(infer_data_type(["", "  "]), DataType::String);
        assert_eq!(infer_data_type(std::iter::empty()), DataType::String);
    }
}
