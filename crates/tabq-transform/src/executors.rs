//! Transformation executor functions.
//!
//! Each function derives a new [`Dataset`] from its input. Reordering,
//! filtering and grouping compute a list of row positions from the target
//! column only, then hand that same list to [`Dataset::select_rows`] so every
//! column moves together.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tabq_model::{
    Aggregation, Cell, DataType, Dataset, Field, FilterCondition, Relation, SortDirection,
    compare_raw, compare_typed, equals_typed, format_number, parse_number, parse_value,
};
use tracing::{debug, warn};

use crate::error::{Result, TransformError};

fn target<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Field> {
    dataset
        .field(name)
        .ok_or_else(|| TransformError::InvalidTarget {
            name: name.to_string(),
        })
}

/// Remove every named column.
///
/// # Errors
///
/// Returns [`TransformError::InvalidTarget`] for the first name not present.
pub fn drop_columns(dataset: &Dataset, columns: &[String]) -> Result<Dataset> {
    for name in columns {
        target(dataset, name)?;
    }
    Ok(dataset.retain_fields(|field| !columns.iter().any(|name| name == field.name())))
}

/// Stable type-aware sort on one column.
///
/// Cells that do not parse under the column type stay after every parsed cell
/// in both directions; ties keep their current relative order.
pub fn sort_by(dataset: &Dataset, column: &str, direction: SortDirection) -> Result<Dataset> {
    let field = target(dataset, column)?;
    let data_type = field.header.data_type;
    let mut positions: Vec<usize> = (0..field.data.len()).collect();
    positions.sort_by(|&a, &b| {
        let left = field.data[a].content.as_str();
        let right = field.data[b].content.as_str();
        let both_parse = parse_value(left, data_type).is_some()
            && parse_value(right, data_type).is_some();
        let ordering = compare_typed(left, right, data_type);
        match direction {
            SortDirection::Descending if both_parse => ordering.reverse(),
            _ => ordering,
        }
    });
    Ok(dataset.select_rows(&positions))
}

/// Whether `content` stands in `relation` to `literal` under `data_type`.
///
/// # Errors
///
/// Returns [`TransformError::NotSupported`] for [`Relation::InRange`].
pub fn relation_holds(
    content: &str,
    relation: Relation,
    literal: &str,
    data_type: DataType,
) -> Result<bool> {
    let ordered = |wanted: Ordering| {
        parse_value(content, data_type).is_some()
            && parse_value(literal, data_type).is_some()
            && compare_typed(content, literal, data_type) == wanted
    };
    match relation {
        Relation::Equals => Ok(equals_typed(content, literal, data_type)),
        Relation::NotEquals => Ok(!equals_typed(content, literal, data_type)),
        Relation::LessThan => Ok(ordered(Ordering::Less)),
        Relation::GreaterThan => Ok(ordered(Ordering::Greater)),
        Relation::InRange => Err(TransformError::NotSupported {
            feature: "InRange relation",
        }),
    }
}

/// Keep the rows whose target cell satisfies the condition.
pub fn filter_by(dataset: &Dataset, condition: &FilterCondition) -> Result<Dataset> {
    let field = target(dataset, &condition.source_header_name)?;
    let data_type = field.header.data_type;
    if condition.relation == Relation::InRange {
        return Err(TransformError::NotSupported {
            feature: "InRange relation",
        });
    }
    if parse_value(&condition.condition_literal, data_type).is_none() {
        warn!(
            column = %condition.source_header_name,
            data_type = %data_type,
            "filter literal does not parse under the column type"
        );
    }

    let mut positions = Vec::new();
    for (position, cell) in field.data.iter().enumerate() {
        if relation_holds(
            &cell.content,
            condition.relation,
            &condition.condition_literal,
            data_type,
        )? {
            positions.push(position);
        }
    }
    debug!(
        column = %condition.source_header_name,
        relation = %condition.relation,
        kept = positions.len(),
        dropped = field.data.len() - positions.len(),
        "filtered rows"
    );
    Ok(dataset.select_rows(&positions))
}

/// Group rows by the trimmed content of one column, keeping only the given keys.
///
/// The target column holds one aggregated cell per group; every other column
/// keeps the group's first row.
pub fn group_by(
    dataset: &Dataset,
    column: &str,
    aggregation: Aggregation,
    keys: &BTreeSet<String>,
) -> Result<Dataset> {
    let field = target(dataset, column)?;
    if aggregation == Aggregation::GroupKey {
        return Err(TransformError::NotSupported {
            feature: "GroupKey aggregation",
        });
    }
    let data_type = field.header.data_type;

    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for (position, cell) in field.data.iter().enumerate() {
        let content = cell.content.trim();
        if !keys.contains(content) {
            continue;
        }
        match slots.get(content) {
            Some(&slot) => groups[slot].1.push(position),
            None => {
                slots.insert(content, groups.len());
                groups.push((content, vec![position]));
            }
        }
    }
    groups.sort_by(|(left, _), (right, _)| {
        compare_typed(left, right, data_type).then_with(|| compare_raw(left, right))
    });

    let mut skipped = 0usize;
    let mut cells = Vec::with_capacity(groups.len());
    for (group_index, (_, members)) in groups.iter().enumerate() {
        let values: Vec<&str> = members
            .iter()
            .map(|&position| field.data[position].content.as_str())
            .collect();
        let content = aggregate(aggregation, &values, &mut skipped);
        cells.push(Cell::new(content, group_index));
    }
    if skipped > 0 {
        warn!(column, skipped, "skipped non-numeric values while aggregating");
    }

    let representatives: Vec<usize> = groups.iter().map(|(_, members)| members[0]).collect();
    let mut header = field.header.clone();
    if aggregation.yields_number() {
        header.data_type = DataType::Number;
    }
    let mut grouped = dataset.select_rows(&representatives);
    grouped.replace_field(Field::new(header, cells))?;
    debug!(
        column,
        aggregation = %aggregation,
        groups = groups.len(),
        "grouped rows"
    );
    Ok(grouped)
}

fn aggregate(aggregation: Aggregation, values: &[&str], skipped: &mut usize) -> String {
    let numbers = || {
        values
            .iter()
            .filter_map(|value| parse_number(value))
            .collect::<Vec<f64>>()
    };
    match aggregation {
        Aggregation::Sum => {
            let numbers = numbers();
            *skipped += values.len() - numbers.len();
            format_number(numbers.iter().fold(0.0, |total, n| total + n))
        }
        Aggregation::Mean => {
            let numbers = numbers();
            *skipped += values.len() - numbers.len();
            if numbers.is_empty() {
                String::new()
            } else {
                format_number(numbers.iter().sum::<f64>() / numbers.len() as f64)
            }
        }
        Aggregation::ConcatValues => values.join(","),
        Aggregation::CountDistinct => values
            .iter()
            .collect::<BTreeSet<_>>()
            .len()
            .to_string(),
        Aggregation::CountAll => values.len().to_string(),
        // Rejected before any group is built.
        Aggregation::GroupKey => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabq_model::Header;

    fn sales() -> Dataset {
        Dataset::from_rows(
            vec![
                Header::new("Region", DataType::String, 0),
                Header::new("Amount", DataType::Number, 1),
                Header::new("Rep", DataType::String, 2),
            ],
            &[
                vec!["north".into(), "10".into(), "ann".into()],
                vec!["south".into(), "20".into(), "bob".into()],
                vec!["north".into(), "30".into(), "cy".into()],
                vec!["east".into(), "n/a".into(), "dee".into()],
                vec!["north".into(), "x".into(), "eve".into()],
            ],
        )
        .unwrap()
    }

    fn keys(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_sort_descending_keeps_unparseable_last() {
        let sorted = sort_by(&sales(), "Amount", SortDirection::Descending).unwrap();
        assert_eq!(
            sorted.field("Amount").unwrap().contents(),
            vec!["30", "20", "10", "n/a", "x"]
        );
        assert_eq!(
            sorted.field("Rep").unwrap().contents(),
            vec!["cy", "bob", "ann", "dee", "eve"]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let sorted = sort_by(&sales(), "Region", SortDirection::Ascending).unwrap();
        assert_eq!(
            sorted.field("Rep").unwrap().contents(),
            vec!["dee", "ann", "cy", "eve", "bob"]
        );
    }

    #[test]
    fn test_filter_less_than_skips_unparseable() {
        let condition = FilterCondition {
            source_header_name: "Amount".into(),
            relation: Relation::LessThan,
            condition_literal: "25".into(),
        };
        let filtered = filter_by(&sales(), &condition).unwrap();
        assert_eq!(filtered.field("Rep").unwrap().contents(), vec!["ann", "bob"]);
    }

    #[test]
    fn test_filter_not_equals_is_typed() {
        let condition = FilterCondition {
            source_header_name: "Amount".into(),
            relation: Relation::NotEquals,
            condition_literal: "10.0".into(),
        };
        let filtered = filter_by(&sales(), &condition).unwrap();
        assert_eq!(filtered.row_count(), 4);
    }

    #[test]
    fn test_filter_in_range_not_supported() {
        let condition = FilterCondition {
            source_header_name: "Amount".into(),
            relation: Relation::InRange,
            condition_literal: "1".into(),
        };
        assert!(matches!(
            filter_by(&sales(), &condition),
            Err(TransformError::NotSupported { .. })
        ));
    }

    #[test]
    fn test_group_sum_and_mean_skip_non_numeric() {
        let grouped = group_by(
            &sales().select_rows(&[0, 2, 4, 1]),
            "Region",
            Aggregation::CountAll,
            &keys(&["north", "south"]),
        )
        .unwrap();
        assert_eq!(grouped.field("Region").unwrap().contents(), vec!["3", "1"]);
        assert_eq!(grouped.field("Rep").unwrap().contents(), vec!["ann", "bob"]);

        let sales = sales();
        let sums = group_by(&sales, "Amount", Aggregation::Sum, &keys(&["10", "x"])).unwrap();
        assert_eq!(sums.field("Amount").unwrap().contents(), vec!["10", "0"]);

        let means = group_by(&sales, "Amount", Aggregation::Mean, &keys(&["n/a"])).unwrap();
        assert_eq!(means.field("Amount").unwrap().contents(), vec![""]);
    }

    #[test]
    fn test_group_matches_keys_on_trimmed_content() {
        let padded = Dataset::from_rows(
            vec![
                Header::new("Code", DataType::Number, 0),
                Header::new("Rep", DataType::String, 1),
            ],
            &[
                vec![" 9".into(), "ann".into()],
                vec!["9 ".into(), "bob".into()],
                vec!["4".into(), "cy".into()],
            ],
        )
        .unwrap();
        let grouped = group_by(&padded, "Code", Aggregation::CountAll, &keys(&["9"])).unwrap();
        assert_eq!(grouped.field("Code").unwrap().contents(), vec!["2"]);
        assert_eq!(grouped.field("Rep").unwrap().contents(), vec!["ann"]);
    }

    #[test]
    fn test_group_promotes_type_and_reindexes() {
        let grouped = group_by(
            &sales(),
            "Region",
            Aggregation::CountDistinct,
            &keys(&["north", "east", "west"]),
        )
        .unwrap();
        let region = grouped.field("Region").unwrap();
        assert_eq!(region.header.data_type, DataType::Number);
        assert_eq!(region.contents(), vec!["1", "1"]);
        let indices: Vec<usize> = region.data.iter().map(|cell| cell.row_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(grouped.field("Rep").unwrap().contents(), vec!["dee", "ann"]);
    }

    #[test]
    fn test_group_concat_keeps_string_type() {
        let grouped = group_by(
            &sales(),
            "Region",
            Aggregation::ConcatValues,
            &keys(&["south"]),
        )
        .unwrap();
        let region = grouped.field("Region").unwrap();
        assert_eq!(region.header.data_type, DataType::String);
        assert_eq!(region.contents(), vec!["south"]);
    }

    #[test]
    fn test_group_key_not_supported() {
        let result = group_by(&sales(), "Region", Aggregation::GroupKey, &keys(&["north"]));
        assert!(matches!(result, Err(TransformError::NotSupported { .. })));
    }

    #[test]
    fn test_missing_target_is_invalid() {
        let result = sort_by(&sales(), "Salary", SortDirection::Ascending);
        assert_eq!(
            result.unwrap_err(),
            TransformError::InvalidTarget {
                name: "Salary".into()
            }
        );
        assert!(drop_columns(&sales(), &["Rep".into(), "Salary".into()]).is_err());
    }
}
