//! Resolving variants and building transformations from flat tokens.

use std::collections::BTreeSet;

use tabq_model::{Aggregation, FilterCondition, Relation, SortDirection};
use tracing::trace;

use crate::error::{Result, TransformError};
use crate::kind::TransformKind;
use crate::transformation::Transformation;

/// Resolve an unparameterized variant by canonical name or numeric index.
///
/// The result answers round and option questions only; it cannot be applied.
///
/// # Errors
///
/// Returns [`TransformError::ArgumentInvalid`] when nothing matches.
pub fn candidate_for(name_or_index: &str) -> Result<TransformKind> {
    TransformKind::resolve(name_or_index)
        .ok_or_else(|| TransformError::invalid("transformation", name_or_index))
}

/// Build a parameterized transformation from its argument tokens.
///
/// `arguments` excludes the variant token itself. Enum-valued tokens accept
/// canonical labels and their short forms (`Asc`, `==`, `Avg`, ...).
///
/// # Errors
///
/// - [`TransformError::ArgumentInvalid`] for an unknown variant or vocabulary token
/// - [`TransformError::ArgumentMissing`] when fewer tokens than the arity are given
pub fn build<S: AsRef<str>>(name_or_index: &str, arguments: &[S]) -> Result<Transformation> {
    let kind = candidate_for(name_or_index)?;
    let arguments: Vec<&str> = arguments.iter().map(AsRef::as_ref).collect();
    let second = arguments.get(1).copied();
    let expected = kind.total_rounds_needed(second);
    if arguments.len() < expected {
        // A bad aggregation label is a better diagnosis than a short count.
        if kind == TransformKind::GroupBy
            && let Some(label) = second
        {
            parse_aggregation(label)?;
        }
        return Err(TransformError::ArgumentMissing {
            variant: kind.name(),
            expected,
            actual: arguments.len(),
        });
    }

    let transformation = match kind {
        TransformKind::Empty => Transformation::Empty,
        TransformKind::DropColumn => {
            let mut columns: Vec<String> = Vec::with_capacity(arguments.len());
            for name in &arguments {
                if !columns.iter().any(|existing| existing == name) {
                    columns.push((*name).to_string());
                }
            }
            Transformation::DropColumn { columns }
        }
        TransformKind::SortBy => Transformation::SortBy {
            column: arguments[0].to_string(),
            direction: arguments[1]
                .parse::<SortDirection>()
                .map_err(|_| TransformError::invalid("sort direction", arguments[1]))?,
        },
        TransformKind::GroupBy => {
            let aggregation = parse_aggregation(arguments[1])?;
            let keys = if aggregation.needs_key_set() {
                parse_keys(&arguments[2..])?
            } else {
                BTreeSet::new()
            };
            Transformation::GroupBy {
                column: arguments[0].to_string(),
                aggregation,
                keys,
            }
        }
        TransformKind::FilterBy => Transformation::FilterBy(FilterCondition {
            source_header_name: arguments[0].to_string(),
            relation: arguments[1]
                .parse::<Relation>()
                .map_err(|_| TransformError::invalid("relation", arguments[1]))?,
            condition_literal: arguments[2].to_string(),
        }),
    };
    trace!(variant = kind.name(), tokens = arguments.len(), "built transformation");
    Ok(transformation)
}

/// Build from a full token line whose first token names the variant.
///
/// # Errors
///
/// Same as [`build`]; an empty line is [`TransformError::ArgumentMissing`].
pub fn build_from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Transformation> {
    match tokens.split_first() {
        Some((variant, arguments)) => build(variant.as_ref(), arguments),
        None => Err(TransformError::ArgumentMissing {
            variant: "transformation",
            expected: 1,
            actual: 0,
        }),
    }
}

fn parse_aggregation(label: &str) -> Result<Aggregation> {
    label
        .parse::<Aggregation>()
        .map_err(|_| TransformError::invalid("aggregation", label))
}

/// Split comma-separated key lists; every remaining token contributes keys.
fn parse_keys(tokens: &[&str]) -> Result<BTreeSet<String>> {
    let keys: BTreeSet<String> = tokens
        .iter()
        .flat_map(|token| token.split(','))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect();
    if keys.is_empty() {
        return Err(TransformError::invalid("group key list", tokens.join(" ")));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_is_invalid() {
        assert_eq!(
            build::<&str>("Blah", &[]).unwrap_err(),
            TransformError::ArgumentInvalid {
                kind: "transformation",
                token: "Blah".into()
            }
        );
        assert!(candidate_for("9").is_err());
    }

    #[test]
    fn test_short_argument_list_is_missing() {
        assert_eq!(
            build("SortBy", &["Age"]).unwrap_err(),
            TransformError::ArgumentMissing {
                variant: "SortBy",
                expected: 2,
                actual: 1
            }
        );
        assert!(matches!(
            build("GroupBy", &["Age", "Sum"]),
            Err(TransformError::ArgumentMissing { expected: 3, .. })
        ));
        assert!(matches!(
            build::<&str>("1", &[]),
            Err(TransformError::ArgumentMissing { expected: 1, .. })
        ));
    }

    #[test]
    fn test_bad_vocabulary_token_is_invalid() {
        assert!(matches!(
            build("SortBy", &["Age", "Sideways"]),
            Err(TransformError::ArgumentInvalid { kind: "sort direction", .. })
        ));
        assert!(matches!(
            build("GroupBy", &["Age", "Median"]),
            Err(TransformError::ArgumentInvalid { kind: "aggregation", .. })
        ));
        assert!(matches!(
            build("FilterBy", &["Age", "~", "3"]),
            Err(TransformError::ArgumentInvalid { kind: "relation", .. })
        ));
    }

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(
            build("2", &["Age", "Desc"]).unwrap(),
            Transformation::SortBy {
                column: "Age".into(),
                direction: SortDirection::Descending
            }
        );
        let filter = build("FilterBy", &["Age", ">", "30"]).unwrap();
        assert_eq!(filter.to_tokens(), vec!["FilterBy", "Age", "GreaterThan", "30"]);
    }

    #[test]
    fn test_group_keys_split_and_extend() {
        let group = build("GroupBy", &["City", "Avg", " Oslo, Bergen", "Tromso"]).unwrap();
        assert_eq!(
            group,
            Transformation::GroupBy {
                column: "City".into(),
                aggregation: Aggregation::Mean,
                keys: ["Bergen", "Oslo", "Tromso"].map(String::from).into(),
            }
        );
        assert!(build("GroupBy", &["City", "Sum", " , "]).is_err());
    }

    #[test]
    fn test_group_key_needs_two_arguments() {
        let group = build("GroupBy", &["City", "GroupKey"]).unwrap();
        assert_eq!(group.to_tokens(), vec!["GroupBy", "City", "GroupKey"]);
    }

    #[test]
    fn test_drop_column_is_variadic() {
        let drop = build("DropColumn", &["Age", "City", "Age"]).unwrap();
        assert_eq!(
            drop,
            Transformation::DropColumn {
                columns: vec!["Age".into(), "City".into()]
            }
        );
    }

    #[test]
    fn test_build_from_tokens() {
        let tokens = ["FilterBy", "Age", "LessThan", "40"];
        assert_eq!(build_from_tokens(&tokens).unwrap().to_tokens(), tokens);
        assert!(build_from_tokens::<&str>(&[]).is_err());
    }
}
