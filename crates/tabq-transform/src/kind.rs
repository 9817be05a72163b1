//! Transformation kinds and their round metadata.
//!
//! A [`TransformKind`] is an unparameterized variant: it knows how many
//! question/answer rounds it needs, which options each round offers and what
//! instruction accompanies them, without touching any materialized data.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabq_model::{Aggregation, Relation, Schema, SortDirection};

/// The closed set of transformation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    Empty,
    DropColumn,
    SortBy,
    GroupBy,
    FilterBy,
}

/// One parameter-acquisition round after the variant has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundKind {
    /// Target column, chosen from the current schema.
    PrimaryTarget,
    /// Direction, relation or aggregation, chosen from a fixed vocabulary.
    SecondaryArgument,
    /// Free text: a filter literal or a group key list.
    FreeformArgument,
}

impl TransformKind {
    /// Variants in index order. The position is the variant's numeric index.
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Empty,
        TransformKind::DropColumn,
        TransformKind::SortBy,
        TransformKind::GroupBy,
        TransformKind::FilterBy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Empty => "Empty",
            TransformKind::DropColumn => "DropColumn",
            TransformKind::SortBy => "SortBy",
            TransformKind::GroupBy => "GroupBy",
            TransformKind::FilterBy => "FilterBy",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TransformKind::Empty => 0,
            TransformKind::DropColumn => 1,
            TransformKind::SortBy => 2,
            TransformKind::GroupBy => 3,
            TransformKind::FilterBy => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Resolve a variant from its canonical name or its numeric index.
    pub fn resolve(name_or_index: &str) -> Option<Self> {
        let trimmed = name_or_index.trim();
        match trimmed.parse::<usize>() {
            Ok(index) => Self::from_index(index),
            Err(_) => Self::from_name(trimmed),
        }
    }

    /// Canonical names in index order, as presented in the variant round.
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|kind| kind.name().to_string()).collect()
    }

    /// Rounds needed to fully parameterize this variant.
    ///
    /// GroupBy needs a freeform key-set round unless the chosen aggregation is
    /// `GroupKey`; before the aggregation is known the larger count is returned.
    pub fn total_rounds_needed(&self, argument: Option<&str>) -> usize {
        match self {
            TransformKind::Empty => 0,
            TransformKind::DropColumn => 1,
            TransformKind::SortBy => 2,
            TransformKind::GroupBy => {
                let aggregation = argument.and_then(|arg| arg.parse::<Aggregation>().ok());
                match aggregation {
                    Some(aggregation) if !aggregation.needs_key_set() => 2,
                    _ => 3,
                }
            }
            TransformKind::FilterBy => 3,
        }
    }

    /// The round following `satisfied` completed rounds, if any remain.
    pub fn next_round(&self, satisfied: usize, argument: Option<&str>) -> Option<RoundKind> {
        if satisfied >= self.total_rounds_needed(argument) {
            return None;
        }
        match satisfied {
            0 => Some(RoundKind::PrimaryTarget),
            1 => Some(RoundKind::SecondaryArgument),
            _ => Some(RoundKind::FreeformArgument),
        }
    }

    /// Legal target columns for the first round, derived from the schema alone.
    pub fn legal_next_choices(&self, schema: &Schema) -> Vec<String> {
        match self {
            TransformKind::Empty => Vec::new(),
            TransformKind::DropColumn
            | TransformKind::SortBy
            | TransformKind::GroupBy
            | TransformKind::FilterBy => schema.names(),
        }
    }

    /// Fixed vocabulary offered in the second round.
    pub fn argument_options(&self) -> Vec<String> {
        match self {
            TransformKind::Empty | TransformKind::DropColumn => Vec::new(),
            TransformKind::SortBy => SortDirection::ALL
                .iter()
                .map(|direction| direction.as_str().to_string())
                .collect(),
            TransformKind::GroupBy => Aggregation::ALL
                .iter()
                .map(|aggregation| aggregation.as_str().to_string())
                .collect(),
            TransformKind::FilterBy => Relation::OFFERED
                .iter()
                .map(|relation| relation.as_str().to_string())
                .collect(),
        }
    }

    /// Options for a bounded round; `None` for the freeform round.
    pub fn options_for(&self, round: RoundKind, schema: &Schema) -> Option<Vec<String>> {
        match round {
            RoundKind::PrimaryTarget => Some(self.legal_next_choices(schema)),
            RoundKind::SecondaryArgument => Some(self.argument_options()),
            RoundKind::FreeformArgument => None,
        }
    }

    /// Human-readable instruction shown with a round's options.
    pub fn instruction(&self, round: RoundKind) -> &'static str {
        match (self, round) {
            (TransformKind::Empty, _) => "Empty transformation takes no arguments",
            (TransformKind::DropColumn, RoundKind::PrimaryTarget) => "Select the column to drop",
            (TransformKind::DropColumn, _) => "DropColumn takes no further arguments",
            (TransformKind::SortBy, RoundKind::PrimaryTarget) => {
                "Choose the column by which to sort the dataset"
            }
            (TransformKind::SortBy, RoundKind::SecondaryArgument) => {
                "Choose whether the sort is ascending or descending"
            }
            (TransformKind::SortBy, RoundKind::FreeformArgument) => {
                "SortBy takes no further arguments"
            }
            (TransformKind::GroupBy, RoundKind::PrimaryTarget) => {
                "Choose the column by which to group the dataset"
            }
            (TransformKind::GroupBy, RoundKind::SecondaryArgument) => {
                "Choose the aggregation to apply to each group"
            }
            (TransformKind::GroupBy, RoundKind::FreeformArgument) => {
                "Write the comma-separated values of the column to keep as group keys"
            }
            (TransformKind::FilterBy, RoundKind::PrimaryTarget) => {
                "Choose the column by which to filter the dataset"
            }
            (TransformKind::FilterBy, RoundKind::SecondaryArgument) => {
                "Choose the relation between the column and the filter value"
            }
            (TransformKind::FilterBy, RoundKind::FreeformArgument) => {
                "Write the value to compare the column against"
            }
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabq_model::{DataType, Header};

    fn schema() -> Schema {
        Schema::from_headers([
            Header::new("Name", DataType::String, 0),
            Header::new("Age", DataType::Number, 1),
        ])
    }

    #[test]
    fn test_resolve_by_name_and_index() {
        assert_eq!(TransformKind::resolve("SortBy"), Some(TransformKind::SortBy));
        assert_eq!(TransformKind::resolve("4"), Some(TransformKind::FilterBy));
        assert_eq!(TransformKind::resolve("0"), Some(TransformKind::Empty));
        assert_eq!(TransformKind::resolve("5"), None);
        assert_eq!(TransformKind::resolve("Blah"), None);
    }

    #[test]
    fn test_indices_match_positions() {
        for (position, kind) in TransformKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }

    #[test]
    fn test_round_counts() {
        assert_eq!(TransformKind::Empty.total_rounds_needed(None), 0);
        assert_eq!(TransformKind::DropColumn.total_rounds_needed(None), 1);
        assert_eq!(TransformKind::SortBy.total_rounds_needed(None), 2);
        assert_eq!(TransformKind::GroupBy.total_rounds_needed(None), 3);
        assert_eq!(TransformKind::GroupBy.total_rounds_needed(Some("Sum")), 3);
        assert_eq!(TransformKind::GroupBy.total_rounds_needed(Some("GroupKey")), 2);
        assert_eq!(TransformKind::FilterBy.total_rounds_needed(None), 3);
    }

    #[test]
    fn test_next_round_sequence() {
        let kind = TransformKind::FilterBy;
        assert_eq!(kind.next_round(0, None), Some(RoundKind::PrimaryTarget));
        assert_eq!(kind.next_round(1, None), Some(RoundKind::SecondaryArgument));
        assert_eq!(kind.next_round(2, Some("Equals")), Some(RoundKind::FreeformArgument));
        assert_eq!(kind.next_round(3, Some("Equals")), None);
        assert_eq!(TransformKind::GroupBy.next_round(2, Some("GroupKey")), None);
    }

    #[test]
    fn test_legal_choices_follow_schema() {
        assert_eq!(TransformKind::SortBy.legal_next_choices(&schema()), vec!["Name", "Age"]);
        assert!(TransformKind::Empty.legal_next_choices(&schema()).is_empty());
    }

    #[test]
    fn test_argument_vocabularies() {
        assert_eq!(
            TransformKind::SortBy.argument_options(),
            vec!["Ascending", "Descending"]
        );
        assert_eq!(TransformKind::GroupBy.argument_options().len(), 6);
        assert_eq!(
            TransformKind::FilterBy.argument_options(),
            vec!["Equals", "NotEquals", "LessThan", "GreaterThan"]
        );
        assert_eq!(
            TransformKind::FilterBy.options_for(RoundKind::FreeformArgument, &schema()),
            None
        );
    }
}
