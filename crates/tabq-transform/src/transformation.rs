//! Parameterized, immutable transformations.

use std::collections::BTreeSet;
use std::fmt;

use tabq_model::{Aggregation, DataType, Dataset, FilterCondition, Schema, SortDirection};

use crate::error::Result;
use crate::executors;
use crate::kind::TransformKind;

/// A fully parameterized transformation, ready to preview or apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    /// No-op. Choosing it at the top-level round ends a query.
    Empty,
    /// Remove the named columns.
    DropColumn { columns: Vec<String> },
    /// Stable type-aware sort on one column.
    SortBy {
        column: String,
        direction: SortDirection,
    },
    /// Reduce rows to one per key of the target column.
    GroupBy {
        column: String,
        aggregation: Aggregation,
        keys: BTreeSet<String>,
    },
    /// Keep rows whose target cell satisfies a relation to a literal.
    FilterBy(FilterCondition),
}

impl Transformation {
    pub fn kind(&self) -> TransformKind {
        match self {
            Transformation::Empty => TransformKind::Empty,
            Transformation::DropColumn { .. } => TransformKind::DropColumn,
            Transformation::SortBy { .. } => TransformKind::SortBy,
            Transformation::GroupBy { .. } => TransformKind::GroupBy,
            Transformation::FilterBy(_) => TransformKind::FilterBy,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Columns this transformation reads or removes.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Transformation::Empty => Vec::new(),
            Transformation::DropColumn { columns } => columns.iter().map(String::as_str).collect(),
            Transformation::SortBy { column, .. } | Transformation::GroupBy { column, .. } => {
                vec![column.as_str()]
            }
            Transformation::FilterBy(condition) => vec![condition.source_header_name.as_str()],
        }
    }

    /// Shape of the result, computed from the schema alone.
    pub fn preview_schema(&self, schema: &Schema) -> Schema {
        match self {
            Transformation::DropColumn { columns } => Schema::new(
                schema
                    .fields
                    .iter()
                    .filter(|field| !columns.contains(&field.header.name))
                    .cloned()
                    .collect(),
            ),
            Transformation::GroupBy {
                column,
                aggregation,
                ..
            } if aggregation.yields_number() => {
                let mut preview = schema.clone();
                for field in &mut preview.fields {
                    if field.header.name == *column {
                        field.header.data_type = DataType::Number;
                    }
                }
                preview
            }
            _ => schema.clone(),
        }
    }

    /// Derive a new dataset. The input is never modified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` when a referenced column is absent and
    /// `NotSupported` for the reserved `GroupKey` and `InRange` arguments.
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset> {
        match self {
            Transformation::Empty => Ok(dataset.clone()),
            Transformation::DropColumn { columns } => executors::drop_columns(dataset, columns),
            Transformation::SortBy { column, direction } => {
                executors::sort_by(dataset, column, *direction)
            }
            Transformation::GroupBy {
                column,
                aggregation,
                keys,
            } => executors::group_by(dataset, column, *aggregation, keys),
            Transformation::FilterBy(condition) => executors::filter_by(dataset, condition),
        }
    }

    /// Flat token form: `[variant, target, argument?, freeform?]`.
    ///
    /// Feeding the tokens back to the registry rebuilds an equal value.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.name().to_string()];
        match self {
            Transformation::Empty => {}
            Transformation::DropColumn { columns } => tokens.extend(columns.iter().cloned()),
            Transformation::SortBy { column, direction } => {
                tokens.push(column.clone());
                tokens.push(direction.as_str().to_string());
            }
            Transformation::GroupBy {
                column,
                aggregation,
                keys,
            } => {
                tokens.push(column.clone());
                tokens.push(aggregation.as_str().to_string());
                if aggregation.needs_key_set() {
                    tokens.push(keys.iter().cloned().collect::<Vec<_>>().join(","));
                }
            }
            Transformation::FilterBy(condition) => {
                tokens.push(condition.source_header_name.clone());
                tokens.push(condition.relation.as_str().to_string());
                tokens.push(condition.condition_literal.clone());
            }
        }
        tokens
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformation::Empty => write!(f, "Empty"),
            Transformation::DropColumn { columns } => {
                write!(f, "DropColumn({})", columns.join(", "))
            }
            Transformation::SortBy { column, direction } => {
                write!(f, "SortBy({column}, {direction})")
            }
            Transformation::GroupBy {
                column,
                aggregation,
                keys,
            } => {
                write!(f, "GroupBy({column}, {aggregation}")?;
                if aggregation.needs_key_set() {
                    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                    write!(f, ", keys=[{}]", keys.join(", "))?;
                }
                write!(f, ")")
            }
            Transformation::FilterBy(condition) => write!(
                f,
                "FilterBy({} {} {:?})",
                condition.source_header_name,
                condition.relation.symbol(),
                condition.condition_literal
            ),
        }
    }
}
