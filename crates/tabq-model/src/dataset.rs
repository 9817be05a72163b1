//! Headers, fields and row-aligned datasets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::enums::{DataType, Relation};
use crate::error::{ModelError, Result};

/// Column identity. Two headers denote the same column when their names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub data_type: DataType,
    /// Position of the column in the source file.
    pub ordinal: usize,
}

impl Header {
    pub fn new(name: impl Into<String>, data_type: DataType, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            ordinal,
        }
    }
}

/// Schema-only projection of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyField {
    pub header: Header,
}

/// Ordered schema-only projection of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<EmptyField>,
}

impl Schema {
    pub fn new(fields: Vec<EmptyField>) -> Self {
        Self { fields }
    }

    /// Build a schema from headers alone.
    pub fn from_headers(headers: impl IntoIterator<Item = Header>) -> Self {
        Self {
            fields: headers
                .into_iter()
                .map(|header| EmptyField { header })
                .collect(),
        }
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.header.name.clone())
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&Header> {
        self.fields
            .iter()
            .map(|field| &field.header)
            .find(|header| header.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One column: header plus one cell per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub header: Header,
    pub data: Vec<Cell>,
}

impl Field {
    pub fn new(header: Header, data: Vec<Cell>) -> Self {
        Self { header, data }
    }

    /// Build a column from raw values, numbering rows from zero.
    pub fn from_values<S: Into<String>>(
        header: Header,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let data = values
            .into_iter()
            .enumerate()
            .map(|(row, value)| Cell::new(value, row))
            .collect();
        Self { header, data }
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn to_empty(&self) -> EmptyField {
        EmptyField {
            header: self.header.clone(),
        }
    }

    /// Raw contents in row order.
    pub fn contents(&self) -> Vec<&str> {
        self.data.iter().map(|cell| cell.content.as_str()).collect()
    }
}

/// Ordered, row-aligned collection of fields.
///
/// Every field has the same number of cells, and position `i` refers to the
/// same source row (or group) in every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    fields: Vec<Field>,
}

impl Dataset {
    /// Validate and wrap a set of fields.
    ///
    /// # Errors
    ///
    /// Fails on duplicate column names or columns of unequal length.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.header.name.as_str()) {
                return Err(ModelError::DuplicateHeader {
                    name: field.header.name.clone(),
                });
            }
        }
        if let Some(first) = fields.first() {
            let expected = first.data.len();
            if let Some(ragged) = fields.iter().find(|field| field.data.len() != expected) {
                return Err(ModelError::RaggedColumn {
                    name: ragged.header.name.clone(),
                    expected,
                    actual: ragged.data.len(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Build a dataset from column headers and row-major values.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names or when a row's width differs from the header count.
    pub fn from_rows(headers: Vec<Header>, rows: &[Vec<String>]) -> Result<Self> {
        let width = headers.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ModelError::RowWidth {
                row,
                expected: width,
                actual: values.len(),
            });
        }
        let fields = headers
            .into_iter()
            .enumerate()
            .map(|(col, header)| {
                Field::from_values(header, rows.iter().map(|row| row[col].clone()))
            })
            .collect();
        Self::new(fields)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.header.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.header.name == name)
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.fields.iter().map(Field::to_empty).collect())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }

    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, |field| field.data.len())
    }

    /// Take the cells at `positions` from every field, in that order.
    ///
    /// The same position list is applied to all fields, so row alignment is
    /// preserved. Positions past the end are skipped by every field alike.
    pub fn select_rows(&self, positions: &[usize]) -> Dataset {
        let fields = self
            .fields
            .iter()
            .map(|field| Field {
                header: field.header.clone(),
                data: positions
                    .iter()
                    .filter_map(|&position| field.data.get(position).cloned())
                    .collect(),
            })
            .collect();
        Dataset { fields }
    }

    /// Keep only the fields for which `keep` returns true.
    pub fn retain_fields(&self, keep: impl Fn(&Field) -> bool) -> Dataset {
        Dataset {
            fields: self
                .fields
                .iter()
                .filter(|field| keep(field))
                .cloned()
                .collect(),
        }
    }

    /// Swap in a new version of an existing column.
    ///
    /// # Errors
    ///
    /// Fails when no column has the replacement's name, or when its length
    /// differs from the other columns.
    pub fn replace_field(&mut self, field: Field) -> Result<()> {
        let expected = self.row_count();
        if field.data.len() != expected {
            return Err(ModelError::RaggedColumn {
                name: field.header.name.clone(),
                expected,
                actual: field.data.len(),
            });
        }
        match self.position(&field.header.name) {
            Some(position) => {
                self.fields[position] = field;
                Ok(())
            }
            None => Err(ModelError::UnknownColumn {
                name: field.header.name.clone(),
            }),
        }
    }

    /// Row-major view of the raw contents.
    pub fn rows(&self) -> Vec<Vec<&str>> {
        (0..self.row_count())
            .map(|row| {
                self.fields
                    .iter()
                    .map(|field| field.data[row].content.as_str())
                    .collect()
            })
            .collect()
    }
}

/// Parameters of a FilterBy transformation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCondition {
    pub source_header_name: String,
    pub relation: Relation,
    pub condition_literal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Dataset {
        Dataset::from_rows(
            vec![
                Header::new("Name", DataType::String, 0),
                Header::new("Age", DataType::Number, 1),
            ],
            &[
                vec!["John".to_string(), "35".to_string()],
                vec!["Jane".to_string(), "25".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_aligns_columns() {
        let dataset = people();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_names(), vec!["Name", "Age"]);
        assert_eq!(dataset.rows(), vec![vec!["John", "35"], vec!["Jane", "25"]]);
        assert_eq!(dataset.field("Age").unwrap().data[1].row_index, 1);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let result = Dataset::from_rows(
            vec![
                Header::new("A", DataType::String, 0),
                Header::new("A", DataType::String, 1),
            ],
            &[],
        );
        assert_eq!(
            result.unwrap_err(),
            ModelError::DuplicateHeader {
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = Dataset::new(vec![
            Field::from_values(Header::new("A", DataType::String, 0), ["x", "y"]),
            Field::from_values(Header::new("B", DataType::String, 1), ["x"]),
        ]);
        assert!(matches!(
            result,
            Err(ModelError::RaggedColumn { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_row_width_mismatch_rejected() {
        let result = Dataset::from_rows(
            vec![Header::new("A", DataType::String, 0)],
            &[vec!["x".to_string(), "y".to_string()]],
        );
        assert!(matches!(result, Err(ModelError::RowWidth { row: 0, .. })));
    }

    #[test]
    fn test_select_rows_keeps_alignment() {
        let dataset = people().select_rows(&[1, 0, 1]);
        assert_eq!(
            dataset.rows(),
            vec![vec!["Jane", "25"], vec!["John", "35"], vec!["Jane", "25"]]
        );
        let indices: Vec<usize> = dataset.fields()[0].data.iter().map(|c| c.row_index).collect();
        assert_eq!(indices, vec![1, 0, 1]);
    }

    #[test]
    fn test_replace_field_checks_length() {
        let mut dataset = people();
        let short = Field::from_values(Header::new("Age", DataType::Number, 1), ["1"]);
        assert!(dataset.replace_field(short).is_err());
        let full = Field::from_values(Header::new("Age", DataType::Number, 1), ["1", "2"]);
        dataset.replace_field(full).unwrap();
        assert_eq!(dataset.field("Age").unwrap().contents(), vec!["1", "2"]);
    }

    #[test]
    fn test_schema_projection() {
        let schema = people().schema();
        assert_eq!(schema.names(), vec!["Name", "Age"]);
        assert_eq!(schema.header("Age").unwrap().data_type, DataType::Number);
        assert!(!schema.contains("Salary"));
    }
}
