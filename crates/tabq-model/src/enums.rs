//! Fixed vocabularies used by headers and transformation arguments.
//!
//! Each enum has a canonical label (the text presented as an option during a
//! dialogue) and accepts a few historical short forms when parsed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of a column, shared by every cell of the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    /// Free text. Parsing never fails.
    #[default]
    String,
    Number,
    Date,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Bool => "Bool",
            DataType::String => "String",
            DataType::Number => "Number",
            DataType::Date => "Date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => Ok(DataType::Bool),
            "STRING" | "TEXT" => Ok(DataType::String),
            "NUMBER" | "NUMERIC" => Ok(DataType::Number),
            "DATE" => Ok(DataType::Date),
            _ => Err(format!("Unknown data type: {s}")),
        }
    }
}

/// Sort order for the SortBy transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Options offered during the direction round, in presentation order.
    pub const ALL: [SortDirection; 2] = [SortDirection::Ascending, SortDirection::Descending];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ascending" | "Asc" => Ok(SortDirection::Ascending),
            "Descending" | "Desc" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {s}")),
        }
    }
}

/// Relation between a cell and the literal of a FilterBy transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    /// Reserved. Accepted when parsed, rejected at execution time.
    InRange,
}

impl Relation {
    /// Relations offered during the relation round. `InRange` is not offered.
    pub const OFFERED: [Relation; 4] = [
        Relation::Equals,
        Relation::NotEquals,
        Relation::LessThan,
        Relation::GreaterThan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Equals => "Equals",
            Relation::NotEquals => "NotEquals",
            Relation::LessThan => "LessThan",
            Relation::GreaterThan => "GreaterThan",
            Relation::InRange => "InRange",
        }
    }

    /// Short operator form, used in human-readable plan summaries.
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Equals => "==",
            Relation::NotEquals => "!=",
            Relation::LessThan => "<",
            Relation::GreaterThan => ">",
            Relation::InRange => "in",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Relation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Equals" | "==" => Ok(Relation::Equals),
            "NotEquals" | "!=" => Ok(Relation::NotEquals),
            "LessThan" | "<" => Ok(Relation::LessThan),
            "GreaterThan" | ">" => Ok(Relation::GreaterThan),
            "InRange" => Ok(Relation::InRange),
            _ => Err(format!("Unknown relation: {s}")),
        }
    }
}

/// Per-group reduction applied by the GroupBy transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    Sum,
    Mean,
    ConcatValues,
    CountDistinct,
    CountAll,
    /// Reserved. Offered and accepted, rejected at execution time.
    GroupKey,
}

impl Aggregation {
    /// Options offered during the aggregation round, in presentation order.
    pub const ALL: [Aggregation; 6] = [
        Aggregation::Sum,
        Aggregation::Mean,
        Aggregation::ConcatValues,
        Aggregation::CountDistinct,
        Aggregation::CountAll,
        Aggregation::GroupKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Sum => "Sum",
            Aggregation::Mean => "Mean",
            Aggregation::ConcatValues => "ConcatValues",
            Aggregation::CountDistinct => "CountDistinct",
            Aggregation::CountAll => "CountAll",
            Aggregation::GroupKey => "GroupKey",
        }
    }

    /// Whether the aggregated column is promoted to [`DataType::Number`].
    pub fn yields_number(&self) -> bool {
        matches!(
            self,
            Aggregation::Sum | Aggregation::Mean | Aggregation::CountAll | Aggregation::CountDistinct
        )
    }

    /// Whether a freeform key-set round follows the aggregation round.
    pub fn needs_key_set(&self) -> bool {
        !matches!(self, Aggregation::GroupKey)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sum" => Ok(Aggregation::Sum),
            "Mean" | "Avg" => Ok(Aggregation::Mean),
            "ConcatValues" | "Concat" => Ok(Aggregation::ConcatValues),
            "CountDistinct" => Ok(Aggregation::CountDistinct),
            "CountAll" => Ok(Aggregation::CountAll),
            "GroupKey" => Ok(Aggregation::GroupKey),
            _ => Err(format!("Unknown aggregation: {s}")),
        }
    }
}
