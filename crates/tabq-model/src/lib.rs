//! Data model for dialogue-driven tabular transformations.
//!
//! - **enums**: column data types and the fixed argument vocabularies
//! - **cell**: raw cells, typed parsing and type-aware ordering
//! - **dataset**: headers, schema projections, fields and row-aligned datasets
//! - **inference**: column type inference from raw values

pub mod cell;
pub mod dataset;
pub mod enums;
pub mod error;
pub mod inference;

pub use cell::{
    Cell, TypedValue, compare_raw, compare_typed, equals_typed, format_number, parse_bool,
    parse_date, parse_number, parse_value,
};
pub use dataset::{Dataset, EmptyField, Field, FilterCondition, Header, Schema};
pub use enums::{Aggregation, DataType, Relation, SortDirection};
pub use error::{ModelError, Result};
pub use inference::infer_data_type;
