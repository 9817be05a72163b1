use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate column name: {name}")]
    DuplicateHeader { name: String },
    #[error("column {name} has {actual} cells, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("no column named {name}")]
    UnknownColumn { name: String },
    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
