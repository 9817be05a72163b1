use std::path::PathBuf;

use tabq_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited text in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name} has no header row")]
    Empty { source_name: String },

    #[error("invalid table in {source_name}: {source}")]
    Model {
        source_name: String,
        #[source]
        source: ModelError,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
