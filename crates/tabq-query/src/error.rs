//! Error types for query building.

use std::io;

use tabq_transform::TransformError;
use thiserror::Error;

use crate::state::QueryState;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The dialogue channel failed to present, read or report.
    #[error("dialogue channel failed: {0}")]
    Channel(#[from] io::Error),

    /// Too many rejected answers in one round; the pending transformation
    /// was discarded.
    #[error("gave up on {state} after {attempts} rejected answer(s)")]
    AttemptsExhausted { state: QueryState, attempts: usize },

    /// An accepted answer set could not be turned into a transformation.
    #[error("failed to build transformation: {0}")]
    Build(#[from] TransformError),

    /// The query already ended; no further rounds can be asked.
    #[error("query is finished")]
    Finished,
}

pub type Result<T> = std::result::Result<T, QueryError>;
