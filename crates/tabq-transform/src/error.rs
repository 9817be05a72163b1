//! Error types for building and applying transformations.

use std::path::PathBuf;

use tabq_model::ModelError;
use thiserror::Error;

/// Errors raised while building or applying a single transformation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Unrecognized variant name, index or vocabulary token.
    #[error("unrecognized {kind}: \"{token}\"")]
    ArgumentInvalid { kind: &'static str, token: String },

    /// Fewer tokens than the variant's arity.
    #[error("{variant} needs {expected} argument(s), got {actual}")]
    ArgumentMissing {
        variant: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A referenced column does not exist in the dataset.
    #[error("column \"{name}\" not found")]
    InvalidTarget { name: String },

    /// The requested operation is part of the vocabulary but not implemented.
    #[error("{feature} is not supported")]
    NotSupported { feature: &'static str },

    /// The result violated a dataset invariant.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TransformError {
    pub(crate) fn invalid(kind: &'static str, token: impl Into<String>) -> Self {
        Self::ArgumentInvalid {
            kind,
            token: token.into(),
        }
    }

    /// Whether the error can be fixed by re-asking for the arguments.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ArgumentInvalid { .. } | Self::ArgumentMissing { .. }
        )
    }
}

/// A failed execution pass. The partially transformed dataset is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step {step} ({variant}) failed: {source}")]
pub struct ExecutionError {
    /// Zero-based position of the failing transformation in the plan.
    pub step: usize,
    pub variant: &'static str,
    #[source]
    pub source: TransformError,
}

/// Errors reading, writing or rebuilding a query plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to access plan file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan step {step} is empty")]
    EmptyStep { step: usize },

    #[error("plan step {step} is invalid: {source}")]
    Build {
        step: usize,
        #[source]
        source: TransformError,
    },
}

pub type Result<T> = std::result::Result<T, TransformError>;
