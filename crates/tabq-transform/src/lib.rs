//! Transformation variants, the token registry and the execution engine.
//!
//! - **kind**: unparameterized variants and their question/answer rounds
//! - **transformation**: parameterized transformations with schema preview and apply
//! - **executors**: row-aligned drop, sort, filter and group operations
//! - **registry**: building transformations from flat token lines
//! - **engine**: sequential execution with per-step reports
//! - **plan**: JSON plan files

pub mod engine;
pub mod error;
pub mod executors;
pub mod kind;
pub mod plan;
pub mod registry;
pub mod transformation;

pub use engine::{Execution, StepReport, execute, preview};
pub use error::{ExecutionError, PlanError, Result, TransformError};
pub use kind::{RoundKind, TransformKind};
pub use plan::QueryPlan;
pub use registry::{build, build_from_tokens, candidate_for};
pub use transformation::Transformation;
