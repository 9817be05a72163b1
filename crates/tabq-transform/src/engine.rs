//! Sequential execution of a committed transformation list.

use serde::Serialize;
use tabq_model::{Dataset, Schema};
use tracing::{debug, debug_span, info, info_span};

use crate::error::ExecutionError;
use crate::kind::TransformKind;
use crate::transformation::Transformation;

/// Outcome of one applied transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub variant: TransformKind,
    pub tokens: Vec<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
}

/// Final dataset plus one report per applied step.
#[derive(Debug, Clone)]
pub struct Execution {
    pub dataset: Dataset,
    pub steps: Vec<StepReport>,
}

/// Apply `plan` in order, threading a fresh dataset through every step.
///
/// The input dataset is left untouched. Any failing step aborts the pass and
/// the intermediate result is dropped.
///
/// # Errors
///
/// Returns an [`ExecutionError`] naming the failing step and variant.
pub fn execute(dataset: &Dataset, plan: &[Transformation]) -> Result<Execution, ExecutionError> {
    let span = info_span!("execute", steps = plan.len());
    let _guard = span.enter();

    let mut current = dataset.clone();
    let mut steps = Vec::with_capacity(plan.len());
    for (index, transformation) in plan.iter().enumerate() {
        let step_span = debug_span!("step", index, variant = transformation.name());
        let _step_guard = step_span.enter();

        let next = transformation
            .apply(&current)
            .map_err(|source| ExecutionError {
                step: index,
                variant: transformation.name(),
                source,
            })?;
        let report = StepReport {
            index,
            variant: transformation.kind(),
            tokens: transformation.to_tokens(),
            rows_before: current.row_count(),
            rows_after: next.row_count(),
            columns_before: current.column_count(),
            columns_after: next.column_count(),
        };
        debug!(
            rows_before = report.rows_before,
            rows_after = report.rows_after,
            columns_after = report.columns_after,
            "applied transformation"
        );
        steps.push(report);
        current = next;
    }

    info!(
        rows = current.row_count(),
        columns = current.column_count(),
        "execution complete"
    );
    Ok(Execution {
        dataset: current,
        steps,
    })
}

/// Schema after every step of `plan`, without touching any data.
pub fn preview(schema: &Schema, plan: &[Transformation]) -> Schema {
    plan.iter()
        .fold(schema.clone(), |current, transformation| {
            transformation.preview_schema(&current)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::registry::build;
    use tabq_model::{DataType, Header};

    fn people() -> Dataset {
        Dataset::from_rows(
            vec![
                Header::new("Name", DataType::String, 0),
                Header::new("Age", DataType::Number, 1),
            ],
            &[
                vec!["John".into(), "35".into()],
                vec!["Jane".into(), "25".into()],
                vec!["Jim".into(), "41".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_steps_thread_through() {
        let plan = vec![
            build("FilterBy", &["Age", "GreaterThan", "30"]).unwrap(),
            build("SortBy", &["Age", "Descending"]).unwrap(),
            build("DropColumn", &["Age"]).unwrap(),
        ];
        let execution = execute(&people(), &plan).unwrap();
        assert_eq!(execution.dataset.rows(), vec![vec!["Jim"], vec!["John"]]);
        assert_eq!(execution.steps.len(), 3);
        assert_eq!(execution.steps[0].rows_before, 3);
        assert_eq!(execution.steps[0].rows_after, 2);
        assert_eq!(execution.steps[2].columns_after, 1);
    }

    #[test]
    fn test_failure_reports_step() {
        let plan = vec![
            build("DropColumn", &["Age"]).unwrap(),
            build("SortBy", &["Age", "Ascending"]).unwrap(),
        ];
        let error = execute(&people(), &plan).unwrap_err();
        assert_eq!(error.step, 1);
        assert_eq!(error.variant, "SortBy");
        assert_eq!(
            error.source,
            TransformError::InvalidTarget { name: "Age".into() }
        );
    }

    #[test]
    fn test_empty_plan_returns_copy() {
        let dataset = people();
        let execution = execute(&dataset, &[]).unwrap();
        assert_eq!(execution.dataset, dataset);
        assert!(execution.steps.is_empty());
    }

    #[test]
    fn test_preview_matches_execution_shape() {
        let plan = vec![
            build("GroupBy", &["Age", "CountAll", "25,35"]).unwrap(),
            build("DropColumn", &["Name"]).unwrap(),
        ];
        let dataset = people();
        let previewed = preview(&dataset.schema(), &plan);
        let executed = execute(&dataset, &plan).unwrap().dataset.schema();
        assert_eq!(previewed, executed);
    }
}
