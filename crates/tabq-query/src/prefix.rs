//! Resolving a flat answer prefix without a live channel.
//!
//! Given the answers supplied so far, report what they commit, which of them
//! were rejected, and what the next answer must address. A front end can use
//! this to resume a dialogue or to offer the next options to a suggester.

use serde::Serialize;
use tabq_model::Schema;
use tabq_transform::Transformation;

use crate::answer::InvalidAnswer;
use crate::builder::QueryBuilder;
use crate::error::{QueryError, Result};
use crate::options::QueryOptions;
use crate::state::{AnswerSource, Question, Step};

/// A prefix entry that did not advance the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedAnswer {
    /// Zero-based position in the prefix.
    pub position: usize,
    pub answer: String,
    /// Set when the answer failed option validation.
    pub invalid: Option<InvalidAnswer>,
    pub message: String,
}

/// Outcome of replaying a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixReport {
    /// Token lines of the transformations the prefix completed.
    pub committed: Vec<Vec<String>>,
    /// Accepted prefix entries.
    pub rounds_resolved: usize,
    pub rejected: Vec<RejectedAnswer>,
    /// Entries after the query ended, left unread.
    pub ignored: usize,
    pub finished: bool,
    /// What the next answer must address, unless the query ended.
    pub pending: Option<Question>,
    /// Label or text the last accepted entry resolved to.
    pub last_resolved: Option<String>,
}

/// Replay `prefix` against `schema`, validating each entry as a live answer.
///
/// # Errors
///
/// Registry failures that cannot be fixed by another answer. Exceeding the
/// retry limit is reported as a rejection and the query carries on.
pub fn resolve_prefix<S: AsRef<str>>(
    schema: &Schema,
    prefix: &[S],
    options: &QueryOptions,
) -> Result<PrefixReport> {
    let mut builder = QueryBuilder::new(schema.clone()).with_options(options.clone());
    let mut rejected = Vec::new();
    let mut ignored = 0;
    let mut last_resolved = None;

    for (position, entry) in prefix.iter().enumerate() {
        let answer = entry.as_ref();
        if builder.is_finished() {
            ignored = prefix.len() - position;
            break;
        }
        let before = builder.history().len();
        match builder.submit(answer, AnswerSource::Replayed) {
            Ok(step) => match step.rejection_message() {
                Some(message) => rejected.push(RejectedAnswer {
                    position,
                    answer: answer.to_string(),
                    invalid: match step {
                        Step::Rejected(invalid) => Some(invalid),
                        _ => None,
                    },
                    message,
                }),
                None => {
                    if builder.history().len() > before {
                        last_resolved = builder
                            .history()
                            .last()
                            .map(|record| record.resolved.clone());
                    }
                }
            },
            Err(error @ QueryError::AttemptsExhausted { .. }) => rejected.push(RejectedAnswer {
                position,
                answer: answer.to_string(),
                invalid: None,
                message: error.to_string(),
            }),
            Err(error) => return Err(error),
        }
    }

    Ok(PrefixReport {
        committed: builder
            .committed()
            .iter()
            .map(Transformation::to_tokens)
            .collect(),
        rounds_resolved: builder.replayed_rounds(),
        rejected,
        ignored,
        finished: builder.is_finished(),
        pending: builder.question(),
        last_resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::QueryState;
    use tabq_model::{DataType, Header};

    fn schema() -> Schema {
        Schema::from_headers([
            Header::new("Name", DataType::String, 0),
            Header::new("Age", DataType::Number, 1),
        ])
    }

    #[test]
    fn test_partial_prefix_reports_pending_question() {
        let report =
            resolve_prefix(&schema(), &["SortBy", "1"], &QueryOptions::default()).unwrap();
        assert!(report.committed.is_empty());
        assert_eq!(report.rounds_resolved, 2);
        assert_eq!(report.last_resolved.as_deref(), Some("Age"));
        let pending = report.pending.unwrap();
        assert_eq!(pending.state, QueryState::ChoosingSecondaryArgument);
        assert_eq!(
            pending.options,
            Some(vec!["Ascending".to_string(), "Descending".to_string()])
        );
    }

    #[test]
    fn test_stale_entries_are_rejected() {
        let report = resolve_prefix(
            &schema(),
            &["DropColumn", "Salary", "7", "Age", ""],
            &QueryOptions::default(),
        )
        .unwrap();
        assert_eq!(report.committed, vec![vec!["DropColumn", "Age"]]);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].invalid, Some(InvalidAnswer::NotInOptions));
        assert_eq!(report.rejected[1].invalid, Some(InvalidAnswer::OutOfRange));
        assert!(report.finished);
        assert!(report.pending.is_none());
    }

    #[test]
    fn test_entries_after_finish_are_ignored() {
        let report = resolve_prefix(
            &schema(),
            &["Empty", "SortBy", "Age"],
            &QueryOptions::default(),
        )
        .unwrap();
        assert!(report.finished);
        assert_eq!(report.ignored, 2);
        assert_eq!(report.rounds_resolved, 1);
    }
}
