//! Query states, questions and round records.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabq_transform::{RoundKind, TransformError, TransformKind, Transformation};

use crate::answer::InvalidAnswer;

/// Where the query builder currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryState {
    ChoosingVariant,
    ChoosingPrimaryTarget,
    ChoosingSecondaryArgument,
    ChoosingFreeformArgument,
    /// Terminal: Empty or a blank answer was chosen at the variant round.
    Finished,
}

impl QueryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryState::ChoosingVariant => "ChoosingVariant",
            QueryState::ChoosingPrimaryTarget => "ChoosingPrimaryTarget",
            QueryState::ChoosingSecondaryArgument => "ChoosingSecondaryArgument",
            QueryState::ChoosingFreeformArgument => "ChoosingFreeformArgument",
            QueryState::Finished => "Finished",
        }
    }
}

impl From<RoundKind> for QueryState {
    fn from(round: RoundKind) -> Self {
        match round {
            RoundKind::PrimaryTarget => QueryState::ChoosingPrimaryTarget,
            RoundKind::SecondaryArgument => QueryState::ChoosingSecondaryArgument,
            RoundKind::FreeformArgument => QueryState::ChoosingFreeformArgument,
        }
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an answer came from the replay buffer or from the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerSource {
    Replayed,
    Live,
}

/// The question the next answer must address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub state: QueryState,
    /// Variant under construction; `None` at the variant round.
    pub variant: Option<TransformKind>,
    pub prompt: String,
    /// Bounded options, or `None` for a freeform round.
    pub options: Option<Vec<String>>,
}

impl Question {
    /// Options to present; freeform rounds present none.
    pub fn presented_options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// One accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    /// Position of the transformation this answer belongs to.
    pub transformation: usize,
    pub state: QueryState,
    /// Canonical label (or freeform text) the answer resolved to.
    pub resolved: String,
    pub source: AnswerSource,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Answer accepted; more rounds remain for the pending transformation.
    Accepted { resolved: String },
    /// Answer completed a transformation, now appended to the committed list.
    Committed(Transformation),
    /// The query ended.
    Finished,
    /// Answer rejected; the same round repeats.
    Rejected(InvalidAnswer),
    /// The chosen variant has no legal target in the current schema.
    NoTargets(TransformKind),
    /// The completed answers were rejected by the registry; the last round repeats.
    Unbuildable(TransformError),
}

impl Step {
    /// Message for the answering party when the answer was not accepted.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            Step::Rejected(invalid) => Some(invalid.to_string()),
            Step::NoTargets(kind) => Some(format!("{kind} has no columns to choose from")),
            Step::Unbuildable(error) => Some(error.to_string()),
            Step::Accepted { .. } | Step::Committed(_) | Step::Finished => None,
        }
    }
}
