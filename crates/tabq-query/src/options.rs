//! Query builder configuration.

use serde::{Deserialize, Serialize};

use crate::answer::AnswerMatching;

/// Options controlling answer matching and retry limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// How bounded-round answers are matched against the options.
    pub matching: AnswerMatching,
    /// Rejected answers tolerated per round before the pending
    /// transformation is abandoned. `None` retries forever.
    pub max_attempts_per_round: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matching(mut self, matching: AnswerMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts_per_round = Some(attempts);
        self
    }
}
