//! The round-based query builder.
//!
//! A [`QueryBuilder`] acquires one transformation at a time. Each round
//! presents a bounded option list (or asks for free text), validates one
//! answer and either advances, repeats the round, or commits the finished
//! transformation. Answers come from the replay buffer while it lasts and
//! from the dialogue channel afterwards.

use std::collections::VecDeque;

use tabq_model::Schema;
use tabq_transform::{QueryPlan, TransformKind, Transformation, build, candidate_for};
use tracing::{debug, debug_span, info, warn};

use crate::answer::{Choice, validate_choice, validate_freeform};
use crate::channel::DialogueChannel;
use crate::error::{QueryError, Result};
use crate::options::QueryOptions;
use crate::state::{AnswerSource, QueryState, Question, RoundRecord, Step};

/// Prompt of the top-level round.
pub const VARIANT_PROMPT: &str = "Choose next transformation";

/// Acquires, validates and commits transformations round by round.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    schema: Schema,
    options: QueryOptions,
    replay: VecDeque<String>,
    committed: Vec<Transformation>,
    pending: Option<TransformKind>,
    answers: Vec<String>,
    history: Vec<RoundRecord>,
    /// History length when the pending transformation's variant was chosen.
    pending_start: usize,
    attempts: usize,
    rejections: usize,
    /// Reason for the answer that exhausted the attempt limit.
    exhausted_reason: Option<String>,
    finished: bool,
}

impl QueryBuilder {
    /// Start a query against the initial schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            options: QueryOptions::default(),
            replay: VecDeque::new(),
            committed: Vec::new(),
            pending: None,
            answers: Vec::new(),
            history: Vec::new(),
            pending_start: 0,
            attempts: 0,
            rejections: 0,
            exhausted_reason: None,
            finished: false,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Queue pre-supplied answers, consumed before the channel is asked.
    pub fn with_replay<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replay.extend(answers.into_iter().map(Into::into));
        self
    }

    /// Schema after every committed transformation.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn committed(&self) -> &[Transformation] {
        &self.committed
    }

    pub fn into_plan(self) -> QueryPlan {
        QueryPlan::new(self.committed)
    }

    /// Accepted answers in order, including those of the pending transformation.
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Rounds resolved from the replay buffer.
    pub fn replayed_rounds(&self) -> usize {
        self.count_rounds(AnswerSource::Replayed)
    }

    /// Rounds resolved by asking the channel.
    pub fn live_rounds(&self) -> usize {
        self.count_rounds(AnswerSource::Live)
    }

    fn count_rounds(&self, source: AnswerSource) -> usize {
        self.history
            .iter()
            .filter(|record| record.source == source)
            .count()
    }

    /// Replay entries not yet consumed.
    pub fn pending_replay(&self) -> usize {
        self.replay.len()
    }

    /// Total rejected answers, live or replayed.
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn state(&self) -> QueryState {
        if self.finished {
            return QueryState::Finished;
        }
        self.pending
            .and_then(|kind| kind.next_round(self.answers.len(), self.argument()))
            .map_or(QueryState::ChoosingVariant, QueryState::from)
    }

    fn argument(&self) -> Option<&str> {
        self.answers.get(1).map(String::as_str)
    }

    /// The question the next answer must address, or `None` once finished.
    pub fn question(&self) -> Option<Question> {
        if self.finished {
            return None;
        }
        let Some(kind) = self.pending else {
            return Some(Question {
                state: QueryState::ChoosingVariant,
                variant: None,
                prompt: VARIANT_PROMPT.to_string(),
                options: Some(TransformKind::labels()),
            });
        };
        let round = kind.next_round(self.answers.len(), self.argument())?;
        Some(Question {
            state: round.into(),
            variant: Some(kind),
            prompt: kind.instruction(round).to_string(),
            options: kind.options_for(round, &self.schema),
        })
    }

    /// Validate one answer against the current round and advance.
    ///
    /// Rejections are returned as [`Step`] values and leave the round in
    /// place. Nothing is committed until every round of a transformation
    /// has been satisfied.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Finished`] once the query has ended
    /// - [`QueryError::AttemptsExhausted`] when the retry limit is exceeded;
    ///   the pending transformation is discarded
    pub fn submit(&mut self, answer: &str, source: AnswerSource) -> Result<Step> {
        let question = self.question().ok_or(QueryError::Finished)?;
        let span = debug_span!("round", state = %question.state, source = ?source);
        let _guard = span.enter();

        let resolved = match &question.options {
            Some(options) => match validate_choice(
                answer,
                options,
                self.options.matching,
                question.state == QueryState::ChoosingVariant,
            ) {
                Ok(Choice::Stop) => return Ok(self.finish(String::new(), source)),
                Ok(Choice::Option { label, .. }) => label,
                Err(invalid) => return self.reject(Step::Rejected(invalid), question.state),
            },
            None => match validate_freeform(answer) {
                Ok(text) => text,
                Err(invalid) => return self.reject(Step::Rejected(invalid), question.state),
            },
        };

        match self.pending {
            None => self.choose_variant(resolved, source),
            Some(kind) => self.accept_argument(kind, question.state, resolved, source),
        }
    }

    fn choose_variant(&mut self, label: String, source: AnswerSource) -> Result<Step> {
        let kind = candidate_for(&label)?;
        if kind == TransformKind::Empty {
            return Ok(self.finish(label, source));
        }
        if kind.legal_next_choices(&self.schema).is_empty() {
            return self.reject(Step::NoTargets(kind), QueryState::ChoosingVariant);
        }
        debug!(variant = %kind, "variant chosen");
        self.pending = Some(kind);
        self.answers.clear();
        self.attempts = 0;
        self.pending_start = self.history.len();
        self.record(QueryState::ChoosingVariant, label.clone(), source);
        Ok(Step::Accepted { resolved: label })
    }

    fn accept_argument(
        &mut self,
        kind: TransformKind,
        state: QueryState,
        resolved: String,
        source: AnswerSource,
    ) -> Result<Step> {
        self.answers.push(resolved.clone());
        self.record(state, resolved.clone(), source);
        if self.answers.len() < kind.total_rounds_needed(self.argument()) {
            self.attempts = 0;
            return Ok(Step::Accepted { resolved });
        }

        match build(kind.name(), self.answers.as_slice()) {
            Ok(transformation) => Ok(self.commit(transformation)),
            Err(error) if error.is_recoverable() => {
                self.answers.pop();
                self.history.pop();
                self.reject(Step::Unbuildable(error), state)
            }
            Err(error) => {
                self.discard_pending();
                Err(error.into())
            }
        }
    }

    fn commit(&mut self, transformation: Transformation) -> Step {
        self.schema = transformation.preview_schema(&self.schema);
        self.committed.push(transformation.clone());
        self.pending = None;
        self.answers.clear();
        self.attempts = 0;
        info!(
            variant = transformation.name(),
            committed = self.committed.len(),
            "transformation committed"
        );
        debug!(tokens = ?transformation.to_tokens(), "committed tokens");
        Step::Committed(transformation)
    }

    fn finish(&mut self, resolved: String, source: AnswerSource) -> Step {
        self.record(QueryState::ChoosingVariant, resolved, source);
        self.finished = true;
        self.attempts = 0;
        info!(committed = self.committed.len(), "query finished");
        Step::Finished
    }

    fn reject(&mut self, step: Step, state: QueryState) -> Result<Step> {
        self.attempts += 1;
        self.rejections += 1;
        if let Step::Rejected(invalid) = &step {
            warn!(state = %state, reason = invalid.as_str(), attempt = self.attempts, "answer rejected");
        } else {
            warn!(state = %state, attempt = self.attempts, "answer not usable");
        }
        match self.options.max_attempts_per_round {
            Some(limit) if self.attempts > limit => {
                let attempts = self.attempts;
                self.exhausted_reason = step.rejection_message();
                self.discard_pending();
                Err(QueryError::AttemptsExhausted { state, attempts })
            }
            _ => Ok(step),
        }
    }

    fn discard_pending(&mut self) {
        if self.pending.take().is_some() {
            self.history.truncate(self.pending_start);
        }
        self.answers.clear();
        self.attempts = 0;
    }

    fn record(&mut self, state: QueryState, resolved: String, source: AnswerSource) {
        self.history.push(RoundRecord {
            transformation: self.committed.len(),
            state,
            resolved,
            source,
        });
    }

    /// Acquire the next transformation.
    ///
    /// Returns `Ok(None)` when the query ends. Replayed answers are consumed
    /// first; once the buffer is empty the channel is asked. Rejected answers,
    /// replayed or live, are reported to the channel and the round repeats.
    ///
    /// # Errors
    ///
    /// Channel failures and [`QueryError::AttemptsExhausted`]. Neither leaves
    /// a partial transformation in the committed list.
    pub fn next_transformation<C: DialogueChannel>(
        &mut self,
        channel: &mut C,
    ) -> Result<Option<Transformation>> {
        while let Some(question) = self.question() {
            let (answer, source) = match self.replay.pop_front() {
                Some(entry) => (entry, AnswerSource::Replayed),
                None => {
                    channel.present_options(&question.prompt, question.presented_options())?;
                    (channel.read_answer()?, AnswerSource::Live)
                }
            };
            let step = match self.submit(&answer, source) {
                Ok(step) => step,
                Err(error) => {
                    if matches!(error, QueryError::AttemptsExhausted { .. })
                        && let Some(message) = self.exhausted_reason.take()
                    {
                        channel.report_error(&message)?;
                    }
                    return Err(error);
                }
            };
            if let Some(message) = step.rejection_message() {
                channel.report_error(&message)?;
            }
            match step {
                Step::Committed(transformation) => return Ok(Some(transformation)),
                Step::Finished => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Drive the dialogue to the end and return every committed transformation.
    pub fn run<C: DialogueChannel>(&mut self, channel: &mut C) -> Result<Vec<Transformation>> {
        while self.next_transformation(channel)?.is_some() {}
        Ok(self.committed.clone())
    }
}
