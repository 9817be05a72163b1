//! Round-based acquisition of transformations through a dialogue.
//!
//! - **answer**: option validation and rejection kinds
//! - **channel**: the dialogue channel trait plus scripted and transcript channels
//! - **builder**: the query builder state machine with its replay buffer
//! - **prefix**: resolving a flat answer prefix without a live channel

pub mod answer;
pub mod builder;
pub mod channel;
pub mod error;
pub mod options;
pub mod prefix;
pub mod state;

pub use answer::{AnswerMatching, Choice, InvalidAnswer, validate_choice, validate_freeform};
pub use builder::{QueryBuilder, VARIANT_PROMPT};
pub use channel::{DialogueChannel, ScriptedChannel, TranscriptChannel, TranscriptEntry};
pub use error::{QueryError, Result};
pub use options::QueryOptions;
pub use prefix::{PrefixReport, RejectedAnswer, resolve_prefix};
pub use state::{AnswerSource, QueryState, Question, RoundRecord, Step};
