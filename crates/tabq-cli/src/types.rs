use std::path::PathBuf;

use tabq_model::Dataset;
use tabq_transform::{QueryPlan, StepReport};

/// Outcome of `tabq query` or `tabq apply`.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub dataset: Dataset,
    pub plan: QueryPlan,
    pub steps: Vec<StepReport>,
    pub dialogue: Option<DialogueStats>,
    pub plan_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

/// Round counts for a dialogue-built plan.
#[derive(Debug, Clone, Default)]
pub struct DialogueStats {
    pub replayed_rounds: usize,
    pub live_rounds: usize,
    pub rejections: usize,
    pub transcript: Option<String>,
}
