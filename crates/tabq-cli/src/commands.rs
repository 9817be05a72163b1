use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tabq_ingest::{IngestOptions, read_dataset, write_dataset};
use tabq_model::Dataset;
use tabq_query::{
    AnswerMatching, DialogueChannel, PrefixReport, QueryBuilder, QueryOptions, ScriptedChannel,
    TranscriptChannel, resolve_prefix,
};
use tabq_transform::{QueryPlan, execute};
use tracing::{info, info_span, trace};

use crate::cli::{ApplyArgs, InputArgs, QueryArgs, SuggestArgs};
use crate::console::ConsoleChannel;
use crate::logging::redact_value;
use crate::types::{DialogueStats, RunResult};

pub fn ingest_options(args: &InputArgs) -> Result<IngestOptions> {
    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }
    Ok(IngestOptions::default()
        .with_delimiter(args.delimiter as u8)
        .with_infer_types(!args.no_infer))
}

fn load(args: &InputArgs, options: &IngestOptions) -> Result<Dataset> {
    let dataset = read_dataset(&args.input, options)
        .with_context(|| format!("load {}", args.input.display()))?;
    for row in dataset.rows().iter().take(5) {
        trace!(row = redact_value(&row.join(",")), "sample row");
    }
    Ok(dataset)
}

fn query_options(index_only: bool, max_attempts: Option<usize>) -> QueryOptions {
    let mut options = QueryOptions::new();
    if index_only {
        options = options.with_matching(AnswerMatching::IndexOnly);
    }
    if let Some(attempts) = max_attempts {
        options = options.with_max_attempts(attempts);
    }
    options
}

/// Read a scripted answer file: one answer per line, blank lines included.
pub fn read_answers(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read answers: {}", path.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}

pub fn run_query(args: &QueryArgs) -> Result<RunResult> {
    let query_span = info_span!("query", input = %args.input.input.display());
    let _guard = query_span.enter();

    let ingest = ingest_options(&args.input)?;
    let dataset = load(&args.input, &ingest)?;
    let options = query_options(args.index_only, args.max_attempts);

    let (plan, stats) = match &args.answers {
        Some(path) => {
            let channel = ScriptedChannel::new(read_answers(path)?);
            run_dialogue(&dataset, options, &args.suggest, channel, args.show_transcript)?
        }
        None => run_dialogue(
            &dataset,
            options,
            &args.suggest,
            ConsoleChannel::stdio(),
            args.show_transcript,
        )?,
    };

    let execution = execute(&dataset, plan.steps()).context("execute plan")?;
    if let Some(path) = &args.plan_out {
        plan.save(path)
            .with_context(|| format!("save plan: {}", path.display()))?;
        info!(path = %path.display(), steps = plan.len(), "plan saved");
    }
    if let Some(path) = &args.output {
        write_dataset(&execution.dataset, path, &ingest)
            .with_context(|| format!("write output: {}", path.display()))?;
    }

    Ok(RunResult {
        input: args.input.input.clone(),
        dataset: execution.dataset,
        plan,
        steps: execution.steps,
        dialogue: Some(stats),
        plan_file: args.plan_out.clone(),
        output_file: args.output.clone(),
    })
}

/// Drive the dialogue against `dataset`'s schema until the query finishes.
pub fn run_dialogue<C: DialogueChannel>(
    dataset: &Dataset,
    options: QueryOptions,
    suggestions: &[String],
    channel: C,
    keep_transcript: bool,
) -> Result<(QueryPlan, DialogueStats)> {
    let mut channel = TranscriptChannel::new(channel);
    let mut builder = QueryBuilder::new(dataset.schema())
        .with_options(options)
        .with_replay(suggestions.iter().cloned());
    builder.run(&mut channel).context("query dialogue")?;

    let stats = DialogueStats {
        replayed_rounds: builder.replayed_rounds(),
        live_rounds: builder.live_rounds(),
        rejections: builder.rejections(),
        transcript: keep_transcript.then(|| channel.render()),
    };
    info!(
        steps = builder.committed().len(),
        replayed = stats.replayed_rounds,
        live = stats.live_rounds,
        "dialogue complete"
    );
    Ok((builder.into_plan(), stats))
}

pub fn run_apply(args: &ApplyArgs) -> Result<RunResult> {
    let apply_span = info_span!("apply", input = %args.input.input.display());
    let _guard = apply_span.enter();

    let ingest = ingest_options(&args.input)?;
    let dataset = load(&args.input, &ingest)?;
    let plan = QueryPlan::load(&args.plan)
        .with_context(|| format!("load plan: {}", args.plan.display()))?;
    let execution = execute(&dataset, plan.steps()).context("execute plan")?;
    if let Some(path) = &args.output {
        write_dataset(&execution.dataset, path, &ingest)
            .with_context(|| format!("write output: {}", path.display()))?;
    }

    Ok(RunResult {
        input: args.input.input.clone(),
        dataset: execution.dataset,
        plan,
        steps: execution.steps,
        dialogue: None,
        plan_file: Some(args.plan.clone()),
        output_file: args.output.clone(),
    })
}

pub fn run_suggest(args: &SuggestArgs) -> Result<PrefixReport> {
    let ingest = ingest_options(&args.input)?;
    let dataset = load(&args.input, &ingest)?;
    let report = resolve_prefix(
        &dataset.schema(),
        &args.tokens,
        &query_options(args.index_only, None),
    )
    .context("resolve prefix")?;
    Ok(report)
}
