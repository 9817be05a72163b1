//! CLI argument definitions for tabq.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabq",
    version,
    about = "Build and run tabular transformations through a question/answer dialogue",
    long_about = "Build and run tabular transformations through a question/answer dialogue.\n\n\
                  Each transformation (drop, sort, group, filter) is chosen from a\n\
                  numbered menu one argument at a time, then the finished plan is\n\
                  executed against a delimited text file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell contents and answers in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a plan through the dialogue, then run it.
    Query(QueryArgs),

    /// Run a saved plan without a dialogue.
    Apply(ApplyArgs),

    /// Replay an answer prefix and print what the next answer must address.
    Suggest(SuggestArgs),

    /// List the transformation variants.
    Variants,
}

/// Options shared by every command that reads a dataset.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Delimited text file to load.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Field delimiter (a single ASCII character).
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: char,

    /// Keep every column as text instead of inferring types.
    #[arg(long = "no-infer")]
    pub no_infer: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Pre-supplied answer, consumed before asking (repeatable).
    #[arg(long = "suggest", value_name = "TOKEN")]
    pub suggest: Vec<String>,

    /// Read answers from a file, one per line, instead of the terminal.
    #[arg(long = "answers", value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Accept option numbers only, not labels.
    #[arg(long = "index-only")]
    pub index_only: bool,

    /// Give up on a transformation after this many rejected answers in a round.
    #[arg(long = "max-attempts", value_name = "N")]
    pub max_attempts: Option<usize>,

    /// Save the committed plan as JSON.
    #[arg(long = "plan-out", value_name = "FILE")]
    pub plan_out: Option<PathBuf>,

    /// Write the resulting dataset to a file.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print every question, answer and error after the dialogue.
    #[arg(long = "show-transcript")]
    pub show_transcript: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Plan file written by `tabq query --plan-out`.
    #[arg(long = "plan", value_name = "FILE")]
    pub plan: PathBuf,

    /// Write the resulting dataset to a file.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Answers given so far, in order.
    #[arg(value_name = "TOKEN", allow_hyphen_values = true)]
    pub tokens: Vec<String>,

    /// Accept option numbers only, not labels.
    #[arg(long = "index-only")]
    pub index_only: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
