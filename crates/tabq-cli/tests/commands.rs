//! Integration tests for the CLI commands.

use std::fs;
use std::path::Path;

use clap::Parser;
use insta::assert_snapshot;
use tabq_cli::cli::{Cli, Command};
use tabq_cli::commands::{run_apply, run_query, run_suggest};
use tabq_cli::summary::steps_table;

fn write_people(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("people.csv");
    fs::write(&path, "Name,Age,City\nJohn,35,Oslo\nJane,25,Bergen\nJim,41,Oslo\n")
        .expect("write input");
    path
}

fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(args).expect("parse args").command
}

#[test]
fn query_with_answer_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_people(dir.path());
    let answers = dir.path().join("answers.txt");
    fs::write(&answers, "FilterBy\nCity\nEquals\nOslo\nSortBy\nAge\nDescending\n\n")
        .expect("write answers");
    let plan_out = dir.path().join("plan.json");
    let output = dir.path().join("out.csv");

    let command = parse(&[
        "tabq",
        "query",
        input.to_str().expect("utf-8 path"),
        "--answers",
        answers.to_str().expect("utf-8 path"),
        "--plan-out",
        plan_out.to_str().expect("utf-8 path"),
        "--output",
        output.to_str().expect("utf-8 path"),
        "--show-transcript",
    ]);
    let Command::Query(args) = command else {
        panic!("expected query command");
    };
    let result = run_query(&args).expect("run query");

    assert_eq!(result.plan.len(), 2);
    assert_eq!(result.dataset.rows(), vec![vec!["Jim", "41", "Oslo"], vec!["John", "35", "Oslo"]]);
    let stats = result.dialogue.expect("dialogue stats");
    assert_eq!(stats.live_rounds, 8);
    assert!(stats.transcript.expect("transcript").contains("> Oslo"));

    let written = fs::read_to_string(&output).expect("read output");
    assert_snapshot!(written.replace('\n', "|"), @"Name,Age,City|Jim,41,Oslo|John,35,Oslo|");

    let command = parse(&[
        "tabq",
        "apply",
        input.to_str().expect("utf-8 path"),
        "--plan",
        plan_out.to_str().expect("utf-8 path"),
    ]);
    let Command::Apply(args) = command else {
        panic!("expected apply command");
    };
    let applied = run_apply(&args).expect("run apply");
    assert_eq!(applied.dataset, result.dataset);
}

#[test]
fn query_with_suggestions_and_index_answers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_people(dir.path());
    let answers = dir.path().join("answers.txt");
    fs::write(&answers, "9\n1\n0\n").expect("write answers");

    let command = parse(&[
        "tabq",
        "query",
        input.to_str().expect("utf-8 path"),
        "--suggest",
        "1",
        "--answers",
        answers.to_str().expect("utf-8 path"),
        "--index-only",
    ]);
    let Command::Query(args) = command else {
        panic!("expected query command");
    };
    let result = run_query(&args).expect("run query");
    assert_eq!(result.dataset.column_names(), vec!["Name", "City"]);
    let stats = result.dialogue.expect("dialogue stats");
    assert_eq!(stats.replayed_rounds, 1);
    assert_eq!(stats.rejections, 1);
    let rendered = steps_table(&result.steps).to_string();
    assert!(rendered.contains("DropColumn"));
}

#[test]
fn query_fails_when_answers_run_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_people(dir.path());
    let answers = dir.path().join("answers.txt");
    fs::write(&answers, "SortBy\nAge\n").expect("write answers");
    let command = parse(&[
        "tabq",
        "query",
        input.to_str().expect("utf-8 path"),
        "--answers",
        answers.to_str().expect("utf-8 path"),
    ]);
    let Command::Query(args) = command else {
        panic!("expected query command");
    };
    let error = run_query(&args).expect_err("script exhausted");
    assert!(format!("{error:#}").contains("answer script exhausted"));
}

#[test]
fn suggest_reports_next_question() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_people(dir.path());
    let command = parse(&[
        "tabq",
        "suggest",
        input.to_str().expect("utf-8 path"),
        "GroupBy",
        "City",
        "CountAll",
    ]);
    let Command::Suggest(args) = command else {
        panic!("expected suggest command");
    };
    let report = run_suggest(&args).expect("run suggest");
    let pending = report.pending.expect("pending question");
    assert_eq!(pending.options, None);
    assert_eq!(
        pending.prompt,
        "Write the comma-separated values of the column to keep as group keys"
    );
    assert_eq!(report.rounds_resolved, 3);
}

#[test]
fn non_ascii_delimiter_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_people(dir.path());
    let command = parse(&[
        "tabq",
        "suggest",
        input.to_str().expect("utf-8 path"),
        "--delimiter",
        "§",
    ]);
    let Command::Suggest(args) = command else {
        panic!("expected suggest command");
    };
    assert!(run_suggest(&args).is_err());
}
