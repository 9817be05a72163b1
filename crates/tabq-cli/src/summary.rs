use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabq_model::Dataset;
use tabq_query::VARIANT_PROMPT;
use tabq_transform::{RoundKind, StepReport, TransformKind};

use crate::types::RunResult;

/// Rows printed before the dataset table is cut off.
pub const MAX_PREVIEW_ROWS: usize = 50;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    if let Some(path) = &result.plan_file {
        println!("Plan: {}", path.display());
    }
    if let Some(path) = &result.output_file {
        println!("Output: {}", path.display());
    }
    if let Some(stats) = &result.dialogue {
        if let Some(transcript) = &stats.transcript {
            println!("Transcript:");
            print!("{transcript}");
        }
        println!(
            "Rounds: {} replayed, {} answered, {} rejected",
            stats.replayed_rounds, stats.live_rounds, stats.rejections
        );
    }
    if !result.steps.is_empty() {
        println!("{}", steps_table(&result.steps));
    }
    println!("{}", dataset_table(&result.dataset, MAX_PREVIEW_ROWS));
    let hidden = result.dataset.row_count().saturating_sub(MAX_PREVIEW_ROWS);
    if hidden > 0 {
        println!("... {hidden} more row(s)");
    }
}

pub fn print_variants() {
    println!("{}", variants_table());
}

pub fn dataset_table(dataset: &Dataset, max_rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        dataset
            .fields()
            .iter()
            .map(|field| header_cell(&format!("{} ({})", field.name(), field.header.data_type)))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in dataset.rows().into_iter().take(max_rows) {
        table.add_row(row);
    }
    table
}

pub fn steps_table(steps: &[StepReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Transformation"),
        header_cell("Arguments"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for step in steps {
        let arguments = step.tokens.get(1..).unwrap_or_default().join(", ");
        table.add_row(vec![
            Cell::new(step.index + 1),
            Cell::new(step.variant.name()).fg(Color::Green),
            if arguments.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(arguments)
            },
            change_cell(step.rows_before, step.rows_after),
            change_cell(step.columns_before, step.columns_after),
        ]);
    }
    table
}

pub fn variants_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Variant"),
        header_cell("Rounds"),
        header_cell("First question"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for kind in TransformKind::ALL {
        let question = if kind == TransformKind::Empty {
            dim_cell(format!("ends the query (\"{VARIANT_PROMPT}\")"))
        } else {
            Cell::new(kind.instruction(RoundKind::PrimaryTarget))
        };
        table.add_row(vec![
            Cell::new(kind.index()),
            Cell::new(kind.name()),
            Cell::new(kind.total_rounds_needed(None)),
            question,
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn change_cell(before: usize, after: usize) -> Cell {
    if before == after {
        dim_cell(after)
    } else {
        Cell::new(format!("{before} -> {after}")).fg(Color::Yellow)
    }
}
