//! Loading delimited text into a [`Dataset`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tabq_model::{DataType, Dataset, Header, infer_data_type};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

fn normalize_header(raw: &str, ordinal: usize) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        format!("Column{}", ordinal + 1)
    } else {
        normalized
    }
}

fn normalize_cell(raw: &str, options: &IngestOptions) -> String {
    if options.trim_cells {
        raw.trim().trim_matches('\u{feff}').to_string()
    } else {
        raw.to_string()
    }
}

/// Read a delimited file. The first non-blank record is the header row.
///
/// # Errors
///
/// Fails when the file cannot be opened or parsed, has no header row, or
/// repeats a column name.
pub fn read_dataset(path: &Path, options: &IngestOptions) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset_from_reader(file, &path.display().to_string(), options)?;
    info!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Read delimited text from any reader. `source_name` labels errors.
pub fn read_dataset_from_reader<R: Read>(
    reader: R,
    source_name: &str,
    options: &IngestOptions,
) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        let row: Vec<String> = record
            .iter()
            .map(|value| normalize_cell(value, options))
            .collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }

    let Some((header_row, records)) = raw_rows.split_first() else {
        return Err(IngestError::Empty {
            source_name: source_name.to_string(),
        });
    };
    let names: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(ordinal, value)| normalize_header(value, ordinal))
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    let mut truncated = 0usize;
    for record in records {
        if record.len() > names.len() {
            truncated += 1;
        }
        let row: Vec<String> = (0..names.len())
            .map(|idx| record.get(idx).cloned().unwrap_or_default())
            .collect();
        rows.push(row);
    }
    if truncated > 0 {
        warn!(
            source = source_name,
            rows = truncated,
            "rows wider than the header were truncated"
        );
    }

    let headers: Vec<Header> = names
        .into_iter()
        .enumerate()
        .map(|(ordinal, name)| {
            let data_type = if options.infer_types {
                infer_data_type(rows.iter().map(|row| row[ordinal].as_str()))
            } else {
                DataType::String
            };
            debug!(column = %name, data_type = %data_type, "column type");
            Header::new(name, data_type, ordinal)
        })
        .collect();

    Dataset::from_rows(headers, &rows).map_err(|source| IngestError::Model {
        source_name: source_name.to_string(),
        source,
    })
}
