//! Writing a [`Dataset`] back out as delimited text.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tabq_model::Dataset;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

/// Write `dataset` to `path`, header row first.
pub fn write_dataset(dataset: &Dataset, path: &Path, options: &IngestOptions) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_dataset_to_writer(dataset, file, &path.display().to_string(), options)?;
    info!(
        path = %path.display(),
        rows = dataset.row_count(),
        "dataset written"
    );
    Ok(())
}

/// Write `dataset` to any writer. `target_name` labels errors.
pub fn write_dataset_to_writer<W: Write>(
    dataset: &Dataset,
    writer: W,
    target_name: &str,
    options: &IngestOptions,
) -> Result<()> {
    let csv_error = |source: csv::Error| IngestError::Csv {
        source_name: target_name.to_string(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);
    writer
        .write_record(dataset.column_names())
        .map_err(csv_error)?;
    for row in dataset.rows() {
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| IngestError::Csv {
        source_name: target_name.to_string(),
        source: source.into(),
    })
}

/// Render `dataset` as delimited text in memory.
pub fn dataset_to_string(dataset: &Dataset, options: &IngestOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_dataset_to_writer(dataset, &mut buffer, "buffer", options)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
