//! Delimited-text loading and writing for tabq datasets.

pub mod error;
pub mod options;
pub mod reader;
pub mod writer;

pub use error::{IngestError, Result};
pub use options::IngestOptions;
pub use reader::{read_dataset, read_dataset_from_reader};
pub use writer::{dataset_to_string, write_dataset, write_dataset_to_writer};
