use serde::{Deserialize, Serialize};

/// Options for reading and writing delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Infer column types from the data; otherwise every column is `String`.
    pub infer_types: bool,
    /// Strip surrounding whitespace (and stray byte-order marks) from cells.
    pub trim_cells: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: true,
            trim_cells: true,
        }
    }
}

impl IngestOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }

    pub fn with_trim_cells(mut self, trim_cells: bool) -> Self {
        self.trim_cells = trim_cells;
        self
    }
}
