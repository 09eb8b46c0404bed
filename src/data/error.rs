// ============================================================
// Layer 4 — Data Loading Errors
// ============================================================
// Every way a dataset file can fail to load. A malformed row is
// reported with its 0-based data-row index (header excluded,
// file order, before shuffling) and the offending column.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open dataset '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in '{}': {source}", path.display())]
    Csv {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset '{}' has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("row {row}, field '{field}': {reason}")]
    Parse {
        row:    usize,
        field:  String,
        reason: String,
    },
}

impl LoadError {
    pub fn parse(row: usize, field: &str, reason: impl Into<String>) -> Self {
        LoadError::Parse {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
