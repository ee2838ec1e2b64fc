use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading a games table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow conversion failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A cell that could not be interpreted for its column.
    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: {message}")]
    MalformedRow { row: usize, message: String },
}

impl LoadError {
    pub(crate) fn invalid(row: usize, column: &str, value: impl Into<String>) -> Self {
        LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }
}
