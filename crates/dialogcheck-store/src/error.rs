use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported table format for {0} (expected .csv or .parquet)")]
    UnsupportedFormat(PathBuf),

    #[error("missing required column {0:?}")]
    MissingColumn(String),

    #[error("conversation {conversation_id:?}, column {column:?}, row {row}: {detail}")]
    ContractViolation {
        conversation_id: String,
        column: String,
        row: usize,
        detail: String,
    },

    #[error("expected {expected} tag rows, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
