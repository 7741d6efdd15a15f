//! Table error types

use thiserror::Error;

/// Errors reading or writing item/price tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("{table} row {row} has {fields} fields, header has {expected}")]
    RowTooLong {
        table: &'static str,
        row: usize,
        fields: usize,
        expected: usize,
    },

    #[error("{table} row {index} is not an object")]
    NotARecord { table: &'static str, index: usize },
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
