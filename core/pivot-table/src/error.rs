//! FILENAME: core/pivot-table/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Duplicate key among siblings: {key}")]
    DuplicateKey { key: String },

    #[error("Record {record} has no field '{field}'")]
    MissingField { field: String, record: usize },

    #[error("Record {record}: field '{field}' is not numeric ({value})")]
    NotNumeric {
        field: String,
        record: usize,
        value: String,
    },

    #[error("Field '{field}' does not hold a date ({value})")]
    NotADate { field: String, value: String },

    #[error("Unknown aggregation: {0}")]
    UnknownAggregation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PivotResult<T> = Result<T, PivotError>;
