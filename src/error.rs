//! Error taxonomy for the report pipeline.
//!
//! Only `DataUnavailable` is fatal for a session. Per-row validation failures
//! are not errors at all; see [`crate::validator::RowRejection`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("dataset unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReportError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
