//! Report error types.

use chrono::{DateTime, Utc};
use fintrack_shared::AppError;
use thiserror::Error;

/// Errors that can occur while building a view.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: DateTime<Utc>,
        /// End date.
        end: DateTime<Utc>,
    },

    /// Year outside of the supported range.
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// CSV writer failure.
    #[error("Failed to render CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidDateRange { .. } | ReportError::InvalidYear(_) => {
                Self::Validation(err.to_string())
            }
            ReportError::Csv(_) => Self::Internal(err.to_string()),
        }
    }
}
