//! Budget error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::types::BudgetCategory;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// No budget exists for this user.
    #[error("Budget not found")]
    NotFound,

    /// A budget already exists; only one is allowed.
    #[error("A budget already exists")]
    AlreadyExists,

    /// Budget title is empty or too long.
    #[error("Budget title must be between 1 and 50 characters")]
    InvalidTitle,

    /// Window ends before it starts.
    #[error("Budget deadline {deadline} is before start date {start_date}")]
    InvalidWindow {
        /// Window start.
        start_date: DateTime<Utc>,
        /// Window end.
        deadline: DateTime<Utc>,
    },

    /// Category limit cannot be negative.
    #[error("Limit for category {0} cannot be negative")]
    NegativeLimit(BudgetCategory),
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound => "BUDGET_NOT_FOUND",
            Self::AlreadyExists => "BUDGET_ALREADY_EXISTS",
            Self::InvalidTitle => "INVALID_BUDGET_TITLE",
            Self::InvalidWindow { .. } => "INVALID_BUDGET_WINDOW",
            Self::NegativeLimit(_) => "NEGATIVE_LIMIT",
        }
    }
}
