//! Tracked goal error types.

use fintrack_shared::types::GoalId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Tracked goal errors.
#[derive(Debug, Error)]
pub enum GoalError {
    /// No goal with this id in the user's list.
    #[error("Goal not found: {0}")]
    NotFound(GoalId),

    /// Title outside 3 to 50 characters after trimming.
    #[error("Goal title must be between 3 and 50 characters")]
    InvalidTitle,

    /// Description outside 5 to 255 characters after trimming.
    #[error("Goal description must be between 5 and 255 characters")]
    InvalidDescription,

    /// Target or saved amount below zero.
    #[error("{field} cannot be negative: {amount}")]
    NegativeAmount {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        amount: Decimal,
    },

    /// Update without any field to change.
    #[error("Goal update must change at least one field")]
    EmptyPatch,
}

impl GoalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TRACKED_GOAL_NOT_FOUND",
            Self::InvalidTitle => "INVALID_GOAL_TITLE",
            Self::InvalidDescription => "INVALID_GOAL_DESCRIPTION",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::EmptyPatch => "EMPTY_PATCH",
        }
    }
}
