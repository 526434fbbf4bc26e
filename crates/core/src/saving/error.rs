//! Savings goal error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Savings goal errors.
#[derive(Debug, Error)]
pub enum SavingError {
    /// No goal exists for this user.
    #[error("Savings goal not found")]
    GoalNotFound,

    /// A goal already exists; only one is allowed.
    #[error("A savings goal already exists")]
    GoalAlreadyExists,

    /// Amount must be positive.
    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    /// Goal name is empty or too long.
    #[error("Goal name must be between 1 and 50 characters")]
    InvalidGoalName,

    /// Target amount is not acceptable.
    #[error("Invalid target amount: {0}")]
    InvalidTarget(String),

    /// Auto-saving percentage outside of the allowed range.
    #[error("Auto-saving percentage must be between 1 and 50, got {0}")]
    InvalidPercentage(u8),

    /// Enabling auto-saving without a percentage.
    #[error("A percentage is required to enable auto-saving")]
    PercentageRequired,

    /// Balance is lower than the requested deposit.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Current balance.
        available: Decimal,
        /// Requested amount.
        requested: Decimal,
    },

    /// Goal holds less than the requested withdrawal.
    #[error("Insufficient savings: available {available}, requested {requested}")]
    InsufficientSavings {
        /// Current saved amount.
        available: Decimal,
        /// Requested amount.
        requested: Decimal,
    },

    /// Goal already holds its target amount.
    #[error("Savings target already reached")]
    TargetReached,
}

impl SavingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::GoalNotFound => "GOAL_NOT_FOUND",
            Self::GoalAlreadyExists => "GOAL_ALREADY_EXISTS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidGoalName => "INVALID_GOAL_NAME",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::InvalidPercentage(_) => "INVALID_PERCENTAGE",
            Self::PercentageRequired => "PERCENTAGE_REQUIRED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InsufficientSavings { .. } => "INSUFFICIENT_SAVINGS",
            Self::TargetReached => "TARGET_REACHED",
        }
    }
}
