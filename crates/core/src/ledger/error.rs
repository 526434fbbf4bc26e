//! Ledger error types for validation and state errors.
//!
//! `LedgerError` is the error of every mutation on a user aggregate. Savings
//! and budget failures are wrapped so a single operation can surface either.

use fintrack_shared::AppError;
use fintrack_shared::types::{EntryId, UserId};
use thiserror::Error;

use crate::budget::BudgetError;
use crate::goals::GoalError;
use crate::saving::SavingError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A field failed a shape check.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Update request without any field to change.
    #[error("Update must change at least one field")]
    EmptyPatch,

    // ========== Lookup Errors ==========
    /// User aggregate not found.
    #[error("Profile not found: {0}")]
    ProfileNotFound(UserId),

    /// Profile already exists for this user.
    #[error("Profile already exists: {0}")]
    ProfileAlreadyExists(UserId),

    /// Another profile already uses this email.
    #[error("Email already in use: {0}")]
    EmailTaken(String),

    /// Entry not found.
    #[error("Transaction not found: {0}")]
    EntryNotFound(EntryId),

    // ========== Entry State Errors ==========
    /// Savings transfer entries are only changed by savings operations.
    #[error("Transaction {0} is a savings transfer and cannot be modified directly")]
    SavingsTransferLocked(EntryId),

    /// Entry has an auto-saving transfer whose amount depends on it.
    #[error("Transaction {0} has a linked savings transfer; its type and amount cannot change")]
    LinkedTransferLocked(EntryId),

    /// The goal that received this entry's auto-saving share no longer holds it.
    #[error("Transaction {0} cannot be deleted: its auto-saved share was already withdrawn or refunded")]
    LinkedTransferSpent(EntryId),

    // ========== Related Aggregates ==========
    /// Savings goal failure.
    #[error(transparent)]
    Saving(#[from] SavingError),

    /// Budget failure.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Tracked goal failure.
    #[error(transparent)]
    Goals(#[from] GoalError),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Persistence Errors ==========
    /// Storage failure.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Shorthand for a field validation failure.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => "INVALID_ARGUMENT",
            Self::EmptyPatch => "EMPTY_PATCH",
            Self::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            Self::ProfileAlreadyExists(_) => "PROFILE_ALREADY_EXISTS",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::EntryNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::SavingsTransferLocked(_) => "SAVINGS_TRANSFER_LOCKED",
            Self::LinkedTransferLocked(_) => "LINKED_TRANSFER_LOCKED",
            Self::LinkedTransferSpent(_) => "LINKED_TRANSFER_SPENT",
            Self::Saving(e) => e.error_code(),
            Self::Budget(e) => e.error_code(),
            Self::Goals(e) => e.error_code(),
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::InvalidField { .. } | LedgerError::EmptyPatch => Self::Validation(message),
            LedgerError::ProfileNotFound(_) | LedgerError::EntryNotFound(_) => {
                Self::NotFound(message)
            }
            LedgerError::ProfileAlreadyExists(_)
            | LedgerError::EmailTaken(_)
            | LedgerError::LinkedTransferLocked(_)
            | LedgerError::LinkedTransferSpent(_)
            | LedgerError::ConcurrentModification => Self::Conflict(message),
            LedgerError::SavingsTransferLocked(_) => Self::Forbidden(message),
            LedgerError::Saving(e) => match e {
                SavingError::GoalNotFound => Self::NotFound(message),
                SavingError::GoalAlreadyExists => Self::Conflict(message),
                SavingError::InvalidAmount(_)
                | SavingError::InvalidGoalName
                | SavingError::InvalidTarget(_)
                | SavingError::InvalidPercentage(_)
                | SavingError::PercentageRequired => Self::Validation(message),
                SavingError::InsufficientBalance { .. }
                | SavingError::InsufficientSavings { .. } => Self::InsufficientBalance(message),
                SavingError::TargetReached => Self::TargetReached(message),
            },
            LedgerError::Budget(e) => match e {
                BudgetError::NotFound => Self::NotFound(message),
                BudgetError::AlreadyExists => Self::Conflict(message),
                BudgetError::InvalidTitle
                | BudgetError::InvalidWindow { .. }
                | BudgetError::NegativeLimit(_) => Self::Validation(message),
            },
            LedgerError::Goals(e) => match e {
                GoalError::NotFound(_) => Self::NotFound(message),
                GoalError::InvalidTitle
                | GoalError::InvalidDescription
                | GoalError::NegativeAmount { .. }
                | GoalError::EmptyPatch => Self::Validation(message),
            },
            LedgerError::Persistence(_) => Self::Database(message),
            LedgerError::Internal(_) => Self::Internal(message),
        }
    }
}
