//! Application-wide error types.
//!
//! Every domain error is folded into one of these kinds before it reaches a
//! client, so callers can tell an invalid request apart from an unavailable
//! dependency.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Operation not allowed on this resource.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid argument.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate goal or budget).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not enough funds for the requested movement.
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// The savings goal is already complete.
    #[error("Target reached: {0}")]
    TargetReached(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::InsufficientBalance(_) | Self::TargetReached(_) => 422,
            Self::ExternalService(_) => 502,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "INVALID_ARGUMENT",
            Self::Conflict(_) => "CONFLICT",
            Self::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            Self::TargetReached(_) => "TARGET_REACHED",
            Self::Database(_) => "PERSISTENCE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message that is safe to show to a client.
    ///
    /// Database and internal failures are reported generically.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "An error occurred".to_string(),
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::InsufficientBalance(msg)
            | Self::TargetReached(msg)
            | Self::ExternalService(msg) => msg.clone(),
        }
    }

    /// Returns true if this is a server-side failure worth logging.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
