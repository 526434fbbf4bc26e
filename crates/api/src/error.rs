//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use fintrack_core::{
    assistant::AssistantError, budget::BudgetError, goals::GoalError, ledger::LedgerError,
    reports::ReportError, saving::SavingError,
};
use fintrack_shared::AppError;

/// Handler error rendered as `{ "error": <code>, "message": <text> }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl From<SavingError> for ApiError {
    fn from(err: SavingError) -> Self {
        Self(LedgerError::from(err).into())
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(LedgerError::from(err).into())
    }
}

impl From<GoalError> for ApiError {
    fn from(err: GoalError) -> Self {
        Self(LedgerError::from(err).into())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self(err.into())
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        Self(err.into())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
