//! Assistant error types.

use fintrack_shared::AppError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors raised while turning an assistant reply into ledger mutations.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The generation service could not be reached or answered with an error.
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    /// The reply is not a JSON array of the expected shape.
    #[error("Assistant reply could not be parsed: {0}")]
    MalformedReply(String),

    /// One command in the reply carries an unusable value.
    #[error("Assistant command {index} is invalid: {reason}")]
    InvalidCommand {
        /// Position of the command in the reply.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Applying a command failed; nothing was applied.
    #[error("Assistant command {index} was rejected: {source}")]
    CommandRejected {
        /// Position of the command in the reply.
        index: usize,
        /// Ledger failure.
        #[source]
        source: LedgerError,
    },

    /// Loading or saving the aggregate failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl AssistantError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "ASSISTANT_UNAVAILABLE",
            Self::MalformedReply(_) => "ASSISTANT_MALFORMED_REPLY",
            Self::InvalidCommand { .. } => "ASSISTANT_INVALID_COMMAND",
            Self::CommandRejected { source, .. } | Self::Ledger(source) => source.error_code(),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Unavailable(_)
            | AssistantError::MalformedReply(_)
            | AssistantError::InvalidCommand { .. } => Self::ExternalService(err.to_string()),
            AssistantError::CommandRejected { source, .. } | AssistantError::Ledger(source) => {
                source.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_shared::types::EntryId;

    #[test]
    fn test_service_failures_are_external() {
        let err = AppError::from(AssistantError::Unavailable("timeout".into()));
        assert_eq!(err.status_code(), 502);

        let err = AppError::from(AssistantError::MalformedReply("not json".into()));
        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[test]
    fn test_rejected_command_keeps_ledger_kind() {
        let err = AssistantError::CommandRejected {
            index: 1,
            source: LedgerError::SavingsTransferLocked(EntryId::new()),
        };
        assert_eq!(err.error_code(), "SAVINGS_TRANSFER_LOCKED");
        assert_eq!(AppError::from(err).status_code(), 403);
    }
}
