//! Repository abstractions for data access.
//!
//! A user's ledger is stored as one versioned document. Repositories only
//! load and save whole aggregates; every business rule runs in
//! `fintrack-core` before the save.

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserAggregateRepository;
pub use postgres::PgUserAggregateRepository;

use async_trait::async_trait;
use fintrack_core::account::UserAggregate;
use fintrack_core::ledger::LedgerError;
use fintrack_shared::types::UserId;
use sea_orm::DbErr;

/// Error types for aggregate storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored version moved since the aggregate was loaded.
    #[error("Version conflict for user {0}")]
    VersionConflict(UserId),

    /// A row for this user already exists.
    #[error("Aggregate already exists: {0}")]
    AlreadyExists(UserId),

    /// Another user already has this email.
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    /// The stored document does not match the aggregate shape.
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict(_) => Self::ConcurrentModification,
            StoreError::AlreadyExists(id) => Self::ProfileAlreadyExists(id),
            StoreError::DuplicateEmail(email) => Self::EmailTaken(email),
            StoreError::Serialization(e) => Self::Internal(e.to_string()),
            StoreError::Database(e) => Self::Persistence(e.to_string()),
        }
    }
}

/// An aggregate together with the version it was read at.
#[derive(Debug, Clone)]
pub struct VersionedAggregate {
    /// The user's ledger.
    pub aggregate: UserAggregate,
    /// Stored version, starting at 1.
    pub version: i64,
}

/// Storage for user aggregates with optimistic versioning.
#[async_trait]
pub trait UserAggregateRepository: Send + Sync {
    /// Loads the aggregate of `id`, if any.
    async fn load(&self, id: UserId) -> Result<Option<VersionedAggregate>, StoreError>;

    /// Stores a new aggregate at version 1.
    async fn insert(&self, aggregate: &UserAggregate) -> Result<(), StoreError>;

    /// Replaces the stored aggregate if its version is still
    /// `expected_version`, and returns the new version.
    async fn save(
        &self,
        aggregate: &UserAggregate,
        expected_version: i64,
    ) -> Result<i64, StoreError>;

    /// Removes the aggregate. Returns false if there was none.
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;
}
