//! In-memory aggregate repository.
//!
//! Used by tests and by the server when no database is configured. Data is
//! lost on restart.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fintrack_core::account::UserAggregate;
use fintrack_shared::types::UserId;

use super::{StoreError, UserAggregateRepository, VersionedAggregate};

/// Aggregate repository keeping documents in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryUserAggregateRepository {
    rows: DashMap<UserId, VersionedAggregate>,
}

impl MemoryUserAggregateRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored aggregates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn email_taken(&self, email: &str, owner: UserId) -> bool {
        self.rows
            .iter()
            .any(|row| *row.key() != owner && row.aggregate.email == email)
    }
}

#[async_trait]
impl UserAggregateRepository for MemoryUserAggregateRepository {
    async fn load(&self, id: UserId) -> Result<Option<VersionedAggregate>, StoreError> {
        Ok(self.rows.get(&id).map(|row| row.clone()))
    }

    async fn insert(&self, aggregate: &UserAggregate) -> Result<(), StoreError> {
        if self.email_taken(&aggregate.email, aggregate.id) {
            return Err(StoreError::DuplicateEmail(aggregate.email.clone()));
        }

        match self.rows.entry(aggregate.id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(aggregate.id)),
            Entry::Vacant(slot) => {
                slot.insert(VersionedAggregate {
                    aggregate: aggregate.clone(),
                    version: 1,
                });
                Ok(())
            }
        }
    }

    async fn save(
        &self,
        aggregate: &UserAggregate,
        expected_version: i64,
    ) -> Result<i64, StoreError> {
        if self.email_taken(&aggregate.email, aggregate.id) {
            return Err(StoreError::DuplicateEmail(aggregate.email.clone()));
        }

        let mut row = self
            .rows
            .get_mut(&aggregate.id)
            .ok_or(StoreError::VersionConflict(aggregate.id))?;
        if row.version != expected_version {
            return Err(StoreError::VersionConflict(aggregate.id));
        }

        row.aggregate = aggregate.clone();
        row.version += 1;
        Ok(row.version)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.rows.remove(&id).is_some())
    }
}
