//! Serialized, all-or-nothing mutation of user aggregates.
//!
//! Every write for a user goes through [`LedgerUnitOfWork::mutate`]:
//!
//! 1. Take the user's in-process lock.
//! 2. Load the aggregate and its version.
//! 3. Run the operation against a working copy.
//! 4. Save the copy only if the operation succeeded and the version is
//!    unchanged; on a version conflict, start over from step 2.
//!
//! The lock orders writers within one process. The version check catches
//! writers in other processes sharing the same database.

use std::sync::Arc;

use dashmap::DashMap;
use fintrack_core::account::UserAggregate;
use fintrack_core::ledger::LedgerError;
use fintrack_shared::types::UserId;
use tokio::sync::Mutex;

use crate::repositories::UserAggregateRepository;

/// Default number of extra attempts after a version conflict.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Runs ledger operations against stored aggregates.
#[derive(Clone)]
pub struct LedgerUnitOfWork {
    repo: Arc<dyn UserAggregateRepository>,
    locks: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
    max_conflict_retries: u32,
}

impl std::fmt::Debug for LedgerUnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerUnitOfWork")
            .field("locked_users", &self.locks.len())
            .field("max_conflict_retries", &self.max_conflict_retries)
            .finish_non_exhaustive()
    }
}

impl LedgerUnitOfWork {
    /// Creates a unit of work over `repo`.
    #[must_use]
    pub fn new(repo: Arc<dyn UserAggregateRepository>, max_conflict_retries: u32) -> Self {
        Self {
            repo,
            locks: Arc::new(DashMap::new()),
            max_conflict_retries,
        }
    }

    fn lock_for(&self, user_id: UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Loads a user's aggregate for reading.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ProfileNotFound` if the user has no aggregate.
    pub async fn read(&self, user_id: UserId) -> Result<UserAggregate, LedgerError> {
        self.repo
            .load(user_id)
            .await?
            .map(|stored| stored.aggregate)
            .ok_or(LedgerError::ProfileNotFound(user_id))
    }

    /// Stores a freshly opened aggregate.
    ///
    /// # Errors
    ///
    /// Returns `ProfileAlreadyExists` or `EmailTaken` on duplicates.
    pub async fn create(&self, aggregate: UserAggregate) -> Result<UserAggregate, LedgerError> {
        let lock = self.lock_for(aggregate.id);
        let _guard = lock.lock().await;

        self.repo.insert(&aggregate).await?;
        tracing::info!(user_id = %aggregate.id, "Profile created");
        Ok(aggregate)
    }

    /// Runs `op` against the user's aggregate and saves the result.
    ///
    /// `op` may run more than once if another writer saves in between; it
    /// must not have side effects outside the aggregate. If it fails, the
    /// stored aggregate is untouched and its error is returned as is.
    ///
    /// # Errors
    ///
    /// Returns the error of `op`, `ProfileNotFound`, a persistence error, or
    /// `ConcurrentModification` once the retries are used up.
    pub async fn mutate<T, E, F>(&self, user_id: UserId, mut op: F) -> Result<T, E>
    where
        F: FnMut(&mut UserAggregate) -> Result<T, E> + Send,
        T: Send,
        E: From<LedgerError> + Send,
    {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        let mut attempt = 0;
        loop {
            let stored = self
                .repo
                .load(user_id)
                .await
                .map_err(LedgerError::from)?
                .ok_or(LedgerError::ProfileNotFound(user_id))?;

            let mut draft = stored.aggregate;
            let output = op(&mut draft)?;
            draft.touch();

            let err = match self.repo.save(&draft, stored.version).await {
                Ok(version) => {
                    tracing::debug!(user_id = %user_id, version, "Aggregate saved");
                    return Ok(output);
                }
                Err(e) => LedgerError::from(e),
            };

            if !err.is_retryable() {
                tracing::error!(user_id = %user_id, error = %err, "Failed to save aggregate");
                return Err(err.into());
            }
            if attempt >= self.max_conflict_retries {
                tracing::warn!(user_id = %user_id, "Version conflict, giving up");
                return Err(err.into());
            }
            attempt += 1;
            tracing::warn!(user_id = %user_id, attempt, "Version conflict, retrying");
        }
    }

    /// Deletes a user's aggregate.
    ///
    /// # Errors
    ///
    /// Returns `ProfileNotFound` if there was nothing to delete.
    pub async fn remove(&self, user_id: UserId) -> Result<(), LedgerError> {
        // Keep the lock entry; queued writers still hold this mutex.
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        let removed = self.repo.delete(user_id).await?;

        if removed {
            tracing::info!(user_id = %user_id, "Profile deleted");
            Ok(())
        } else {
            Err(LedgerError::ProfileNotFound(user_id))
        }
    }
}
