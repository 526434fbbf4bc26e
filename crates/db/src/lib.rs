//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Versioned aggregate repositories (PostgreSQL and in-memory)
//! - The ledger unit of work that serializes writes per user
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod unit_of_work;

pub use repositories::{
    MemoryUserAggregateRepository, PgUserAggregateRepository, StoreError,
    UserAggregateRepository, VersionedAggregate,
};
pub use unit_of_work::{DEFAULT_MAX_CONFLICT_RETRIES, LedgerUnitOfWork};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection pool with explicit bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
