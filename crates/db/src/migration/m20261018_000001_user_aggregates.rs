//! Creates the user_aggregates table.
//!
//! Each row holds one user's whole ledger as a JSONB document. `version`
//! increases by one on every save and guards against lost updates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(USER_AGGREGATES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS user_aggregates CASCADE;")
            .await?;
        Ok(())
    }
}

const USER_AGGREGATES_SQL: &str = r"
CREATE TABLE user_aggregates (
    id UUID PRIMARY KEY,
    email VARCHAR(254) NOT NULL,
    version BIGINT NOT NULL DEFAULT 1,
    document JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_user_aggregates_email UNIQUE (email),
    CONSTRAINT chk_version_positive CHECK (version > 0)
);
";
