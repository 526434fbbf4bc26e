//! PostgreSQL aggregate repository.

use async_trait::async_trait;
use fintrack_core::account::UserAggregate;
use fintrack_shared::types::UserId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use super::{StoreError, UserAggregateRepository, VersionedAggregate};
use crate::entities::user_aggregates;

/// Aggregate repository backed by the `user_aggregates` table.
#[derive(Debug, Clone)]
pub struct PgUserAggregateRepository {
    db: DatabaseConnection,
}

impl PgUserAggregateRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn unique_violation(err: DbErr, aggregate: &UserAggregate) -> StoreError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
                StoreError::DuplicateEmail(aggregate.email.clone())
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::AlreadyExists(aggregate.id),
            _ => StoreError::Database(err),
        }
    }
}

#[async_trait]
impl UserAggregateRepository for PgUserAggregateRepository {
    async fn load(&self, id: UserId) -> Result<Option<VersionedAggregate>, StoreError> {
        let Some(row) = user_aggregates::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let aggregate: UserAggregate = serde_json::from_value(row.document)?;
        Ok(Some(VersionedAggregate {
            aggregate,
            version: row.version,
        }))
    }

    async fn insert(&self, aggregate: &UserAggregate) -> Result<(), StoreError> {
        let document = serde_json::to_value(aggregate)?;

        let row = user_aggregates::ActiveModel {
            id: Set(aggregate.id.into_inner()),
            email: Set(aggregate.email.clone()),
            version: Set(1),
            document: Set(document),
            created_at: Set(aggregate.created_at.into()),
            updated_at: Set(aggregate.updated_at.into()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| Self::unique_violation(e, aggregate))?;

        tracing::debug!(user_id = %aggregate.id, "Inserted aggregate");
        Ok(())
    }

    async fn save(
        &self,
        aggregate: &UserAggregate,
        expected_version: i64,
    ) -> Result<i64, StoreError> {
        let document = serde_json::to_value(aggregate)?;

        let result = user_aggregates::Entity::update_many()
            .col_expr(user_aggregates::Column::Document, Expr::value(document))
            .col_expr(
                user_aggregates::Column::Email,
                Expr::value(aggregate.email.clone()),
            )
            .col_expr(
                user_aggregates::Column::Version,
                Expr::col(user_aggregates::Column::Version).add(1),
            )
            .col_expr(
                user_aggregates::Column::UpdatedAt,
                Expr::value(aggregate.updated_at),
            )
            .filter(user_aggregates::Column::Id.eq(aggregate.id.into_inner()))
            .filter(user_aggregates::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| Self::unique_violation(e, aggregate))?;

        if result.rows_affected == 0 {
            return Err(StoreError::VersionConflict(aggregate.id));
        }

        Ok(expected_version + 1)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let result = user_aggregates::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
