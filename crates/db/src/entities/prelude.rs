//! `SeaORM` entity prelude.

pub use super::user_aggregates::Entity as UserAggregates;
