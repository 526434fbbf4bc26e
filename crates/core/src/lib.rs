//! Core ledger logic for Fintrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every operation works on a [`account::UserAggregate`] held in memory; loading,
//! locking and saving it is the caller's job.
//!
//! # Modules
//!
//! - `account` - The per-user aggregate and profile rules
//! - `ledger` - Entry mutations that keep balance, budget and goal in step
//! - `saving` - Savings goal and auto-saving
//! - `budget` - Category limits and spend over a date window
//! - `goals` - Tracked goals kept as a plain list
//! - `reports` - Filtering, monthly chart, CSV rendering
//! - `assistant` - Parsing and applying natural-language entry commands

pub mod account;
pub mod assistant;
pub mod budget;
pub mod goals;
pub mod ledger;
pub mod reports;
pub mod saving;
