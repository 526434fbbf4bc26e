//! Ledger entries and the mutation engine.
//!
//! This module implements the core ledger functionality:
//! - Ledger entries (income and expense movements)
//! - Input types for creating and patching entries
//! - Shape validation
//! - Error types for every aggregate mutation
//! - The mutation engine (create, update, delete)

pub mod entry;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

pub use entry::{EntryType, LedgerEntry, SAVING_CATEGORY};
pub use error::LedgerError;
pub use service::{AUTO_SAVING_TITLE, EntryCreated, EntryRemoval, LedgerService};
pub use types::{EntryPatch, NewEntry};
pub use validation::{normalize_category, validate_new_entry, validate_patch};
