//! Input types for ledger mutations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::EntryType;

/// Fields supplied when recording a new entry.
///
/// `is_savings_transfer` is deliberately absent: only the engine creates
/// transfer entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEntry {
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Category name, normalized to lowercase.
    pub category: String,
    /// Requested amount.
    pub amount: Decimal,
    /// Short description.
    pub title: String,
}

/// Fields that may change on an existing entry. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryPatch {
    /// New date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// New direction.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl EntryPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.entry_type.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.title.is_none()
    }
}
