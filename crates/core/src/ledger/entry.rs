//! Ledger entry domain types.

use chrono::{DateTime, Utc};
use fintrack_shared::types::{EntryId, SavingId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category used by every savings transfer entry.
pub const SAVING_CATEGORY: &str = "saving";

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming in (adds to the balance).
    Income,
    /// Money going out (subtracts from the balance).
    Expense,
}

impl EntryType {
    /// Returns the lowercase name used on the wire and in CSV output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown entry type: {other}")),
        }
    }
}

/// One recorded income or expense movement.
///
/// `amount` is never negative; the sign of its balance effect comes from
/// `entry_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: EntryId,
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Lowercase category name.
    pub category: String,
    /// Amount as requested by the user.
    pub amount: Decimal,
    /// Short description.
    pub title: String,
    /// True for entries generated by savings movements.
    #[serde(default)]
    pub is_savings_transfer: bool,
    /// For auto-saving transfers, the income entry they were split from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_entry_id: Option<EntryId>,
    /// For savings transfers, the goal the money moved into or out of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_id: Option<SavingId>,
}

impl LedgerEntry {
    /// Returns the signed effect on the balance (positive for income, negative for expense).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Income => self.amount,
            EntryType::Expense => -self.amount,
        }
    }

    /// Builds a savings transfer entry.
    #[must_use]
    pub fn savings_transfer(
        entry_type: EntryType,
        amount: Decimal,
        date: DateTime<Utc>,
        title: impl Into<String>,
        saving_id: SavingId,
        source_entry_id: Option<EntryId>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            date,
            entry_type,
            category: SAVING_CATEGORY.to_string(),
            amount,
            title: title.into(),
            is_savings_transfer: true,
            source_entry_id,
            saving_id: Some(saving_id),
        }
    }

    /// Returns true if this entry was split from `parent` by auto-saving.
    #[must_use]
    pub fn is_transfer_of(&self, parent: EntryId) -> bool {
        self.is_savings_transfer && self.source_entry_id == Some(parent)
    }
}
