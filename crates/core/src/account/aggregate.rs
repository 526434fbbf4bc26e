//! The user aggregate: profile, balance, entries, goals and budget.

use chrono::{DateTime, Utc};
use fintrack_shared::types::{EntryId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::Budget;
use crate::goals::Goal;
use crate::ledger::{EntryType, LedgerEntry};
use crate::saving::SavingsGoal;

/// Everything a user owns, loaded and saved as one unit.
///
/// `current_balance` always equals `initial_balance` plus the signed amounts
/// of every entry in `entries`. Entries only enter and leave through
/// [`UserAggregate::post`] and [`UserAggregate::unpost`], which keep the
/// balance and budget spend in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAggregate {
    /// Owner of the aggregate.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Balance when the profile was created.
    pub initial_balance: Decimal,
    /// Running balance.
    pub current_balance: Decimal,
    /// All recorded entries, in insertion order.
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    /// Active savings goal.
    #[serde(default)]
    pub saving: Option<SavingsGoal>,
    /// Active budget.
    #[serde(default)]
    pub budget: Option<Budget>,
    /// Tracked goals, in creation order.
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserAggregate {
    /// Creates an empty aggregate with the given opening balance.
    #[must_use]
    pub fn new(id: UserId, name: String, email: String, initial_balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            initial_balance,
            current_balance: initial_balance,
            entries: Vec::new(),
            saving: None,
            budget: None,
            goals: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the entry with the given id.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns the auto-saving transfer split from `parent`, if any.
    #[must_use]
    pub fn linked_transfer(&self, parent: EntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.is_transfer_of(parent))
    }

    /// Records an entry and applies its effect to balance and budget.
    pub fn post(&mut self, entry: LedgerEntry) {
        self.apply_effect(&entry, Decimal::ONE);
        self.entries.push(entry);
    }

    /// Removes an entry and reverses its effect on balance and budget.
    pub fn unpost(&mut self, id: EntryId) -> Option<LedgerEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(index);
        self.apply_effect(&entry, Decimal::NEGATIVE_ONE);
        Some(entry)
    }

    /// Replaces a stored entry in place, reversing the old effect and
    /// applying the new one.
    ///
    /// Returns false if no entry has the replacement's id.
    pub fn repost(&mut self, replacement: LedgerEntry) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == replacement.id) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.entries[index], replacement.clone());
        self.apply_effect(&previous, Decimal::NEGATIVE_ONE);
        self.apply_effect(&replacement, Decimal::ONE);
        true
    }

    /// Sum of the signed amounts of all entries.
    #[must_use]
    pub fn entries_total(&self) -> Decimal {
        self.entries.iter().map(LedgerEntry::signed_amount).sum()
    }

    /// Returns true if `current_balance` agrees with the entry list.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.current_balance == self.initial_balance + self.entries_total()
    }

    /// Sets `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn apply_effect(&mut self, entry: &LedgerEntry, sign: Decimal) {
        self.current_balance += entry.signed_amount() * sign;
        if entry.entry_type != EntryType::Expense {
            return;
        }
        if let Some(budget) = self.budget.as_mut() {
            budget.apply_delta(&entry.category, entry.amount * sign, entry.date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    use crate::budget::BudgetCategory;

    fn aggregate() -> UserAggregate {
        UserAggregate::new(
            UserId::new(),
            "Ayu".to_string(),
            "ayu@example.com".to_string(),
            dec!(1000),
        )
    }

    fn entry(entry_type: EntryType, category: &str, amount: Decimal) -> LedgerEntry {
        LedgerEntry {
            id: EntryId::new(),
            date: Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap(),
            entry_type,
            category: category.to_string(),
            amount,
            title: "entry".to_string(),
            is_savings_transfer: false,
            source_entry_id: None,
            saving_id: None,
        }
    }

    #[test]
    fn test_post_and_unpost_keep_balance() {
        let mut agg = aggregate();
        let income = entry(EntryType::Income, "salary", dec!(500));
        let expense = entry(EntryType::Expense, "food", dec!(120));
        let expense_id = expense.id;

        agg.post(income);
        agg.post(expense);
        assert_eq!(agg.current_balance, dec!(1380));
        assert!(agg.is_balanced());

        let removed = agg.unpost(expense_id).unwrap();
        assert_eq!(removed.amount, dec!(120));
        assert_eq!(agg.current_balance, dec!(1500));
        assert!(agg.is_balanced());
        assert!(agg.unpost(expense_id).is_none());
    }

    #[test]
    fn test_post_tracks_budget_for_expenses_only() {
        let mut agg = aggregate();
        agg.budget = Some(Budget::new(
            "May".to_string(),
            Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 31, 23, 59, 59).unwrap(),
            &BTreeMap::new(),
        ));

        agg.post(entry(EntryType::Expense, "food", dec!(30)));
        agg.post(entry(EntryType::Income, "food", dec!(999)));

        let budget = agg.budget.as_ref().unwrap();
        assert_eq!(budget.spent(BudgetCategory::Food), dec!(30));
    }

    #[test]
    fn test_repost_swaps_effect() {
        let mut agg = aggregate();
        let original = entry(EntryType::Expense, "food", dec!(100));
        agg.post(original.clone());

        let replacement = LedgerEntry {
            entry_type: EntryType::Income,
            amount: dec!(40),
            ..original
        };
        assert!(agg.repost(replacement));
        assert_eq!(agg.current_balance, dec!(1040));
        assert!(agg.is_balanced());

        assert!(!agg.repost(entry(EntryType::Income, "gift", dec!(1))));
    }
}
