//! Budget data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{EntryType, LedgerEntry};

/// The fixed set of categories a budget tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    /// Rent, repairs, furniture.
    Household,
    /// Clothes and general shopping.
    Shopping,
    /// Groceries and eating out.
    Food,
    /// Power, water, internet.
    Utilities,
    /// Fuel, fares, parking.
    Transportation,
    /// Transfers into the savings goal.
    Saving,
    /// Everything else.
    Others,
}

impl BudgetCategory {
    /// Every budget category, in display order.
    pub const ALL: [Self; 7] = [
        Self::Household,
        Self::Shopping,
        Self::Food,
        Self::Utilities,
        Self::Transportation,
        Self::Saving,
        Self::Others,
    ];

    /// Returns the lowercase category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Shopping => "shopping",
            Self::Food => "food",
            Self::Utilities => "utilities",
            Self::Transportation => "transportation",
            Self::Saving => "saving",
            Self::Others => "others",
        }
    }

    /// Looks up a category by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limit and running spend of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Planned maximum spend.
    pub limit: Decimal,
    /// Expenses recorded inside the budget window.
    pub spent: Decimal,
}

/// A date-bounded spending plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget title.
    pub title: String,
    /// Window start (inclusive).
    pub start_date: DateTime<Utc>,
    /// Window end (inclusive).
    pub deadline: DateTime<Utc>,
    /// Sum of all category limits.
    pub limit_amount: Decimal,
    /// Per-category limit and spend. Always holds every category.
    pub categories: BTreeMap<BudgetCategory, CategoryBudget>,
}

impl Budget {
    /// Builds a budget with the given limits and zero spend.
    ///
    /// Categories missing from `limits` get a limit of zero.
    #[must_use]
    pub fn new(
        title: String,
        start_date: DateTime<Utc>,
        deadline: DateTime<Utc>,
        limits: &BTreeMap<BudgetCategory, Decimal>,
    ) -> Self {
        let categories = BudgetCategory::ALL
            .into_iter()
            .map(|category| {
                let limit = limits.get(&category).copied().unwrap_or(Decimal::ZERO);
                (
                    category,
                    CategoryBudget {
                        limit,
                        spent: Decimal::ZERO,
                    },
                )
            })
            .collect();

        let mut budget = Self {
            title,
            start_date,
            deadline,
            limit_amount: Decimal::ZERO,
            categories,
        };
        budget.recompute_limit();
        budget
    }

    /// Returns true if `date` falls in `[start_date, deadline]`.
    #[must_use]
    pub fn covers(&self, date: DateTime<Utc>) -> bool {
        self.start_date <= date && date <= self.deadline
    }

    /// Adjusts the spend of `category` by `signed_amount` if `date` is in the window.
    ///
    /// Unknown categories and out-of-window dates are ignored. Returns true
    /// when the budget changed.
    pub fn apply_delta(
        &mut self,
        category: &str,
        signed_amount: Decimal,
        date: DateTime<Utc>,
    ) -> bool {
        if !self.covers(date) {
            return false;
        }
        let Some(slot) = BudgetCategory::from_name(category)
            .and_then(|category| self.categories.get_mut(&category))
        else {
            return false;
        };
        slot.spent += signed_amount;
        true
    }

    /// Resets every category's spend and re-accumulates it from `entries`.
    pub fn recompute_spent(&mut self, entries: &[LedgerEntry]) {
        for slot in self.categories.values_mut() {
            slot.spent = Decimal::ZERO;
        }
        for entry in entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Expense)
        {
            self.apply_delta(&entry.category, entry.amount, entry.date);
        }
    }

    /// Recomputes `limit_amount` as the sum of category limits.
    pub fn recompute_limit(&mut self) {
        self.limit_amount = self.categories.values().map(|c| c.limit).sum();
    }

    /// Returns the recorded spend for a category.
    #[must_use]
    pub fn spent(&self, category: BudgetCategory) -> Decimal {
        self.categories
            .get(&category)
            .map_or(Decimal::ZERO, |c| c.spent)
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewBudget {
    /// Budget title.
    pub title: String,
    /// Window start.
    pub start_date: DateTime<Utc>,
    /// Window end.
    pub deadline: DateTime<Utc>,
    /// Limits per category. Missing categories default to zero.
    #[serde(default)]
    pub categories: BTreeMap<BudgetCategory, Decimal>,
}

/// Changes to an existing budget. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New window start.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// New window end.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// New limits for the listed categories.
    #[serde(default)]
    pub categories: Option<BTreeMap<BudgetCategory, Decimal>>,
}

impl BudgetPatch {
    /// Returns true if the window moves.
    #[must_use]
    pub fn changes_window(&self) -> bool {
        self.start_date.is_some() || self.deadline.is_some()
    }
}
