//! Budget lifecycle operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{Budget, BudgetCategory, BudgetPatch, NewBudget};
use crate::ledger::LedgerEntry;

const MAX_TITLE_LEN: usize = 50;

/// Budget service for business logic.
///
/// Operates on the user's budget slot; `entries` is the user's full entry
/// list, used to rescan spend whenever the window is set.
pub struct BudgetService;

impl BudgetService {
    /// Creates the budget and computes its spend from all existing entries.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AlreadyExists` if a budget exists, or a
    /// validation error for a bad title, window or limit.
    pub fn create(
        slot: &mut Option<Budget>,
        input: NewBudget,
        entries: &[LedgerEntry],
    ) -> Result<Budget, BudgetError> {
        if slot.is_some() {
            return Err(BudgetError::AlreadyExists);
        }

        let title = Self::validate_title(&input.title)?;
        Self::validate_window(input.start_date, input.deadline)?;
        Self::validate_limits(&input.categories)?;

        let mut budget = Budget::new(title, input.start_date, input.deadline, &input.categories);
        budget.recompute_spent(entries);

        *slot = Some(budget.clone());
        Ok(budget)
    }

    /// Applies a patch to the budget.
    ///
    /// Limit changes only recompute `limit_amount`; a window change rescans
    /// every category's spend.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if no budget exists, or a validation
    /// error; on error the budget is unchanged.
    pub fn update(
        slot: &mut Option<Budget>,
        patch: BudgetPatch,
        entries: &[LedgerEntry],
    ) -> Result<Budget, BudgetError> {
        let current = slot.as_ref().ok_or(BudgetError::NotFound)?;
        let mut budget = current.clone();

        if let Some(title) = &patch.title {
            budget.title = Self::validate_title(title)?;
        }

        if let Some(limits) = &patch.categories {
            Self::validate_limits(limits)?;
            for (category, limit) in limits {
                budget.categories.entry(*category).or_default().limit = *limit;
            }
            budget.recompute_limit();
        }

        if patch.changes_window() {
            budget.start_date = patch.start_date.unwrap_or(budget.start_date);
            budget.deadline = patch.deadline.unwrap_or(budget.deadline);
            Self::validate_window(budget.start_date, budget.deadline)?;
            budget.recompute_spent(entries);
        }

        *slot = Some(budget.clone());
        Ok(budget)
    }

    /// Removes the budget. Entries are not touched.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if no budget exists.
    pub fn delete(slot: &mut Option<Budget>) -> Result<Budget, BudgetError> {
        slot.take().ok_or(BudgetError::NotFound)
    }

    fn validate_title(title: &str) -> Result<String, BudgetError> {
        let title = title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
            return Err(BudgetError::InvalidTitle);
        }
        Ok(title.to_string())
    }

    fn validate_window(
        start_date: DateTime<Utc>,
        deadline: DateTime<Utc>,
    ) -> Result<(), BudgetError> {
        if deadline < start_date {
            return Err(BudgetError::InvalidWindow {
                start_date,
                deadline,
            });
        }
        Ok(())
    }

    fn validate_limits(limits: &BTreeMap<BudgetCategory, Decimal>) -> Result<(), BudgetError> {
        match limits.iter().find(|(_, limit)| **limit < Decimal::ZERO) {
            Some((category, _)) => Err(BudgetError::NegativeLimit(*category)),
            None => Ok(()),
        }
    }
}
