//! Savings goal state.

use chrono::{DateTime, Utc};
use fintrack_shared::types::SavingId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SavingError;
use crate::ledger::{EntryType, LedgerEntry};

/// Smallest auto-saving percentage that can be set.
pub const MIN_AUTO_SAVING_PERCENTAGE: u8 = 1;
/// Largest auto-saving percentage that can be set.
pub const MAX_AUTO_SAVING_PERCENTAGE: u8 = 50;

/// The user's single active savings target.
///
/// `current_amount` never exceeds `target_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// Identity of this goal; a replacement goal gets a new one.
    pub id: SavingId,
    /// Goal name.
    pub goal_name: String,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount saved so far.
    pub current_amount: Decimal,
    /// When the user wants to reach the target.
    pub target_date: DateTime<Utc>,
    /// Whether income is split automatically.
    pub is_auto_saving_enabled: bool,
    /// Share of each income moved into the goal, in percent.
    pub auto_saving_percentage: u8,
}

impl SavingsGoal {
    /// Creates a goal with nothing saved and auto-saving off.
    #[must_use]
    pub fn new(goal_name: String, target_amount: Decimal, target_date: DateTime<Utc>) -> Self {
        Self {
            id: SavingId::new(),
            goal_name,
            target_amount,
            current_amount: Decimal::ZERO,
            target_date,
            is_auto_saving_enabled: false,
            auto_saving_percentage: 0,
        }
    }

    /// Amount still missing to reach the target.
    #[must_use]
    pub fn shortfall(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    /// Returns true once the target has been reached.
    #[must_use]
    pub fn is_target_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Returns the percentage to split from income, if auto-saving applies.
    #[must_use]
    pub fn active_percentage(&self) -> Option<u8> {
        (self.is_auto_saving_enabled && self.auto_saving_percentage > 0)
            .then_some(self.auto_saving_percentage)
    }

    /// Computes how much of an income amount auto-saving moves into the goal.
    ///
    /// The share is rounded to cents and clamped to the shortfall. Returns
    /// zero when auto-saving is off.
    ///
    /// # Errors
    ///
    /// Returns `SavingError::TargetReached` if auto-saving is on and the goal
    /// is already complete.
    pub fn auto_saving_share(&self, income: Decimal) -> Result<Decimal, SavingError> {
        let Some(percentage) = self.active_percentage() else {
            return Ok(Decimal::ZERO);
        };
        if self.is_target_reached() {
            return Err(SavingError::TargetReached);
        }

        let share = (income * Decimal::from(percentage) / Decimal::ONE_HUNDRED).round_dp(2);
        Ok(share.min(self.shortfall()))
    }

    /// Adds to the saved amount.
    pub fn deposit(&mut self, amount: Decimal) {
        self.current_amount += amount;
    }

    /// Returns true if `transfer` moved money into this goal and the goal
    /// still holds all of it.
    #[must_use]
    pub fn can_reverse(&self, transfer: &LedgerEntry) -> bool {
        transfer.saving_id == Some(self.id)
            && transfer.entry_type == EntryType::Expense
            && self.current_amount >= transfer.amount
    }

    /// Net amount the given entries moved into this goal.
    #[must_use]
    pub fn transferred_total(&self, entries: &[LedgerEntry]) -> Decimal {
        entries
            .iter()
            .filter(|e| e.is_savings_transfer && e.saving_id == Some(self.id))
            .map(|e| -e.signed_amount())
            .sum()
    }

    /// Removes up to `amount` from the saved amount, stopping at zero.
    ///
    /// Returns the amount actually removed.
    pub fn release(&mut self, amount: Decimal) -> Decimal {
        let released = amount.min(self.current_amount);
        self.current_amount -= released;
        released
    }
}

/// Checks a percentage against the settable range.
///
/// # Errors
///
/// Returns `SavingError::InvalidPercentage` if out of range.
pub fn validate_percentage(percentage: u8) -> Result<u8, SavingError> {
    if (MIN_AUTO_SAVING_PERCENTAGE..=MAX_AUTO_SAVING_PERCENTAGE).contains(&percentage) {
        Ok(percentage)
    } else {
        Err(SavingError::InvalidPercentage(percentage))
    }
}
