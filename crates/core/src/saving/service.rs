//! Savings goal operations.
//!
//! Every movement between the balance and the goal is recorded as a savings
//! transfer entry, so the balance always matches the entry list.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SavingError;
use super::goal::{SavingsGoal, validate_percentage};
use crate::account::UserAggregate;
use crate::ledger::{EntryType, LedgerEntry};

const MAX_GOAL_NAME_LEN: usize = 50;

/// Input for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGoal {
    /// Goal name.
    pub goal_name: String,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// When the user wants to reach it.
    pub target_date: DateTime<Utc>,
}

/// Changes to an existing goal. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalPatch {
    /// New name.
    #[serde(default)]
    pub goal_name: Option<String>,
    /// New target.
    #[serde(default)]
    pub target_amount: Option<Decimal>,
    /// New target date.
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
}

/// Auto-saving switch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoSavingToggle {
    /// Turn auto-saving on or off.
    pub enabled: bool,
    /// Share of each income to save. Required when enabling.
    #[serde(default)]
    pub percentage: Option<u8>,
}

/// Result of a deposit into or withdrawal from the goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingMovement {
    /// Amount the caller asked for.
    pub requested: Decimal,
    /// Amount actually moved.
    pub transferred: Decimal,
    /// True if the deposit was reduced to the remaining shortfall.
    pub clamped: bool,
    /// Goal after the movement.
    pub goal: SavingsGoal,
    /// Transfer entry recorded for the movement.
    pub entry: LedgerEntry,
}

/// Result of closing a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalClosure {
    /// The removed goal.
    pub goal: SavingsGoal,
    /// Entry returning the saved amount to the balance, if anything was saved.
    pub refund: Option<LedgerEntry>,
}

/// Savings goal service.
pub struct SavingService;

impl SavingService {
    /// Creates the user's goal.
    ///
    /// # Errors
    ///
    /// Returns `SavingError::GoalAlreadyExists` if a goal exists, or a
    /// validation error for the name or target.
    pub fn create_goal(
        aggregate: &mut UserAggregate,
        input: NewGoal,
    ) -> Result<SavingsGoal, SavingError> {
        if aggregate.saving.is_some() {
            return Err(SavingError::GoalAlreadyExists);
        }
        let name = validate_goal_name(&input.goal_name)?;
        validate_target(input.target_amount, Decimal::ZERO)?;

        let goal = SavingsGoal::new(name, input.target_amount, input.target_date);
        aggregate.saving = Some(goal.clone());
        Ok(goal)
    }

    /// Updates name, target or target date.
    ///
    /// # Errors
    ///
    /// Returns `SavingError::GoalNotFound`, or `SavingError::InvalidTarget`
    /// if the new target is not positive or below the saved amount.
    pub fn update_goal(
        aggregate: &mut UserAggregate,
        patch: GoalPatch,
    ) -> Result<SavingsGoal, SavingError> {
        let goal = aggregate.saving.as_mut().ok_or(SavingError::GoalNotFound)?;

        let name = patch.goal_name.as_deref().map(validate_goal_name).transpose()?;
        if let Some(target) = patch.target_amount {
            validate_target(target, goal.current_amount)?;
        }

        if let Some(name) = name {
            goal.goal_name = name;
        }
        if let Some(target) = patch.target_amount {
            goal.target_amount = target;
        }
        if let Some(date) = patch.target_date {
            goal.target_date = date;
        }
        Ok(goal.clone())
    }

    /// Moves money from the balance into the goal.
    ///
    /// A deposit larger than the shortfall is reduced to the shortfall and
    /// reported as clamped.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound`, `InvalidAmount`, `InsufficientBalance` or
    /// `TargetReached`.
    pub fn add_money(
        aggregate: &mut UserAggregate,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<SavingMovement, SavingError> {
        let goal = aggregate.saving.as_ref().ok_or(SavingError::GoalNotFound)?;
        if amount <= Decimal::ZERO {
            return Err(SavingError::InvalidAmount(amount));
        }
        if aggregate.current_balance < amount {
            return Err(SavingError::InsufficientBalance {
                available: aggregate.current_balance,
                requested: amount,
            });
        }
        if goal.is_target_reached() {
            return Err(SavingError::TargetReached);
        }

        let transferred = amount.min(goal.shortfall());
        let entry = LedgerEntry::savings_transfer(
            EntryType::Expense,
            transferred,
            at,
            format!("Deposit to {}", goal.goal_name),
            goal.id,
            None,
        );
        aggregate.post(entry.clone());

        let goal = aggregate.saving.as_mut().ok_or(SavingError::GoalNotFound)?;
        goal.deposit(transferred);

        Ok(SavingMovement {
            requested: amount,
            transferred,
            clamped: transferred < amount,
            goal: goal.clone(),
            entry,
        })
    }

    /// Moves money from the goal back to the balance.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound`, `InvalidAmount` or `InsufficientSavings`.
    pub fn withdraw(
        aggregate: &mut UserAggregate,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<SavingMovement, SavingError> {
        let goal = aggregate.saving.as_ref().ok_or(SavingError::GoalNotFound)?;
        if amount <= Decimal::ZERO {
            return Err(SavingError::InvalidAmount(amount));
        }
        if amount > goal.current_amount {
            return Err(SavingError::InsufficientSavings {
                available: goal.current_amount,
                requested: amount,
            });
        }

        let entry = LedgerEntry::savings_transfer(
            EntryType::Income,
            amount,
            at,
            format!("Withdrawal from {}", goal.goal_name),
            goal.id,
            None,
        );
        aggregate.post(entry.clone());

        let goal = aggregate.saving.as_mut().ok_or(SavingError::GoalNotFound)?;
        goal.release(amount);

        Ok(SavingMovement {
            requested: amount,
            transferred: amount,
            clamped: false,
            goal: goal.clone(),
            entry,
        })
    }

    /// Turns auto-saving on or off.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound`, `PercentageRequired` when enabling without a
    /// percentage, or `InvalidPercentage` for any supplied value outside 1 to 50.
    pub fn toggle_auto_saving(
        aggregate: &mut UserAggregate,
        toggle: AutoSavingToggle,
    ) -> Result<SavingsGoal, SavingError> {
        let goal = aggregate.saving.as_mut().ok_or(SavingError::GoalNotFound)?;

        let percentage = toggle.percentage.map(validate_percentage).transpose()?;
        if toggle.enabled && percentage.is_none() {
            return Err(SavingError::PercentageRequired);
        }

        goal.is_auto_saving_enabled = toggle.enabled;
        if let Some(percentage) = percentage {
            goal.auto_saving_percentage = percentage;
        }
        Ok(goal.clone())
    }

    /// Removes the goal, returning any saved amount to the balance.
    ///
    /// # Errors
    ///
    /// Returns `SavingError::GoalNotFound` if no goal exists.
    pub fn delete_goal(
        aggregate: &mut UserAggregate,
        at: DateTime<Utc>,
    ) -> Result<GoalClosure, SavingError> {
        let goal = aggregate.saving.take().ok_or(SavingError::GoalNotFound)?;

        let refund = (goal.current_amount > Decimal::ZERO).then(|| {
            LedgerEntry::savings_transfer(
                EntryType::Income,
                goal.current_amount,
                at,
                format!("Closed goal {}", goal.goal_name),
                goal.id,
                None,
            )
        });
        if let Some(entry) = &refund {
            aggregate.post(entry.clone());
        }

        Ok(GoalClosure { goal, refund })
    }
}

fn validate_goal_name(name: &str) -> Result<String, SavingError> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_GOAL_NAME_LEN {
        return Err(SavingError::InvalidGoalName);
    }
    Ok(name.to_string())
}

fn validate_target(target: Decimal, saved: Decimal) -> Result<(), SavingError> {
    if target <= Decimal::ZERO {
        return Err(SavingError::InvalidTarget(
            "target amount must be greater than zero".to_string(),
        ));
    }
    if target < saved {
        return Err(SavingError::InvalidTarget(format!(
            "target amount {target} is below the saved amount {saved}"
        )));
    }
    Ok(())
}
