//! Tracked goal list operations.

use fintrack_shared::types::GoalId;
use rust_decimal::Decimal;

use super::error::GoalError;
use super::types::{CreateGoalInput, Goal, UpdateGoalInput};

const TITLE_LEN: std::ops::RangeInclusive<usize> = 3..=50;
const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 5..=255;

/// Goal service for business logic.
///
/// Operates on the user's goal list. No operation touches the balance.
pub struct GoalService;

impl GoalService {
    /// Adds a goal to the end of the list.
    ///
    /// # Errors
    ///
    /// Returns a validation error for the title, description or amounts.
    pub fn create(goals: &mut Vec<Goal>, input: CreateGoalInput) -> Result<Goal, GoalError> {
        let goal = Goal {
            id: GoalId::new(),
            title: validate_title(&input.title)?,
            description: input
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            target_amount: validate_amount("target_amount", input.target_amount)?,
            saved_amount: validate_amount("saved_amount", input.saved_amount)?,
            deadline: input.deadline,
            status: input.status,
        };
        goals.push(goal.clone());
        Ok(goal)
    }

    /// Returns the goal with the given id.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::NotFound` if no goal has this id.
    pub fn get(goals: &[Goal], id: GoalId) -> Result<&Goal, GoalError> {
        goals
            .iter()
            .find(|g| g.id == id)
            .ok_or(GoalError::NotFound(id))
    }

    /// Applies a patch to one goal.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPatch`, `NotFound` or a validation error; on error the
    /// goal is unchanged.
    pub fn update(
        goals: &mut [Goal],
        id: GoalId,
        patch: UpdateGoalInput,
    ) -> Result<Goal, GoalError> {
        if patch.is_empty() {
            return Err(GoalError::EmptyPatch);
        }
        let goal = goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(GoalError::NotFound(id))?;

        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        let target = patch
            .target_amount
            .map(|a| validate_amount("target_amount", a))
            .transpose()?;
        let saved = patch
            .saved_amount
            .map(|a| validate_amount("saved_amount", a))
            .transpose()?;

        if let Some(title) = title {
            goal.title = title;
        }
        if description.is_some() {
            goal.description = description;
        }
        if let Some(target) = target {
            goal.target_amount = target;
        }
        if let Some(saved) = saved {
            goal.saved_amount = saved;
        }
        if let Some(deadline) = patch.deadline {
            goal.deadline = deadline;
        }
        if let Some(status) = patch.status {
            goal.status = status;
        }
        Ok(goal.clone())
    }

    /// Removes a goal from the list.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::NotFound` if no goal has this id.
    pub fn delete(goals: &mut Vec<Goal>, id: GoalId) -> Result<Goal, GoalError> {
        let index = goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(GoalError::NotFound(id))?;
        Ok(goals.remove(index))
    }
}

fn validate_title(title: &str) -> Result<String, GoalError> {
    let title = title.trim();
    if !TITLE_LEN.contains(&title.chars().count()) {
        return Err(GoalError::InvalidTitle);
    }
    Ok(title.to_string())
}

fn validate_description(description: &str) -> Result<String, GoalError> {
    let description = description.trim();
    if !DESCRIPTION_LEN.contains(&description.chars().count()) {
        return Err(GoalError::InvalidDescription);
    }
    Ok(description.to_string())
}

fn validate_amount(field: &'static str, amount: Decimal) -> Result<Decimal, GoalError> {
    if amount < Decimal::ZERO {
        return Err(GoalError::NegativeAmount { field, amount });
    }
    Ok(amount)
}
