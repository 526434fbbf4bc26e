//! Tracked goal data types.

use chrono::{DateTime, Utc};
use fintrack_shared::types::GoalId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Progress state the user assigns to a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    /// Still being worked towards.
    Ongoing,
    /// Reached.
    Achieved,
    /// Given up or missed.
    Failed,
}

/// One entry in the user's goal list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal identity.
    pub id: GoalId,
    /// Short title.
    pub title: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount the user wants to reach.
    pub target_amount: Decimal,
    /// Amount the user reports as saved so far.
    pub saved_amount: Decimal,
    /// Date the goal should be reached by.
    pub deadline: DateTime<Utc>,
    /// Current status.
    pub status: GoalStatus,
}

/// Input for adding a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGoalInput {
    /// Goal title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount already saved.
    pub saved_amount: Decimal,
    /// Target date.
    pub deadline: DateTime<Utc>,
    /// Starting status.
    pub status: GoalStatus,
}

/// Changes to a goal. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateGoalInput {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New target amount.
    #[serde(default)]
    pub target_amount: Option<Decimal>,
    /// New saved amount.
    #[serde(default)]
    pub saved_amount: Option<Decimal>,
    /// New target date.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// New status.
    #[serde(default)]
    pub status: Option<GoalStatus>,
}

impl UpdateGoalInput {
    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.target_amount.is_none()
            && self.saved_amount.is_none()
            && self.deadline.is_none()
            && self.status.is_none()
    }
}
