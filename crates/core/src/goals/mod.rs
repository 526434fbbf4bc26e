//! Tracked goals: a free-form list of targets with a manually kept saved amount.
//!
//! Unlike the savings goal, tracked goals never move money; they are records
//! the user keeps up to date.

pub mod error;
pub mod service;
pub mod types;


pub use error::GoalError;
pub use service::GoalService;
pub use types::{CreateGoalInput, Goal, GoalStatus, UpdateGoalInput};
