//! Savings goal with auto-saving policy.

pub mod error;
pub mod goal;
pub mod service;

pub use error::SavingError;
pub use goal::{MAX_AUTO_SAVING_PERCENTAGE, MIN_AUTO_SAVING_PERCENTAGE, SavingsGoal};
pub use service::{AutoSavingToggle, GoalClosure, GoalPatch, NewGoal, SavingMovement, SavingService};
