//! Budget tracking over a date window.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{Budget, BudgetCategory, BudgetPatch, CategoryBudget, NewBudget};
