//! Read-side views over a user's entries.
//!
//! This module provides pure projections with no mutation:
//! - Filtered and sorted entry lists
//! - Monthly income/expense chart data
//! - Distinct entry years
//! - CSV rendering for the assistant context

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::{CSV_DATE_FORMAT, ReportService};
pub use types::*;
