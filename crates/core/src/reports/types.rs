//! Read-side view types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::EntryType;

/// Field to sort entries by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Entry amount.
    Amount,
    /// Entry date.
    #[default]
    Date,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest or oldest first.
    Asc,
    /// Largest or newest first.
    #[default]
    Desc,
}

/// Filter and sort options for listing entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryQuery {
    /// Only this direction.
    #[serde(default, rename = "type")]
    pub entry_type: Option<EntryType>,
    /// Only this category (case-insensitive).
    #[serde(default)]
    pub category: Option<String>,
    /// Only transfer or only regular entries.
    #[serde(default)]
    pub is_savings_transfer: Option<bool>,
    /// Earliest date (inclusive).
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest date (inclusive).
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    /// Sort field, date by default.
    #[serde(default)]
    pub sort_by: SortKey,
    /// Sort direction, descending by default.
    #[serde(default)]
    pub order: SortOrder,
}

/// Income and expense sums of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Sum of income entries.
    pub income: Decimal,
    /// Sum of expense entries.
    pub expense: Decimal,
}

/// Twelve monthly buckets for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearChart {
    /// Calendar year.
    pub year: i32,
    /// Always twelve buckets, January first.
    pub months: Vec<MonthlyTotals>,
}

/// Date range and columns for the CSV rendering.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExportRange {
    /// Earliest date (inclusive).
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest date (inclusive).
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    /// Prefix every row with the entry id.
    #[serde(default)]
    pub with_ids: bool,
}
