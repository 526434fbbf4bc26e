//! Pure projections over a user's entries.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{EntryQuery, ExportRange, MonthlyTotals, SortKey, SortOrder, YearChart};
use crate::ledger::{EntryType, LedgerEntry};

/// Date format of the CSV rendering, e.g. `050326-1430`.
pub const CSV_DATE_FORMAT: &str = "%d%m%y-%H%M";

const CSV_HEADER: [&str; 5] = [
    "date(ddmmyy-hhmm)",
    "type",
    "category",
    "title",
    "transaction amount",
];

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 9999;

/// Service for read-side views.
pub struct ReportService;

impl ReportService {
    /// Filters and sorts entries.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from` is after `to`.
    pub fn list_entries(
        entries: &[LedgerEntry],
        query: &EntryQuery,
    ) -> Result<Vec<LedgerEntry>, ReportError> {
        Self::check_range(query.from, query.to)?;
        let category = query.category.as_deref().map(|c| c.trim().to_lowercase());

        let mut selected: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| query.entry_type.is_none_or(|t| e.entry_type == t))
            .filter(|e| category.as_deref().is_none_or(|c| e.category == c))
            .filter(|e| {
                query
                    .is_savings_transfer
                    .is_none_or(|flag| e.is_savings_transfer == flag)
            })
            .filter(|e| in_range(e.date, query.from, query.to))
            .cloned()
            .collect();

        selected.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortKey::Amount => a.amount.cmp(&b.amount),
                SortKey::Date => a.date.cmp(&b.date),
            };
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(selected)
    }

    /// Sums income and expense per month of `year`.
    ///
    /// All twelve months are present; months without entries are zero.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidYear` outside 1970 to 9999.
    pub fn chart_data(entries: &[LedgerEntry], year: i32) -> Result<YearChart, ReportError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ReportError::InvalidYear(year));
        }

        let mut months: Vec<MonthlyTotals> = (1..=12)
            .map(|month| MonthlyTotals {
                month,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            })
            .collect();

        for entry in entries.iter().filter(|e| e.date.year() == year) {
            let bucket = &mut months[entry.date.month0() as usize];
            match entry.entry_type {
                EntryType::Income => bucket.income += entry.amount,
                EntryType::Expense => bucket.expense += entry.amount,
            }
        }

        Ok(YearChart { year, months })
    }

    /// Returns every year that has at least one entry, ascending.
    #[must_use]
    pub fn distinct_years(entries: &[LedgerEntry]) -> Vec<i32> {
        entries
            .iter()
            .map(|e| e.date.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Renders entries in the range as CSV, oldest first.
    ///
    /// Columns: date, type, category, title, amount; with `with_ids` an `id`
    /// column comes first.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from` is after `to`, or
    /// `ReportError::Csv` if writing fails.
    pub fn render_csv(entries: &[LedgerEntry], range: &ExportRange) -> Result<String, ReportError> {
        Self::check_range(range.from, range.to)?;

        let mut selected: Vec<&LedgerEntry> = entries
            .iter()
            .filter(|e| in_range(e.date, range.from, range.to))
            .collect();
        selected.sort_by_key(|e| e.date);

        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<&str> = Vec::with_capacity(CSV_HEADER.len() + 1);
        if range.with_ids {
            header.push("id");
        }
        header.extend(CSV_HEADER);
        writer.write_record(&header)?;

        for entry in selected {
            let mut row: Vec<String> = Vec::with_capacity(header.len());
            if range.with_ids {
                row.push(entry.id.to_string());
            }
            row.push(entry.date.format(CSV_DATE_FORMAT).to_string());
            row.push(entry.entry_type.as_str().to_string());
            row.push(entry.category.clone());
            row.push(entry.title.clone());
            row.push(entry.amount.to_string());
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ReportError::Csv(e.to_string()))
    }

    fn check_range(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<(), ReportError> {
        match (from, to) {
            (Some(start), Some(end)) if start > end => {
                Err(ReportError::InvalidDateRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

fn in_range(date: DateTime<Utc>, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
}
