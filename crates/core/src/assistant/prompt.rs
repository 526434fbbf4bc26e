//! System prompts for the generation service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::command::AssistantIntent;
use crate::budget::BudgetCategory;

/// One turn of the conversation forwarded to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `user`, `assistant` or `system`.
    pub role: String,
    /// Message text.
    pub content: String,
}

const FORMAT_RULES: &str = "\
- date (string): format \"2026-09-13T01:20\" (year-month-day-hour-minute); assume a time if none is given.
- type (string): either \"income\" or \"expense\".
- category (string): \"income\" for income; for expenses one of: ";

const ENTRY_FIELDS: &str = "\
- transactionAmount (number): the amount, e.g. 10 or 10.5; work it out if not stated.
- title (string): a descriptive title, neither generic nor invented, e.g. \"Groceries (chicken thighs)\".";

/// Builds the system prompt for `intent`.
///
/// `entries_csv` is the user's entries rendered with ids; it is only used for
/// update and delete.
#[must_use]
pub fn system_prompt(
    intent: AssistantIntent,
    now: DateTime<Utc>,
    entries_csv: Option<&str>,
) -> String {
    let now = now.format("%-d %B %Y %H:%M UTC");
    let categories = expense_categories();

    match intent {
        AssistantIntent::Create => format!(
            "You are a JSON generator. I describe my transactions and you answer with a plain-text \
             JSON array only, starting with [. Identify every transaction I mention and fill in \
             missing details. Each item has:\n{FORMAT_RULES}{categories}.\n{ENTRY_FIELDS}\n\
             It is currently {now}.\n\
             Example output: [{{\"date\": \"2026-09-12T19:00\", \"type\": \"expense\", \
             \"category\": \"food\", \"transactionAmount\": 20, \"title\": \"Groceries (chicken)\"}}]\n\
             If you do not understand, return []."
        ),
        AssistantIntent::Update => format!(
            "You are a JSON generator. I give you a CSV of my transactions and you answer with a \
             plain-text JSON array only, starting with [. Find the transactions I want to change by \
             their id in the CSV and return, for each:\n\
             - id (string): copied from the CSV.\n\
             Then only the fields I asked to change, using:\n{FORMAT_RULES}{categories}.\n\
             {ENTRY_FIELDS}\n\
             It is currently {now}.\n\
             If no transaction matches, return [].\n\n\
             My transactions (date is ddmmyy-hhmm):\n{csv}",
            csv = entries_csv.unwrap_or_default()
        ),
        AssistantIntent::Delete => format!(
            "You are a JSON generator. I give you a CSV of my transactions and you answer with a \
             plain-text JSON array only, starting with [. Find the transactions I want to delete \
             and return, for each:\n\
             - id (string): copied from the CSV.\n\
             - title (string): its title.\n\
             It is currently {now}.\n\
             If no transaction matches, return [].\n\n\
             My transactions (date is ddmmyy-hhmm):\n{csv}",
            csv = entries_csv.unwrap_or_default()
        ),
    }
}

fn expense_categories() -> String {
    BudgetCategory::ALL
        .iter()
        .filter(|c| **c != BudgetCategory::Saving)
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
