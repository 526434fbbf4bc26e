//! Typed commands parsed from an assistant reply.
//!
//! The generation service answers with plain text that should hold a JSON
//! array of entries. Every item is parsed and validated here, before any of
//! them reaches the ledger.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use fintrack_shared::types::EntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AssistantError;
use crate::ledger::{
    EntryPatch, EntryType, LedgerError, NewEntry, validate_new_entry, validate_patch,
};

/// Minute-precision date format the assistant is asked to produce.
pub const ASSISTANT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// What the user asked the assistant to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantIntent {
    /// Record new entries.
    Create,
    /// Change existing entries.
    Update,
    /// Remove existing entries.
    Delete,
}

impl AssistantIntent {
    /// Returns true if the prompt needs the user's entries with ids.
    #[must_use]
    pub const fn needs_entries(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

/// A validated ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AssistantCommand {
    /// Record an entry.
    Create(NewEntry),
    /// Change an entry.
    Update {
        /// Entry to change.
        id: EntryId,
        /// Fields to change.
        patch: EntryPatch,
    },
    /// Remove an entry.
    Delete {
        /// Entry to remove.
        id: EntryId,
    },
}

/// One item of the reply array as the assistant writes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, rename = "type")]
    entry_type: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "amount")]
    transaction_amount: Option<ReplyAmount>,
    #[serde(default)]
    title: Option<String>,
}

/// Amounts arrive as JSON numbers or as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyAmount {
    Number(serde_json::Number),
    Text(String),
}

impl ReplyAmount {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            Self::Text(s) => Decimal::from_str(s.trim()).ok(),
        }
    }
}

/// Parses and validates an assistant reply for the given intent.
///
/// An empty array yields no commands.
///
/// # Errors
///
/// Returns `AssistantError::MalformedReply` if no JSON array can be read from
/// the text, or `AssistantError::InvalidCommand` for the first item that is
/// missing a field or fails validation.
pub fn parse_reply(
    intent: AssistantIntent,
    reply: &str,
) -> Result<Vec<AssistantCommand>, AssistantError> {
    let json = extract_array(reply)
        .ok_or_else(|| AssistantError::MalformedReply("no JSON array in reply".to_string()))?;
    let items: Vec<ReplyItem> = serde_json::from_str(json)
        .map_err(|e| AssistantError::MalformedReply(e.to_string()))?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            to_command(intent, item).map_err(|reason| AssistantError::InvalidCommand {
                index,
                reason,
            })
        })
        .collect()
}

/// Finds the outermost `[...]` in the text, skipping code fences or prose.
fn extract_array(reply: &str) -> Option<&str> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    (start < end).then(|| &reply[start..=end])
}

fn to_command(intent: AssistantIntent, item: ReplyItem) -> Result<AssistantCommand, String> {
    match intent {
        AssistantIntent::Create => {
            let input = NewEntry {
                date: parse_date(&required(item.date, "date")?)?,
                entry_type: parse_type(&required(item.entry_type, "type")?)?,
                category: required(item.category, "category")?,
                amount: parse_amount(
                    item.transaction_amount
                        .as_ref()
                        .ok_or_else(|| missing("transactionAmount"))?,
                )?,
                title: required(item.title, "title")?,
            };
            let input = validate_new_entry(input).map_err(|e| describe(&e))?;
            Ok(AssistantCommand::Create(input))
        }
        AssistantIntent::Update => {
            let id = parse_id(&required(item.id, "id")?)?;
            let patch = EntryPatch {
                date: item.date.as_deref().map(parse_date).transpose()?,
                entry_type: item.entry_type.as_deref().map(parse_type).transpose()?,
                category: item.category,
                amount: item.transaction_amount.as_ref().map(parse_amount).transpose()?,
                title: item.title,
            };
            let patch = validate_patch(patch).map_err(|e| describe(&e))?;
            Ok(AssistantCommand::Update { id, patch })
        }
        AssistantIntent::Delete => {
            let id = parse_id(&required(item.id, "id")?)?;
            Ok(AssistantCommand::Delete { id })
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    value.ok_or_else(|| missing(field))
}

fn missing(field: &str) -> String {
    format!("missing field `{field}`")
}

fn describe(err: &LedgerError) -> String {
    err.to_string()
}

fn parse_id(raw: &str) -> Result<EntryId, String> {
    Uuid::parse_str(raw.trim())
        .map(EntryId::from_uuid)
        .map_err(|_| format!("invalid id `{raw}`"))
}

fn parse_type(raw: &str) -> Result<EntryType, String> {
    raw.parse::<EntryType>()
        .map_err(|_| format!("invalid type `{raw}`"))
}

fn parse_amount(raw: &ReplyAmount) -> Result<Decimal, String> {
    raw.to_decimal()
        .ok_or_else(|| "invalid transactionAmount".to_string())
}

/// Accepts `YYYY-MM-DDTHH:MM` (read as UTC) or RFC 3339.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, ASSISTANT_DATE_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| format!("invalid date `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_create_reply() {
        let reply = r#"[
            {"date": "2026-03-05T09:15", "type": "Expense", "category": "Food",
             "transactionAmount": 12.5, "title": "Lunch with team"},
            {"date": "2026-03-06T18:00:00Z", "type": "income", "category": "salary",
             "transactionAmount": "2500", "title": "March pay"}
        ]"#;
        let commands = parse_reply(AssistantIntent::Create, reply).unwrap();

        assert_eq!(commands.len(), 2);
        let AssistantCommand::Create(first) = &commands[0] else {
            panic!("expected create");
        };
        assert_eq!(first.entry_type, EntryType::Expense);
        assert_eq!(first.category, "food");
        assert_eq!(first.amount, dec!(12.5));
        assert_eq!(first.date, Utc.with_ymd_and_hms(2026, 3, 5, 9, 15, 0).unwrap());

        let AssistantCommand::Create(second) = &commands[1] else {
            panic!("expected create");
        };
        assert_eq!(second.amount, dec!(2500));
    }

    #[test]
    fn test_parse_skips_surrounding_text() {
        let reply = "Here you go:\n```json\n[{\"id\": \"0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b\"}]\n```";
        let commands = parse_reply(AssistantIntent::Delete, reply).unwrap();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], AssistantCommand::Delete { .. }));
    }

    #[test]
    fn test_empty_array_is_no_op() {
        assert!(parse_reply(AssistantIntent::Create, "[]").unwrap().is_empty());
    }

    #[test]
    fn test_non_json_reply_is_malformed() {
        assert!(matches!(
            parse_reply(AssistantIntent::Create, "Sorry, I cannot help with that."),
            Err(AssistantError::MalformedReply(_))
        ));
        assert!(matches!(
            parse_reply(AssistantIntent::Create, "[{\"date\": }]"),
            Err(AssistantError::MalformedReply(_))
        ));
    }

    #[test]
    fn test_invalid_item_reports_index() {
        let reply = r#"[
            {"date": "2026-03-05T09:15", "type": "expense", "category": "food",
             "transactionAmount": 10, "title": "Groceries"},
            {"date": "2026-03-05T09:15", "type": "expense", "category": "food",
             "transactionAmount": -4, "title": "Refund"}
        ]"#;
        let err = parse_reply(AssistantIntent::Create, reply).unwrap_err();
        assert!(matches!(err, AssistantError::InvalidCommand { index: 1, .. }));
    }

    #[test]
    fn test_create_requires_every_field() {
        let reply = r#"[{"date": "2026-03-05T09:15", "type": "expense", "title": "Groceries"}]"#;
        let err = parse_reply(AssistantIntent::Create, reply).unwrap_err();
        let AssistantError::InvalidCommand { reason, .. } = err else {
            panic!("expected invalid command");
        };
        assert!(reason.contains("category"));
    }

    #[test]
    fn test_update_keeps_only_supplied_fields() {
        let reply = r#"[{"id": "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b", "title": "Dinner out"}]"#;
        let commands = parse_reply(AssistantIntent::Update, reply).unwrap();
        let AssistantCommand::Update { patch, .. } = &commands[0] else {
            panic!("expected update");
        };
        assert_eq!(patch.title.as_deref(), Some("Dinner out"));
        assert!(patch.amount.is_none());
        assert!(patch.date.is_none());
    }

    #[test]
    fn test_update_and_delete_need_valid_id() {
        let reply = r#"[{"id": "not-an-id", "title": "Dinner out"}]"#;
        assert!(matches!(
            parse_reply(AssistantIntent::Update, reply),
            Err(AssistantError::InvalidCommand { index: 0, .. })
        ));
        assert!(matches!(
            parse_reply(AssistantIntent::Delete, r#"[{"title": "x"}]"#),
            Err(AssistantError::InvalidCommand { index: 0, .. })
        ));
    }

    #[test]
    fn test_update_without_changes_is_invalid() {
        let reply = r#"[{"id": "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b"}]"#;
        assert!(matches!(
            parse_reply(AssistantIntent::Update, reply),
            Err(AssistantError::InvalidCommand { .. })
        ));
    }
}
