//! Shape validation for entry input.
//!
//! Category and title are trimmed, category is lowercased, and both must be
//! 3 to 50 characters long. Amounts must not be negative.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryPatch, NewEntry};

const MIN_TEXT_LEN: usize = 3;
const MAX_TEXT_LEN: usize = 50;

/// Validates and normalizes a new entry.
///
/// # Errors
///
/// Returns `LedgerError::InvalidField` naming the first offending field.
pub fn validate_new_entry(input: NewEntry) -> Result<NewEntry, LedgerError> {
    Ok(NewEntry {
        date: input.date,
        entry_type: input.entry_type,
        category: normalize_category(&input.category)?,
        amount: validate_amount(input.amount)?,
        title: normalize_title(&input.title)?,
    })
}

/// Validates and normalizes an entry patch.
///
/// # Errors
///
/// Returns `LedgerError::EmptyPatch` if nothing would change, or
/// `LedgerError::InvalidField` naming the first offending field.
pub fn validate_patch(patch: EntryPatch) -> Result<EntryPatch, LedgerError> {
    if patch.is_empty() {
        return Err(LedgerError::EmptyPatch);
    }

    Ok(EntryPatch {
        date: patch.date,
        entry_type: patch.entry_type,
        category: patch.category.as_deref().map(normalize_category).transpose()?,
        amount: patch.amount.map(validate_amount).transpose()?,
        title: patch.title.as_deref().map(normalize_title).transpose()?,
    })
}

/// Trims and lowercases a category, checking its length.
///
/// # Errors
///
/// Returns `LedgerError::InvalidField` if the length is out of bounds.
pub fn normalize_category(category: &str) -> Result<String, LedgerError> {
    let category = category.trim().to_lowercase();
    check_length("category", &category)?;
    Ok(category)
}

fn normalize_title(title: &str) -> Result<String, LedgerError> {
    let title = title.trim().to_string();
    check_length("title", &title)?;
    Ok(title)
}

fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid("amount", "must not be negative"));
    }
    Ok(amount)
}

fn check_length(field: &'static str, value: &str) -> Result<(), LedgerError> {
    let len = value.chars().count();
    if (MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&len) {
        Ok(())
    } else {
        Err(LedgerError::invalid(
            field,
            format!("must be between {MIN_TEXT_LEN} and {MAX_TEXT_LEN} characters"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::EntryType;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn input(category: &str, title: &str, amount: Decimal) -> NewEntry {
        NewEntry {
            date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            entry_type: EntryType::Expense,
            category: category.to_string(),
            amount,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_normalizes_fields() {
        let entry = validate_new_entry(input("  Food ", " Groceries ", dec!(12.50))).unwrap();
        assert_eq!(entry.category, "food");
        assert_eq!(entry.title, "Groceries");
        assert_eq!(entry.amount, dec!(12.5));
    }

    #[rstest]
    #[case("fo", "groceries", dec!(1), "category")]
    #[case(&"x".repeat(51), "groceries", dec!(1), "category")]
    #[case("food", "ab", dec!(1), "title")]
    #[case("food", "   ", dec!(1), "title")]
    #[case("food", "groceries", dec!(-0.01), "amount")]
    fn test_rejects_bad_shape(
        #[case] category: &str,
        #[case] title: &str,
        #[case] amount: Decimal,
        #[case] expected_field: &str,
    ) {
        match validate_new_entry(input(category, title, amount)) {
            Err(LedgerError::InvalidField { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        assert!(validate_new_entry(input("food", "free sample", dec!(0))).is_ok());
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert!(matches!(
            validate_patch(EntryPatch::default()),
            Err(LedgerError::EmptyPatch)
        ));
    }

    #[test]
    fn test_patch_normalizes_category() {
        let patch = validate_patch(EntryPatch {
            category: Some("Transportation".to_string()),
            ..EntryPatch::default()
        })
        .unwrap();
        assert_eq!(patch.category.as_deref(), Some("transportation"));
    }
}
