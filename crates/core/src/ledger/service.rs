//! Mutation engine for ledger entries.
//!
//! Each operation validates everything up front and then mutates the
//! aggregate in place. Callers run it against a working copy and persist the
//! copy only on success, so a failed operation never leaves a partial change.

use fintrack_shared::types::EntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{EntryType, LedgerEntry};
use super::error::LedgerError;
use super::types::{EntryPatch, NewEntry};
use super::validation::{validate_new_entry, validate_patch};
use crate::account::UserAggregate;

/// Title given to auto-saving transfer entries.
pub const AUTO_SAVING_TITLE: &str = "Auto saving";

/// Outcome of recording an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCreated {
    /// The recorded entry, holding the requested amount.
    pub entry: LedgerEntry,
    /// Transfer split off by auto-saving, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_transfer: Option<LedgerEntry>,
}

/// Outcome of deleting an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRemoval {
    /// The deleted entry.
    pub entry: LedgerEntry,
    /// Auto-saving transfer deleted along with it, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_transfer: Option<LedgerEntry>,
}

/// Ledger service for entry mutations.
///
/// Stateless; all state lives in the [`UserAggregate`] passed in.
pub struct LedgerService;

impl LedgerService {
    /// Records a new entry.
    ///
    /// For income with auto-saving enabled, a share of the amount is split
    /// into a linked expense transfer in the `saving` category and added to
    /// the goal. The main entry keeps the requested amount; the balance moves
    /// by the requested amount minus the share.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidField` for a bad shape, or
    /// `SavingError::TargetReached` when auto-saving is on and the goal is
    /// already complete; in that case nothing is recorded.
    pub fn create_entry(
        aggregate: &mut UserAggregate,
        input: NewEntry,
    ) -> Result<EntryCreated, LedgerError> {
        let input = validate_new_entry(input)?;

        let split = match (&aggregate.saving, input.entry_type) {
            (Some(goal), EntryType::Income) => Some((goal.id, goal.auto_saving_share(input.amount)?)),
            _ => None,
        };

        let entry = LedgerEntry {
            id: EntryId::new(),
            date: input.date,
            entry_type: input.entry_type,
            category: input.category,
            amount: input.amount,
            title: input.title,
            is_savings_transfer: false,
            source_entry_id: None,
            saving_id: None,
        };
        aggregate.post(entry.clone());

        let savings_transfer = if let Some((saving_id, share)) =
            split.filter(|(_, share)| *share > Decimal::ZERO)
        {
            let transfer = LedgerEntry::savings_transfer(
                EntryType::Expense,
                share,
                entry.date,
                AUTO_SAVING_TITLE,
                saving_id,
                Some(entry.id),
            );
            aggregate.post(transfer.clone());
            if let Some(goal) = aggregate.saving.as_mut() {
                goal.deposit(share);
            }
            Some(transfer)
        } else {
            None
        };

        Ok(EntryCreated {
            entry,
            savings_transfer,
        })
    }

    /// Changes fields of an entry by reversing its old effect and applying
    /// the new one.
    ///
    /// A date change is carried over to the entry's auto-saving transfer.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `SavingsTransferLocked` for transfer entries,
    /// `LinkedTransferLocked` when the type or amount of an entry with an
    /// auto-saving transfer would change, or a validation error.
    pub fn update_entry(
        aggregate: &mut UserAggregate,
        id: EntryId,
        patch: EntryPatch,
    ) -> Result<LedgerEntry, LedgerError> {
        let patch = validate_patch(patch)?;
        let current = Self::editable_entry(aggregate, id)?.clone();
        let linked = aggregate.linked_transfer(id).cloned();

        let updated = LedgerEntry {
            date: patch.date.unwrap_or(current.date),
            entry_type: patch.entry_type.unwrap_or(current.entry_type),
            category: patch.category.unwrap_or_else(|| current.category.clone()),
            amount: patch.amount.unwrap_or(current.amount),
            title: patch.title.unwrap_or_else(|| current.title.clone()),
            ..current.clone()
        };

        if linked.is_some()
            && (updated.entry_type != current.entry_type || updated.amount != current.amount)
        {
            return Err(LedgerError::LinkedTransferLocked(id));
        }

        aggregate.repost(updated.clone());

        if let Some(transfer) = linked.filter(|t| t.date != updated.date) {
            aggregate.repost(LedgerEntry {
                date: updated.date,
                ..transfer
            });
        }

        Ok(updated)
    }

    /// Deletes an entry together with its auto-saving transfer.
    ///
    /// The transfer's amount is taken back out of the goal that received it.
    /// If that goal no longer holds the amount (withdrawn, closed or
    /// replaced) the entry stays and nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `SavingsTransferLocked` for transfer entries,
    /// or `LinkedTransferSpent` when the share can no longer be reversed.
    pub fn delete_entry(
        aggregate: &mut UserAggregate,
        id: EntryId,
    ) -> Result<EntryRemoval, LedgerError> {
        Self::editable_entry(aggregate, id)?;
        let linked_id = match aggregate.linked_transfer(id) {
            Some(transfer) => {
                let reversible = aggregate
                    .saving
                    .as_ref()
                    .is_some_and(|goal| goal.can_reverse(transfer));
                if !reversible {
                    return Err(LedgerError::LinkedTransferSpent(id));
                }
                Some(transfer.id)
            }
            None => None,
        };

        let entry = aggregate
            .unpost(id)
            .ok_or(LedgerError::EntryNotFound(id))?;

        let savings_transfer = linked_id.and_then(|transfer_id| aggregate.unpost(transfer_id));
        if let (Some(transfer), Some(goal)) = (&savings_transfer, aggregate.saving.as_mut()) {
            goal.release(transfer.amount);
        }

        Ok(EntryRemoval {
            entry,
            savings_transfer,
        })
    }

    /// Returns one entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EntryNotFound` if the user has no such entry.
    pub fn get_entry(aggregate: &UserAggregate, id: EntryId) -> Result<&LedgerEntry, LedgerError> {
        aggregate.entry(id).ok_or(LedgerError::EntryNotFound(id))
    }

    fn editable_entry(aggregate: &UserAggregate, id: EntryId) -> Result<&LedgerEntry, LedgerError> {
        let entry = Self::get_entry(aggregate, id)?;
        if entry.is_savings_transfer {
            return Err(LedgerError::SavingsTransferLocked(id));
        }
        Ok(entry)
    }
}
