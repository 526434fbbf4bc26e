//! Applies assistant commands to an aggregate.

use serde::Serialize;

use super::command::AssistantCommand;
use super::error::AssistantError;
use crate::account::UserAggregate;
use crate::ledger::{EntryCreated, EntryRemoval, LedgerEntry, LedgerService};

/// Result of one applied command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CommandOutcome {
    /// An entry was recorded.
    Created(EntryCreated),
    /// An entry was changed.
    Updated(LedgerEntry),
    /// An entry was removed.
    Deleted(EntryRemoval),
}

/// Service that runs parsed assistant commands through the ledger engine.
pub struct AssistantService;

impl AssistantService {
    /// Applies every command in order, or none of them.
    ///
    /// Commands run against a working copy of the aggregate which replaces
    /// the original only after the last one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::CommandRejected` with the index of the first
    /// command the ledger refuses. The aggregate is left untouched.
    pub fn apply(
        aggregate: &mut UserAggregate,
        commands: Vec<AssistantCommand>,
    ) -> Result<Vec<CommandOutcome>, AssistantError> {
        let mut draft = aggregate.clone();
        let mut outcomes = Vec::with_capacity(commands.len());

        for (index, command) in commands.into_iter().enumerate() {
            let outcome = match command {
                AssistantCommand::Create(input) => {
                    LedgerService::create_entry(&mut draft, input).map(CommandOutcome::Created)
                }
                AssistantCommand::Update { id, patch } => {
                    LedgerService::update_entry(&mut draft, id, patch).map(CommandOutcome::Updated)
                }
                AssistantCommand::Delete { id } => {
                    LedgerService::delete_entry(&mut draft, id).map(CommandOutcome::Deleted)
                }
            }
            .map_err(|source| AssistantError::CommandRejected { index, source })?;
            outcomes.push(outcome);
        }

        if !outcomes.is_empty() {
            *aggregate = draft;
        }
        Ok(outcomes)
    }
}
