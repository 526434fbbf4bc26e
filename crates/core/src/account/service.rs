//! Profile operations on the user aggregate.

use fintrack_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::UserAggregate;
use crate::ledger::LedgerError;

const MAX_NAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 254;

/// Input for opening a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProfile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Opening balance.
    #[serde(default)]
    pub initial_balance: Decimal,
}

/// Profile fields a user may change. The balance is not one of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilePatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile service.
pub struct AccountService;

impl AccountService {
    /// Builds a fresh aggregate for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidField` for a bad name, email or a
    /// negative opening balance.
    pub fn open(user_id: UserId, input: NewProfile) -> Result<UserAggregate, LedgerError> {
        let name = Self::validate_name(&input.name)?;
        let email = Self::validate_email(&input.email)?;
        if input.initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid(
                "initial_balance",
                "must not be negative",
            ));
        }

        Ok(UserAggregate::new(user_id, name, email, input.initial_balance))
    }

    /// Applies a profile patch.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyPatch` or `LedgerError::InvalidField`;
    /// on error the aggregate is unchanged.
    pub fn update(aggregate: &mut UserAggregate, patch: ProfilePatch) -> Result<(), LedgerError> {
        if patch.name.is_none() && patch.email.is_none() {
            return Err(LedgerError::EmptyPatch);
        }

        let name = patch.name.as_deref().map(Self::validate_name).transpose()?;
        let email = patch.email.as_deref().map(Self::validate_email).transpose()?;

        if let Some(name) = name {
            aggregate.name = name;
        }
        if let Some(email) = email {
            aggregate.email = email;
        }
        Ok(())
    }

    fn validate_name(name: &str) -> Result<String, LedgerError> {
        let name = name.trim();
        let len = name.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(LedgerError::invalid(
                "name",
                format!("must be between 1 and {MAX_NAME_LEN} characters"),
            ));
        }
        Ok(name.to_string())
    }

    fn validate_email(email: &str) -> Result<String, LedgerError> {
        let email = email.trim().to_lowercase();
        let valid = email.len() <= MAX_EMAIL_LEN
            && email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(LedgerError::invalid("email", "must be a valid address"));
        }
        Ok(email)
    }
}
