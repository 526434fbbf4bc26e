//! User aggregate and profile operations.

pub mod aggregate;
pub mod service;

pub use aggregate::UserAggregate;
pub use service::{AccountService, NewProfile, ProfilePatch};
