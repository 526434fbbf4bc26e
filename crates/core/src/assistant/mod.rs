//! Natural-language entry management.
//!
//! The generation service turns a conversation into a JSON array of entries.
//! This module builds the prompt, parses the reply into typed commands and
//! applies them atomically. The HTTP client lives in the API crate.

pub mod command;
pub mod error;
pub mod prompt;
pub mod service;

pub use command::{ASSISTANT_DATE_FORMAT, AssistantCommand, AssistantIntent, parse_reply};
pub use error::AssistantError;
pub use prompt::{ChatMessage, system_prompt};
pub use service::{AssistantService, CommandOutcome};
