//! Natural-language transaction management.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::assistant::{
    AssistantError, AssistantIntent, AssistantService, ChatMessage, CommandOutcome, parse_reply,
    system_prompt,
};
use fintrack_core::reports::{ExportRange, ReportService};
use fintrack_shared::AppError;

/// Creates the assistant routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/assistant/transactions", post(assistant_transactions))
}

/// Request body for the assistant.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantRequest {
    /// What to do with the described transactions.
    pub intent: AssistantIntent,
    /// Conversation so far, latest message last.
    pub messages: Vec<ChatMessage>,
    /// Earliest entry shown to the assistant for update and delete.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest entry shown to the assistant for update and delete.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

/// Assistant reply and the changes applied from it.
#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    /// Raw reply of the generation service.
    pub message: ChatMessage,
    /// One outcome per applied command, in order.
    pub outcomes: Vec<CommandOutcome>,
}

/// POST `/assistant/transactions` - Create, update or delete entries from a
/// conversation.
///
/// Every command in the reply is validated first and then applied in one
/// unit of work: either all of them land or none do.
async fn assistant_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AssistantRequest>,
) -> ApiResult<Json<AssistantResponse>> {
    let user_id = auth.user_id();
    let client = state
        .assistant
        .clone()
        .ok_or_else(|| AppError::ExternalService("Assistant is not configured".to_string()))?;

    if payload.messages.is_empty() {
        return Err(AppError::Validation("messages must not be empty".to_string()).into());
    }

    let entries_csv = if payload.intent.needs_entries() {
        let aggregate = state.uow.read(user_id).await?;
        let range = ExportRange {
            from: payload.from,
            to: payload.to,
            with_ids: true,
        };
        Some(ReportService::render_csv(&aggregate.entries, &range)?)
    } else {
        // Fail fast for users without a ledger before calling out
        state.uow.read(user_id).await?;
        None
    };

    let prompt = system_prompt(payload.intent, Utc::now(), entries_csv.as_deref());
    let reply = client
        .generate(&prompt, &payload.messages)
        .await
        .inspect_err(|e| error!(user_id = %user_id, error = %e, "Generation service failed"))?;

    let commands = parse_reply(payload.intent, &reply)
        .inspect_err(|e| warn!(user_id = %user_id, error = %e, "Rejected assistant reply"))?;

    let outcomes = if commands.is_empty() {
        Vec::new()
    } else {
        state
            .uow
            .mutate(user_id, |aggregate| {
                AssistantService::apply(aggregate, commands.clone())
            })
            .await
            .inspect_err(|e: &AssistantError| {
                warn!(user_id = %user_id, error = %e, "Assistant commands not applied");
            })?
    };

    info!(
        user_id = %user_id,
        intent = ?payload.intent,
        applied = outcomes.len(),
        "Assistant request handled"
    );

    Ok(Json(AssistantResponse {
        message: ChatMessage {
            role: "assistant".to_string(),
            content: reply,
        },
        outcomes,
    }))
}
