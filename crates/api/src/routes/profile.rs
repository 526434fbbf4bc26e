//! Profile routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::account::{AccountService, NewProfile, ProfilePatch, UserAggregate};
use fintrack_core::ledger::LedgerError;
use fintrack_shared::types::UserId;

/// Creates the profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(get_profile)
            .post(create_profile)
            .patch(update_profile)
            .delete(delete_profile),
    )
}

/// Profile summary without the entry list.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Balance the ledger started from.
    pub initial_balance: Decimal,
    /// Current balance.
    pub current_balance: Decimal,
    /// Number of recorded entries.
    pub entry_count: usize,
    /// Whether a savings goal exists.
    pub has_saving: bool,
    /// Whether a budget exists.
    pub has_budget: bool,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&UserAggregate> for ProfileResponse {
    fn from(aggregate: &UserAggregate) -> Self {
        Self {
            id: aggregate.id,
            name: aggregate.name.clone(),
            email: aggregate.email.clone(),
            initial_balance: aggregate.initial_balance,
            current_balance: aggregate.current_balance,
            entry_count: aggregate.entries.len(),
            has_saving: aggregate.saving.is_some(),
            has_budget: aggregate.budget.is_some(),
            created_at: aggregate.created_at,
            updated_at: aggregate.updated_at,
        }
    }
}

/// POST `/profile` - Open the caller's ledger.
async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewProfile>,
) -> ApiResult<impl IntoResponse> {
    let aggregate = AccountService::open(auth.user_id(), payload)?;
    let aggregate = state.uow.create(aggregate).await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(&aggregate))))
}

/// GET `/profile` - Get the caller's profile.
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    Ok(Json(ProfileResponse::from(&aggregate)))
}

/// PATCH `/profile` - Change name or email.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ProfilePatch>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            AccountService::update(aggregate, payload.clone())?;
            Ok::<_, LedgerError>(ProfileResponse::from(&*aggregate))
        })
        .await?;

    info!(user_id = %auth.user_id(), "Profile updated");
    Ok(Json(profile))
}

/// DELETE `/profile` - Remove the caller's ledger entirely.
async fn delete_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    state.uow.remove(auth.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
