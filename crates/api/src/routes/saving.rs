//! Savings goal routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::ledger::LedgerError;
use fintrack_core::saving::{
    AutoSavingToggle, GoalClosure, GoalPatch, NewGoal, SavingError, SavingMovement,
    SavingService, SavingsGoal,
};

/// Creates the saving routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/saving",
            get(get_goal)
                .post(create_goal)
                .patch(update_goal)
                .delete(delete_goal),
        )
        .route("/saving/deposit", post(deposit))
        .route("/saving/withdraw", post(withdraw))
        .route("/saving/auto-saving", put(toggle_auto_saving))
}

/// Request body for moving money into or out of the goal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoneyRequest {
    /// Requested amount.
    pub amount: Decimal,
    /// Date of the transfer entry, now if absent.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// GET `/saving` - Get the goal.
async fn get_goal(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<SavingsGoal>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let goal = aggregate.saving.ok_or(SavingError::GoalNotFound)?;
    Ok(Json(goal))
}

/// POST `/saving` - Create the goal.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewGoal>,
) -> ApiResult<impl IntoResponse> {
    let goal = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(SavingService::create_goal(aggregate, payload.clone())?)
        })
        .await?;

    info!(user_id = %auth.user_id(), goal = %goal.goal_name, "Savings goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// PATCH `/saving` - Change name, target or date.
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<GoalPatch>,
) -> ApiResult<Json<SavingsGoal>> {
    let goal = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(SavingService::update_goal(aggregate, payload.clone())?)
        })
        .await?;

    Ok(Json(goal))
}

/// DELETE `/saving` - Remove the goal and refund its amount to the balance.
async fn delete_goal(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<GoalClosure>> {
    let now = Utc::now();
    let closure = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(SavingService::delete_goal(aggregate, now)?)
        })
        .await?;

    info!(
        user_id = %auth.user_id(),
        refunded = %closure.goal.current_amount,
        "Savings goal deleted"
    );
    Ok(Json(closure))
}

/// POST `/saving/deposit` - Move money from the balance into the goal.
async fn deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MoneyRequest>,
) -> ApiResult<Json<SavingMovement>> {
    let at = payload.date.unwrap_or_else(Utc::now);
    let movement = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(SavingService::add_money(aggregate, payload.amount, at)?)
        })
        .await?;

    info!(
        user_id = %auth.user_id(),
        transferred = %movement.transferred,
        clamped = movement.clamped,
        "Deposited to savings"
    );
    Ok(Json(movement))
}

/// POST `/saving/withdraw` - Move money from the goal back to the balance.
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MoneyRequest>,
) -> ApiResult<Json<SavingMovement>> {
    let at = payload.date.unwrap_or_else(Utc::now);
    let movement = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(SavingService::withdraw(aggregate, payload.amount, at)?)
        })
        .await?;

    info!(user_id = %auth.user_id(), transferred = %movement.transferred, "Withdrew from savings");
    Ok(Json(movement))
}

/// PUT `/saving/auto-saving` - Enable or disable auto-saving.
async fn toggle_auto_saving(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AutoSavingToggle>,
) -> ApiResult<Json<SavingsGoal>> {
    let goal = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(SavingService::toggle_auto_saving(aggregate, payload)?)
        })
        .await?;

    Ok(Json(goal))
}
