//! Budget routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::budget::{Budget, BudgetError, BudgetPatch, BudgetService, NewBudget};
use fintrack_core::ledger::LedgerError;

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/budget",
        get(get_budget)
            .post(create_budget)
            .patch(update_budget)
            .delete(delete_budget),
    )
}

/// GET `/budget` - Get the budget with per-category spend.
async fn get_budget(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Budget>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let budget = aggregate.budget.ok_or(BudgetError::NotFound)?;
    Ok(Json(budget))
}

/// POST `/budget` - Create the budget; spend is computed from existing entries.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewBudget>,
) -> ApiResult<impl IntoResponse> {
    let budget = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(BudgetService::create(
                &mut aggregate.budget,
                payload.clone(),
                &aggregate.entries,
            )?)
        })
        .await?;

    info!(user_id = %auth.user_id(), limit = %budget.limit_amount, "Budget created");
    Ok((StatusCode::CREATED, Json(budget)))
}

/// PATCH `/budget` - Change title, window or limits.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BudgetPatch>,
) -> ApiResult<Json<Budget>> {
    let budget = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(BudgetService::update(
                &mut aggregate.budget,
                payload.clone(),
                &aggregate.entries,
            )?)
        })
        .await?;

    Ok(Json(budget))
}

/// DELETE `/budget` - Remove the budget.
async fn delete_budget(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(BudgetService::delete(&mut aggregate.budget)?)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
