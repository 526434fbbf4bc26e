//! Tracked goal routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use fintrack_shared::types::GoalId;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::goals::{CreateGoalInput, Goal, GoalService, UpdateGoalInput};
use fintrack_core::ledger::LedgerError;

/// Creates the tracked goal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).patch(update_goal).delete(delete_goal),
        )
}

/// GET `/goals` - List goals in creation order.
async fn list_goals(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<Goal>>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    Ok(Json(aggregate.goals))
}

/// POST `/goals` - Add a goal.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateGoalInput>,
) -> ApiResult<impl IntoResponse> {
    let goal = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(GoalService::create(&mut aggregate.goals, payload.clone())?)
        })
        .await?;

    info!(user_id = %auth.user_id(), goal_id = %goal.id, "Goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET `/goals/{id}` - Get one goal.
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<GoalId>,
) -> ApiResult<Json<Goal>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let goal = GoalService::get(&aggregate.goals, id)?.clone();
    Ok(Json(goal))
}

/// PATCH `/goals/{id}` - Change any goal field.
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<GoalId>,
    Json(payload): Json<UpdateGoalInput>,
) -> ApiResult<Json<Goal>> {
    let goal = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(GoalService::update(
                &mut aggregate.goals,
                id,
                payload.clone(),
            )?)
        })
        .await?;

    Ok(Json(goal))
}

/// DELETE `/goals/{id}` - Remove a goal.
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<GoalId>,
) -> ApiResult<StatusCode> {
    state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            Ok::<_, LedgerError>(GoalService::delete(&mut aggregate.goals, id)?)
        })
        .await?;

    info!(user_id = %auth.user_id(), goal_id = %id, "Goal deleted");
    Ok(StatusCode::NO_CONTENT)
}
