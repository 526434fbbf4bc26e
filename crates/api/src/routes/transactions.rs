//! Transaction routes.
//!
//! Mutations go through the unit of work; reads project the stored aggregate.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::ledger::{
    EntryCreated, EntryPatch, EntryRemoval, LedgerEntry, LedgerService, NewEntry,
};
use fintrack_core::reports::{EntryQuery, ExportRange, ReportService, YearChart};
use fintrack_shared::types::EntryId;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/chart", get(chart))
        .route("/transactions/years", get(years))
        .route("/transactions/export", get(export))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for the monthly chart.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Calendar year.
    pub year: i32,
}

/// GET `/transactions` - List entries with filters and sorting.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EntryQuery>,
) -> ApiResult<Json<Value>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let entries = ReportService::list_entries(&aggregate.entries, &query)?;

    Ok(Json(json!({ "transactions": entries })))
}

/// POST `/transactions` - Record an entry, splitting off auto-saving.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewEntry>,
) -> ApiResult<impl IntoResponse> {
    let created: EntryCreated = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            LedgerService::create_entry(aggregate, payload.clone())
        })
        .await?;

    info!(
        user_id = %auth.user_id(),
        entry_id = %created.entry.id,
        auto_saved = created.savings_transfer.is_some(),
        "Transaction created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET `/transactions/{id}` - Get one entry.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntryId>,
) -> ApiResult<Json<LedgerEntry>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let entry = LedgerService::get_entry(&aggregate, id)?.clone();
    Ok(Json(entry))
}

/// PATCH `/transactions/{id}` - Change fields of an entry.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntryId>,
    Json(payload): Json<EntryPatch>,
) -> ApiResult<Json<LedgerEntry>> {
    let updated = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            LedgerService::update_entry(aggregate, id, payload.clone())
        })
        .await?;

    info!(user_id = %auth.user_id(), entry_id = %id, "Transaction updated");
    Ok(Json(updated))
}

/// DELETE `/transactions/{id}` - Remove an entry and its auto-saving transfer.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EntryId>,
) -> ApiResult<Json<EntryRemoval>> {
    let removal = state
        .uow
        .mutate(auth.user_id(), |aggregate| {
            LedgerService::delete_entry(aggregate, id)
        })
        .await?;

    info!(user_id = %auth.user_id(), entry_id = %id, "Transaction deleted");
    Ok(Json(removal))
}

/// GET `/transactions/chart?year=YYYY` - Monthly income and expense totals.
async fn chart(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<YearChart>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    Ok(Json(ReportService::chart_data(&aggregate.entries, query.year)?))
}

/// GET `/transactions/years` - Years that have entries.
async fn years(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Value>> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let years = ReportService::distinct_years(&aggregate.entries);
    Ok(Json(json!({ "years": years })))
}

/// GET `/transactions/export` - CSV rendering of a date range.
async fn export(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(range): Query<ExportRange>,
) -> ApiResult<impl IntoResponse> {
    let aggregate = state.uow.read(auth.user_id()).await?;
    let csv = ReportService::render_csv(&aggregate.entries, &range)?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}
