//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod assistant;
pub mod budget;
pub mod goals;
pub mod health;
pub mod profile;
pub mod saving;
pub mod transactions;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Every route except health works on the caller's own aggregate
    let protected_routes = Router::new()
        .merge(profile::routes())
        .merge(transactions::routes())
        .merge(saving::routes())
        .merge(budget::routes())
        .merge(goals::routes())
        .merge(assistant::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
