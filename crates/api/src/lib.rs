//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Error responses
//! - The generation service client used by the assistant route

pub mod error;
pub mod generation;
pub mod middleware;
pub mod routes;

use axum::Router;
use fintrack_db::LedgerUnitOfWork;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use fintrack_shared::JwtService;
use generation::GenerationClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Serialized access to user aggregates.
    pub uow: LedgerUnitOfWork,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Generation service client; the assistant route fails without it.
    pub assistant: Option<Arc<dyn GenerationClient>>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
