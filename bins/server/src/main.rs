//! Fintrack API Server
//!
//! Main entry point for the Fintrack backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_api::{
    AppState, create_router,
    generation::{GenerationClient, HttpGenerationClient},
};
use fintrack_db::{
    LedgerUnitOfWork, MemoryUserAggregateRepository, PgUserAggregateRepository,
    UserAggregateRepository, connect_with_pool,
};
use fintrack_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fintrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Pick the aggregate store
    let repo: Arc<dyn UserAggregateRepository> = match &config.database {
        Some(database) => {
            let db = connect_with_pool(
                &database.url,
                database.max_connections,
                database.min_connections,
            )
            .await?;
            info!("Connected to database");
            Arc::new(PgUserAggregateRepository::new(db))
        }
        None => {
            warn!("No [database] section configured, ledgers are kept in memory");
            Arc::new(MemoryUserAggregateRepository::new())
        }
    };
    let uow = LedgerUnitOfWork::new(repo, config.ledger.max_conflict_retries);

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let assistant = match &config.assistant {
        Some(assistant) => {
            let client = HttpGenerationClient::new(assistant)?;
            info!(endpoint = %assistant.endpoint, "Generation service configured");
            Some(Arc::new(client) as Arc<dyn GenerationClient>)
        }
        None => {
            warn!("No [assistant] section configured, assistant requests will fail");
            None
        }
    };

    // Create application state
    let state = AppState {
        uow,
        jwt_service: Arc::new(jwt_service),
        assistant,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
