//! Game Library Service - Main Application Entry Point
//!
//! A local REST service for a personal game library: games owned across
//! platforms and launchers, tags, multiplayer/co-op capability, which friends
//! own which games, and a shortlist of what to play next. Imported games are
//! auto-filled from an external game metadata database.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (embedded, file-backed)
//! - **Metadata**: reqwest client with OAuth client-credentials token refresh
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the metadata client if credentials are configured
//! 5. Build HTTP router and start server on configured address

mod config;
mod db;
mod error;
mod handlers;
mod metadata;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let metadata = match config.metadata() {
        Some(settings) => {
            let client = metadata::MetadataClient::new(&settings)?;
            tracing::info!("Metadata auto-fill enabled ({})", settings.base_url);
            Some(client)
        }
        None => {
            tracing::warn!("METADATA_CLIENT_ID/METADATA_CLIENT_SECRET not set, auto-fill disabled");
            None
        }
    };

    if config.api_token().is_none() {
        tracing::warn!("API_TOKEN not set, API is open to anyone who can reach it");
    }

    let state = state::AppState::new(pool, metadata, config.api_token());
    let app = routes::build_router(state);

    // Bind to network address and start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
