pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Context;

use config::Config;
use db::{create_pool, MemoryStore, PgStore, Store};
use routes::{create_router, AppState};

/// Opens the configured store: Postgres when `DATABASE_URL` is set, the
/// in-memory store otherwise
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_max_connections)
                .await
                .context("Failed to connect to database")?;
            let store = PgStore::new(pool);
            store.migrate().await.context("Failed to apply migrations")?;
            tracing::info!("Using PostgreSQL store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Builds the application and serves it until the process stops
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let address = config.bind_address();
    let app = create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
