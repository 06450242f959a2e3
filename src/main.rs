use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use article_recommender::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{create_pool, DataStore, MemoryStore, PostgresStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("article_recommender=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store = build_store(&config).await?;

    let state = AppState::new(store, config.top_n);

    // Warm the snapshot; a failure here is retried on the first request
    if let Err(e) = state.repository.snapshot().await {
        tracing::warn!(error = %e, "Initial dataset load failed");
    }

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!(address = %address, top_n = config.top_n, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn DataStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_max_connections).await?;
            let store = PostgresStore::new(pool);
            store.migrate().await?;
            tracing::info!("Using postgres data store");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            let store = match &config.seed_path {
                Some(path) => MemoryStore::from_json_file(path).await?,
                None => {
                    tracing::warn!("No SEED_PATH configured, starting with empty tables");
                    MemoryStore::new()
                }
            };
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
