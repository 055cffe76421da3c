use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kidview_api::{
    config::{Config, StorageBackend},
    db::{create_pool, create_redis_client, Cache, HistoryStore, MemoryHistoryStore, PgHistoryStore},
    routes::{create_router, AppState},
    services::providers::{VideoProvider, YouTubeProvider},
};

/// Opens the configured history store, falling back to memory when Postgres is unreachable
async fn open_history_store(config: &Config) -> Arc<dyn HistoryStore> {
    if config.storage_backend == StorageBackend::Memory {
        return Arc::new(MemoryHistoryStore::new());
    }

    match create_pool(&config.database_url).await {
        Ok(pool) => Arc::new(PgHistoryStore::new(pool, config.family_id)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Database unavailable, falling back to in-memory history store"
            );
            Arc::new(MemoryHistoryStore::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kidview_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = open_history_store(&config).await;
    tracing::info!(
        backend = store.name(),
        family_id = %config.family_id,
        "History store ready"
    );

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    if !config.youtube_configured() {
        tracing::warn!("YOUTUBE_API_KEY is not set, video searches will fail");
    }
    let provider: Arc<dyn VideoProvider> = Arc::new(YouTubeProvider::new(
        cache,
        config.youtube_api_key.clone(),
        config.youtube_api_url.clone(),
    ));

    let state = Arc::new(AppState::new(store, provider, &config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;

    Ok(())
}
