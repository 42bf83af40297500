//! Property Cache - cache-aside property listing service
//!
//! Serves the property collection from a cache, falling back to the backing
//! store on a miss, and reports the cache's health metrics.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_cache::api::create_router;
use property_cache::cache::{CacheClient, InMemoryCache, RedisCache};
use property_cache::config::CacheBackend;
use property_cache::store::{
    InMemoryPropertyStore, PostgresConfig, PostgresPropertyStore, PropertyStore,
};
use property_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the property cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache client and backing store
/// 4. Start background TTL cleanup for the in-memory cache
/// 5. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting property cache service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_backend={:?}, port={}, database={}",
        config.cache_backend,
        config.server_port,
        if config.database_url.is_some() { "postgres" } else { "in-memory" }
    );

    let (cache, cleanup_handle) = build_cache(&config).await?;
    let store = build_store(&config).await?;

    let state = AppState::from_config(&config, cache, store);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn build_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheClient>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackend::Memory => {
            let cache = InMemoryCache::from_config(config);
            let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
            info!(
                "In-memory cache ready: max_entries={}, max_memory={}",
                config.cache_max_entries, config.cache_max_memory
            );
            let cache: Arc<dyn CacheClient> = Arc::new(cache);
            Ok((cache, Some(handle)))
        }
        CacheBackend::Redis => {
            let cache = RedisCache::connect(&config.redis_url, config.cache_timeout)
                .await
                .context("Redis cache unavailable at startup")?;
            info!("Redis cache connected at {}", config.redis_url);
            let cache: Arc<dyn CacheClient> = Arc::new(cache);
            Ok((cache, None))
        }
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn PropertyStore>> {
    if let Some(pg_config) = PostgresConfig::from_config(config) {
        let store = PostgresPropertyStore::connect_lazy(&pg_config)?;
        if let Err(e) = store.ensure_table().await {
            // Reads degrade to empty lists until the database comes back
            warn!("Could not verify table {}: {}", pg_config.table, e);
        }
        info!("PostgreSQL store ready (table {})", pg_config.table);
        return Ok(Arc::new(store));
    }

    let store = match &config.properties_seed_file {
        Some(path) => InMemoryPropertyStore::from_json_file(path)?,
        None => {
            warn!("No DATABASE_URL or PROPERTIES_SEED_FILE set, serving an empty store");
            InMemoryPropertyStore::default()
        }
    };
    Ok(Arc::new(store))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
