//! HTTP server initialization and runtime setup.
//!
//! Builds the resolution handles once, spawns background workers, and runs
//! the Axum server until Ctrl-C.

use crate::application::services::ResolutionEngine;
use crate::config::Config;
use crate::domain::repositories::RemoteStore;
use crate::domain::static_table::StaticTableHandle;
use crate::domain::table_worker::run_table_loader;
use crate::infrastructure::cache::{LocalCache, run_cache_sweeper};
use crate::infrastructure::remote::{NullStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the remote store: Redis when configured, otherwise [`NullStore`].
///
/// An unreachable Redis at startup is logged but not fatal; the pool dials
/// lazily and recovers once the server comes up.
///
/// # Errors
///
/// Returns an error if the Redis URL is invalid.
pub async fn build_remote_store(config: &Config) -> Result<Arc<dyn RemoteStore>> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Remote store disabled (NullStore)");
        return Ok(Arc::new(NullStore::new()));
    };

    let store = RedisStore::new(redis_url, config.pool_config())
        .context("Failed to create Redis store")?;

    if store.health_check().await {
        tracing::info!("✓ Connected to Redis");
    } else {
        tracing::warn!("Redis is not reachable yet; remote lookups will fail until it is");
    }

    Ok(Arc::new(store))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Host → prefix map
/// - Remote store (Redis or NullStore)
/// - Local cache and optional sweeper
/// - Static table handle and background loader (if a map file is configured)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - `HOST_PREFIXES` is invalid
/// - The Redis URL is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let hosts = Arc::new(config.host_map()?);
    tracing::info!(
        hosts = hosts.len(),
        prefixes = ?hosts.prefixes(),
        "Host map loaded"
    );

    let store = build_remote_store(&config).await?;

    let cache = Arc::new(LocalCache::new());
    if let Some(period) = config.cache_sweep_interval() {
        tokio::spawn(run_cache_sweeper(cache.clone(), period));
        tracing::info!("Cache sweeper started");
    }

    let table = StaticTableHandle::new();
    if let Some(path) = config.url_map_file.clone() {
        tokio::spawn(run_table_loader(
            path,
            hosts.prefixes(),
            table.clone(),
            config.map_reload_interval(),
        ));
        tracing::info!("Static table loader started");
    } else {
        tracing::info!("No map file configured, serving cache and remote tiers only");
    }

    let engine = Arc::new(ResolutionEngine::new(
        table,
        cache,
        store,
        config.cache_ttl(),
    ));
    let state = AppState::new(engine, hosts, config.url_map_file.is_some());

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
