//! Explorer Cache - operations server
//!
//! Hosts the cache service behind a small HTTP surface for health checks,
//! statistics and manual invalidation.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use explorer_cache::api::{create_router, AppState};
use explorer_cache::cache::{CacheService, DefaultConnector, MEMORY_SCHEME};
use explorer_cache::config::Config;
use explorer_cache::protect::{AesDataProtector, DataProtector, CACHE_PROTECTION_PURPOSE};
use explorer_cache::spawn_cleanup_task;
use explorer_cache::telemetry::TracingTelemetry;

/// Main entry point for the cache operations server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the data protector and cache service
/// 4. Start background TTL cleanup when using the in-process backend
/// 5. Serve the operations API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "explorer_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Explorer Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_enabled={}, compression_threshold={}B, port={}, cleanup_interval={}s",
        config.is_cache_enabled(),
        config.compression_threshold,
        config.server_port,
        config.cleanup_interval
    );

    let protector: Arc<dyn DataProtector> = if config.protection_key.is_empty() {
        warn!("CACHE_PROTECTION_KEY not set; using an ephemeral key, cached data will not survive a restart");
        Arc::new(AesDataProtector::ephemeral()?)
    } else {
        Arc::new(AesDataProtector::new(CACHE_PROTECTION_PURPOSE, &config.protection_key)?)
    };

    let connector = DefaultConnector::new();
    let cleanup_handle = config
        .connection_string
        .trim()
        .starts_with(MEMORY_SCHEME)
        .then(|| spawn_cleanup_task(connector.memory_store(), config.cleanup_interval));

    let service = CacheService::with_connector(
        &config,
        Arc::new(connector),
        protector,
        Arc::new(TracingTelemetry),
    );
    if !service.is_enabled() {
        warn!("CACHE_CONNECTION_STRING not set; caching is disabled");
    }

    let app = create_router(AppState::new(Arc::new(service)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<tokio::task::JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
