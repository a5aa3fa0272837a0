//! API Handlers
//!
//! HTTP request handlers for each operations endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheNamespace, CacheService};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, FetchResponse, HealthResponse, StatsResponse, StoreRequest,
    StoreResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide cache service
    pub cache: Arc<CacheService>,
}

impl AppState {
    /// Creates a new AppState around a cache service.
    pub fn new(cache: Arc<CacheService>) -> Self {
        Self { cache }
    }
}

/// Token cache blobs belong to the token adapter; HTTP callers may only
/// delete or clear them.
fn reject_token_namespace(namespace: CacheNamespace, access: &str) -> Result<()> {
    if namespace == CacheNamespace::Authentication {
        return Err(CacheError::invalid(format!(
            "entries in the authentication namespace are not {} over HTTP",
            access
        )));
    }
    Ok(())
}

/// Handler for PUT /cache/:namespace/:key
pub async fn store_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let namespace: CacheNamespace = namespace.parse()?;
    reject_token_namespace(namespace, "writable")?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    state
        .cache
        .store(namespace, &key, &req.value, req.ttl.map(Duration::from_secs))
        .await?;

    Ok(Json(StoreResponse::new(namespace, key)))
}

/// Handler for GET /cache/:namespace/:key
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<FetchResponse>> {
    let namespace: CacheNamespace = namespace.parse()?;
    reject_token_namespace(namespace, "readable")?;

    let value: Option<Value> = state.cache.fetch(namespace, &key).await?;
    match value {
        Some(value) => Ok(Json(FetchResponse::new(namespace, key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:namespace/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let namespace: CacheNamespace = namespace.parse()?;
    state.cache.delete(namespace, &key).await?;

    Ok(Json(DeleteResponse::new(namespace, key)))
}

/// Handler for DELETE /cache/:namespace
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<ClearResponse>> {
    let namespace: CacheNamespace = namespace.parse()?;
    state.cache.clear(namespace).await?;

    Ok(Json(ClearResponse::new(namespace)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.cache.is_enabled(),
        state.cache.is_connected(),
        state.cache.backend(),
    ))
}
