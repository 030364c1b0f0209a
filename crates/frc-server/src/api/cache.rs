use std::sync::Arc;

use axum::{extract::State, Json};
use frc_cache::{Cache, CacheStats};
use serde_json::{json, Value};

use super::{ApiError, AppState};

pub(super) async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.engine.cache().stats())
}

/// Clearing and pruning save every partition, so they leave the async workers.
async fn on_blocking_pool<T: Send + 'static>(
    state: &AppState,
    work: impl FnOnce(&Cache) -> T + Send + 'static,
) -> Result<T, ApiError> {
    let cache = Arc::clone(state.engine.cache());
    tokio::task::spawn_blocking(move || work(&cache))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "cache task failed");
            ApiError::internal("cache task failed")
        })
}

pub(super) async fn clear(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    on_blocking_pool(&state, Cache::clear_all).await?;
    tracing::info!("cache cleared on request");
    Ok(Json(json!({ "message": "Cache cleared successfully" })))
}

pub(super) async fn cleanup(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let removed = on_blocking_pool(&state, Cache::cleanup_expired).await?;
    tracing::info!(removed, "expired cache entries purged on request");
    Ok(Json(json!({ "message": "Expired cache entries cleaned up", "removed": removed })))
}
