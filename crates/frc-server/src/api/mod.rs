mod cache;
mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use frc_cache::CacheStats;
use frc_search::SearchEngine;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

/// Error body shared by every route: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

const FEATURES: [&str; 5] = [
    "Catalog lookup with aliases",
    "Shopify search integration",
    "WooCommerce search integration",
    "JSON-LD validation",
    "FRC part recognition",
];

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    message: &'static str,
    category_count: usize,
    vendors: Vec<String>,
    cache_stats: CacheStats,
    features: [&'static str; 5],
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search::search))
        .route("/api/search/{family}", get(search::search_family))
        .route("/api/cache/stats", get(cache::stats))
        .route("/api/cache/clear", post(cache::clear))
        .route("/api/cache/cleanup", post(cache::cleanup))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let engine = &state.engine;
    Json(HealthData {
        status: "ok",
        message: "FRC Parts Finder API",
        category_count: engine.catalog().canonical_count(),
        vendors: engine
            .catalog()
            .fallback_vendors()
            .iter()
            .map(|v| v.name.clone())
            .collect(),
        cache_stats: engine.cache().stats(),
        features: FEATURES,
    })
}

#[must_use]
pub fn rate_limit_state(per_minute: u32) -> RateLimitState {
    RateLimitState::new(
        usize::try_from(per_minute).unwrap_or(usize::MAX),
        Duration::from_secs(60),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
