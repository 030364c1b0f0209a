use axum::{
    extract::{Path, Query, State},
    Json,
};
use frc_core::VendorFamily;
use frc_search::SearchResponse;
use serde::Deserialize;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

impl SearchParams {
    fn query(&self) -> Result<&str, ApiError> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ApiError::bad_request("query parameter 'q' is required"))
    }
}

pub(super) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.query()?;
    Ok(Json(state.engine.search(query).await))
}

pub(super) async fn search_family(
    State(state): State<AppState>,
    Path(family): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let family: VendorFamily = family.parse().map_err(ApiError::not_found)?;
    let query = params.query()?;
    Ok(Json(state.engine.search_family(query, family).await))
}
