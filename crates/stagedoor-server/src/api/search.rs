use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use stagedoor_db::search::{self, SearchResults};
use stagedoor_db::AppState;

use super::error_response;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// GET /api/venues/search?q=...
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, (StatusCode, String)> {
    search::search_venues(&state.db, params.q.trim(), Utc::now().fixed_offset())
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/artists/search?q=...
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, (StatusCode, String)> {
    search::search_artists(&state.db, params.q.trim(), Utc::now().fixed_offset())
        .await
        .map(Json)
        .map_err(error_response)
}
