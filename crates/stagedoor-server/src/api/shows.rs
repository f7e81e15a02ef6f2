use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stagedoor_db::entities::show;
use stagedoor_db::listings::{self, ShowListing};
use stagedoor_db::store::{self, ShowInput};
use stagedoor_db::AppState;

use super::error_response;

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub id: i32,
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: chrono::DateTime<chrono::FixedOffset>,
}

impl From<show::Model> for ShowResponse {
    fn from(s: show::Model) -> Self {
        Self {
            id: s.id,
            artist_id: s.artist_id,
            venue_id: s.venue_id,
            start_time: s.start_time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateShowRequest {
    pub artist_id: i32,
    pub venue_id: i32,
    /// Defaults to the creation instant when omitted.
    pub start_time: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// GET /api/shows — the shows index, joined with venue and artist names
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowListing>>, (StatusCode, String)> {
    listings::list_shows(&state.db)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/shows
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShowRequest>,
) -> Result<(StatusCode, Json<ShowResponse>), (StatusCode, String)> {
    let input = ShowInput {
        artist_id: req.artist_id,
        venue_id: req.venue_id,
        start_time: req.start_time,
    };
    let show = store::create_show(&state.db, &input)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(show.into())))
}
