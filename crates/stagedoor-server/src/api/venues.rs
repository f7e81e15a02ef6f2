use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stagedoor_db::entities::venue;
use stagedoor_db::listings::{self, AreaGroup, ShowParty};
use stagedoor_db::store::{self, VenueInput};
use stagedoor_db::AppState;

use super::error_response;

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub talent_description: Option<String>,
    pub genres: Vec<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<venue::Model> for VenueResponse {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            image_link: v.image_link,
            website: v.website,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            talent_description: v.talent_description,
            genres: v.genres.0,
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub upcoming_shows_count: u64,
    pub past_shows_count: u64,
}

/// Full-replace payload, shared by create and update.
#[derive(Debug, Deserialize)]
pub struct VenueRequest {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    pub talent_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl From<VenueRequest> for VenueInput {
    fn from(r: VenueRequest) -> Self {
        Self {
            name: r.name,
            city: r.city,
            state: r.state,
            address: r.address,
            phone: r.phone,
            image_link: r.image_link,
            website: r.website,
            facebook_link: r.facebook_link,
            seeking_talent: r.seeking_talent,
            talent_description: r.talent_description,
            genres: r.genres,
        }
    }
}

/// GET /api/venues — the venues index, grouped by (city, state)
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AreaGroup>>, (StatusCode, String)> {
    listings::group_venues_by_area(&state.db)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/venues
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VenueRequest>,
) -> Result<(StatusCode, Json<VenueResponse>), (StatusCode, String)> {
    let venue = store::create_venue(&state.db, &req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(venue.into())))
}

/// GET /api/venues/{id}
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetailResponse>, (StatusCode, String)> {
    let venue = store::get_venue(&state.db, id)
        .await
        .map_err(error_response)?;

    let now = Utc::now().fixed_offset();
    let upcoming_shows_count =
        listings::upcoming_show_count(&state.db, ShowParty::Venue(id), now)
            .await
            .map_err(error_response)?;
    let past_shows_count = listings::past_show_count(&state.db, ShowParty::Venue(id), now)
        .await
        .map_err(error_response)?;

    Ok(Json(VenueDetailResponse {
        venue: venue.into(),
        upcoming_shows_count,
        past_shows_count,
    }))
}

/// PUT /api/venues/{id} — full replace of mutable fields
pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<VenueRequest>,
) -> Result<Json<VenueResponse>, (StatusCode, String)> {
    let venue = store::update_venue(&state.db, id, &req.into())
        .await
        .map_err(error_response)?;
    Ok(Json(venue.into()))
}

/// DELETE /api/venues/{id}
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, (StatusCode, String)> {
    store::delete_venue(&state.db, id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
