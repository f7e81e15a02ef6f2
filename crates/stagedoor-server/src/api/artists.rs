use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stagedoor_db::entities::artist;
use stagedoor_db::listings::{self, ShowParty};
use stagedoor_db::store::{self, ArtistInput};
use stagedoor_db::AppState;

use super::error_response;

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Normalize pagination input. `per_page` is clamped to 1..=100; a zero
/// would make the total-pages division panic.
fn page_window(params: &PaginationParams) -> (u64, u64) {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page)
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            website: a.website,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            genres: a.genres.0,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    pub upcoming_shows_count: u64,
    pub past_shows_count: u64,
}

/// Full-replace payload, shared by create and update.
#[derive(Debug, Deserialize)]
pub struct ArtistRequest {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl From<ArtistRequest> for ArtistInput {
    fn from(r: ArtistRequest) -> Self {
        Self {
            name: r.name,
            city: r.city,
            state: r.state,
            phone: r.phone,
            image_link: r.image_link,
            website: r.website,
            facebook_link: r.facebook_link,
            seeking_venue: r.seeking_venue,
            seeking_description: r.seeking_description,
            genres: r.genres,
        }
    }
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<ArtistResponse>>, (StatusCode, String)> {
    let (page, per_page) = page_window(&params);

    let paginator = artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .paginate(&state.db, per_page);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| error_response(e.into()))?;

    let artists = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|e| error_response(e.into()))?;

    let total_pages = total.div_ceil(per_page);

    Ok(Json(PaginatedResponse {
        data: artists.into_iter().map(ArtistResponse::from).collect(),
        total,
        page,
        per_page,
        total_pages,
    }))
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), (StatusCode, String)> {
    let artist = store::create_artist(&state.db, &req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(artist.into())))
}

/// GET /api/artists/{id}
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetailResponse>, (StatusCode, String)> {
    let artist = store::get_artist(&state.db, id)
        .await
        .map_err(error_response)?;

    let now = Utc::now().fixed_offset();
    let upcoming_shows_count =
        listings::upcoming_show_count(&state.db, ShowParty::Artist(id), now)
            .await
            .map_err(error_response)?;
    let past_shows_count = listings::past_show_count(&state.db, ShowParty::Artist(id), now)
        .await
        .map_err(error_response)?;

    Ok(Json(ArtistDetailResponse {
        artist: artist.into(),
        upcoming_shows_count,
        past_shows_count,
    }))
}

/// PUT /api/artists/{id} — full replace of mutable fields
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<ArtistRequest>,
) -> Result<Json<ArtistResponse>, (StatusCode, String)> {
    let artist = store::update_artist(&state.db, id, &req.into())
        .await
        .map_err(error_response)?;
    Ok(Json(artist.into()))
}

/// DELETE /api/artists/{id}
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, (StatusCode, String)> {
    store::delete_artist(&state.db, id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
