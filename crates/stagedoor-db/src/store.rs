//! Entity store: validated create/get/update/delete over venues, artists
//! and shows. Every mutation runs in its own short-lived transaction;
//! dropping the transaction on an error path rolls it back.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::entities::{artist, show, venue};
use crate::error::{DirectoryError, EntityKind};

fn require(field: &'static str, value: &str) -> Result<(), DirectoryError> {
    if value.trim().is_empty() {
        return Err(DirectoryError::Validation(format!(
            "{field} must not be blank"
        )));
    }
    Ok(())
}

/// Venue payload for create and full-replace update.
#[derive(Clone, Debug, Default)]
pub struct VenueInput {
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
}

impl VenueInput {
    fn validate(&self) -> Result<(), DirectoryError> {
        require("name", &self.name)?;
        require("city", &self.city)?;
        require("state", &self.state)?;
        require("address", &self.address)
    }

    fn apply(&self, model: &mut venue::ActiveModel) {
        model.name = Set(self.name.clone());
        model.city = Set(self.city.clone());
        model.state = Set(self.state.clone());
        model.address = Set(self.address.clone());
        model.phone = Set(self.phone.clone());
        model.image_link = Set(self.image_link.clone());
        model.website = Set(self.website.clone());
        model.facebook_link = Set(self.facebook_link.clone());
        model.seeking_talent = Set(self.seeking_talent);
        model.talent_description = Set(self.talent_description.clone());
        model.genres = Set(self.genres.clone().into());
    }
}

/// Artist payload for create and full-replace update.
#[derive(Clone, Debug, Default)]
pub struct ArtistInput {
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
}

impl ArtistInput {
    fn validate(&self) -> Result<(), DirectoryError> {
        require("name", &self.name)?;
        require("city", &self.city)?;
        require("state", &self.state)
    }

    fn apply(&self, model: &mut artist::ActiveModel) {
        model.name = Set(self.name.clone());
        model.city = Set(self.city.clone());
        model.state = Set(self.state.clone());
        model.phone = Set(self.phone.clone());
        model.image_link = Set(self.image_link.clone());
        model.website = Set(self.website.clone());
        model.facebook_link = Set(self.facebook_link.clone());
        model.seeking_venue = Set(self.seeking_venue);
        model.seeking_description = Set(self.seeking_description.clone());
        model.genres = Set(self.genres.clone().into());
    }
}

/// Show payload. `start_time` falls back to the creation instant.
#[derive(Clone, Debug)]
pub struct ShowInput {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: Option<chrono::DateTime<chrono::FixedOffset>>,
}

impl ShowInput {
    fn validate(&self) -> Result<(), DirectoryError> {
        if self.artist_id <= 0 {
            return Err(DirectoryError::Validation(
                "artist_id must be a positive id".into(),
            ));
        }
        if self.venue_id <= 0 {
            return Err(DirectoryError::Validation(
                "venue_id must be a positive id".into(),
            ));
        }
        Ok(())
    }
}

// ── Venues ───────────────────────────────────────────────────────────

pub async fn create_venue(
    db: &DatabaseConnection,
    input: &VenueInput,
) -> Result<venue::Model, DirectoryError> {
    input.validate()?;

    let txn = db.begin().await?;
    let mut venue = venue::ActiveModel {
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    input.apply(&mut venue);
    let venue = venue.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(venue_id = venue.id, name = %venue.name, "venue created");
    Ok(venue)
}

pub async fn get_venue<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<venue::Model, DirectoryError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound {
            kind: EntityKind::Venue,
            id,
        })
}

pub async fn update_venue(
    db: &DatabaseConnection,
    id: i32,
    input: &VenueInput,
) -> Result<venue::Model, DirectoryError> {
    input.validate()?;

    let txn = db.begin().await?;
    let mut venue: venue::ActiveModel = get_venue(&txn, id).await?.into();
    input.apply(&mut venue);
    let venue = venue.update(&txn).await?;
    txn.commit().await?;

    Ok(venue)
}

pub async fn delete_venue(db: &DatabaseConnection, id: i32) -> Result<(), DirectoryError> {
    let txn = db.begin().await?;
    let venue = get_venue(&txn, id).await?;
    // The FK cascades on Postgres; delete dependent shows explicitly so
    // SQLite behaves the same without the foreign_keys pragma.
    show::Entity::delete_many()
        .filter(show::Column::VenueId.eq(id))
        .exec(&txn)
        .await?;
    venue.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(venue_id = id, "venue deleted");
    Ok(())
}

// ── Artists ──────────────────────────────────────────────────────────

pub async fn create_artist(
    db: &DatabaseConnection,
    input: &ArtistInput,
) -> Result<artist::Model, DirectoryError> {
    input.validate()?;

    let txn = db.begin().await?;
    let mut artist = artist::ActiveModel {
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    input.apply(&mut artist);
    let artist = artist.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(artist_id = artist.id, name = %artist.name, "artist created");
    Ok(artist)
}

pub async fn get_artist<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<artist::Model, DirectoryError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound {
            kind: EntityKind::Artist,
            id,
        })
}

pub async fn update_artist(
    db: &DatabaseConnection,
    id: i32,
    input: &ArtistInput,
) -> Result<artist::Model, DirectoryError> {
    input.validate()?;

    let txn = db.begin().await?;
    let mut artist: artist::ActiveModel = get_artist(&txn, id).await?.into();
    input.apply(&mut artist);
    let artist = artist.update(&txn).await?;
    txn.commit().await?;

    Ok(artist)
}

pub async fn delete_artist(db: &DatabaseConnection, id: i32) -> Result<(), DirectoryError> {
    let txn = db.begin().await?;
    let artist = get_artist(&txn, id).await?;
    show::Entity::delete_many()
        .filter(show::Column::ArtistId.eq(id))
        .exec(&txn)
        .await?;
    artist.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(artist_id = id, "artist deleted");
    Ok(())
}

// ── Shows ────────────────────────────────────────────────────────────

pub async fn create_show(
    db: &DatabaseConnection,
    input: &ShowInput,
) -> Result<show::Model, DirectoryError> {
    input.validate()?;

    let txn = db.begin().await?;
    // Checked here rather than left to the FK constraint so a dangling id
    // surfaces as a typed not-found error instead of a backend-specific
    // constraint violation.
    get_artist(&txn, input.artist_id).await?;
    get_venue(&txn, input.venue_id).await?;

    let show = show::ActiveModel {
        artist_id: Set(input.artist_id),
        venue_id: Set(input.venue_id),
        start_time: Set(input.start_time.unwrap_or_else(|| Utc::now().fixed_offset())),
        ..Default::default()
    };
    let show = show.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        show_id = show.id,
        artist_id = show.artist_id,
        venue_id = show.venue_id,
        "show created"
    );
    Ok(show)
}

pub async fn get_show<C: ConnectionTrait>(db: &C, id: i32) -> Result<show::Model, DirectoryError> {
    show::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound {
            kind: EntityKind::Show,
            id,
        })
}
