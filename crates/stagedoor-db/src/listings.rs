//! Aggregation and listing queries: upcoming/past show counts, the venues
//! index grouped by (city, state), and the shows join projection.

use sea_orm::sea_query::JoinType;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;

use crate::entities::{artist, show, venue};
use crate::error::DirectoryError;

/// Which side of a show a count is taken over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShowParty {
    Venue(i32),
    Artist(i32),
}

fn shows_for(party: ShowParty) -> sea_orm::Select<show::Entity> {
    match party {
        ShowParty::Venue(id) => show::Entity::find().filter(show::Column::VenueId.eq(id)),
        ShowParty::Artist(id) => show::Entity::find().filter(show::Column::ArtistId.eq(id)),
    }
}

/// Count shows strictly after `now`. The clock is an argument so callers
/// (and tests) control the instant the comparison is made against.
pub async fn upcoming_show_count<C: ConnectionTrait>(
    db: &C,
    party: ShowParty,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<u64, DirectoryError> {
    Ok(shows_for(party)
        .filter(show::Column::StartTime.gt(now))
        .count(db)
        .await?)
}

/// Count shows at or before `now`.
pub async fn past_show_count<C: ConnectionTrait>(
    db: &C,
    party: ShowParty,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<u64, DirectoryError> {
    Ok(shows_for(party)
        .filter(show::Column::StartTime.lte(now))
        .count(db)
        .await?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Partition all venues by their unique (city, state) pair. The source
/// guarantees no order, so a deterministic one is imposed: groups ascend by
/// (city, state), venues within a group by id.
pub async fn group_venues_by_area<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<AreaGroup>, DirectoryError> {
    let venues = venue::Entity::find()
        .order_by_asc(venue::Column::City)
        .order_by_asc(venue::Column::State)
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?;

    let mut areas: Vec<AreaGroup> = Vec::new();
    for v in venues {
        if let Some(area) = areas.last_mut() {
            if area.city == v.city && area.state == v.state {
                area.venues.push(VenueSummary {
                    id: v.id,
                    name: v.name,
                });
                continue;
            }
        }
        areas.push(AreaGroup {
            city: v.city,
            state: v.state,
            venues: vec![VenueSummary {
                id: v.id,
                name: v.name,
            }],
        });
    }
    Ok(areas)
}

/// One row of the shows index: an inner-join projection over
/// shows x venues x artists. A show whose referenced venue or artist is
/// missing drops out of the join rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ShowListing {
    pub show_id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: chrono::DateTime<chrono::FixedOffset>,
}

pub async fn list_shows<C: ConnectionTrait>(db: &C) -> Result<Vec<ShowListing>, DirectoryError> {
    let rows = show::Entity::find()
        .join(JoinType::InnerJoin, show::Relation::Venue.def())
        .join(JoinType::InnerJoin, show::Relation::Artist.def())
        .select_only()
        .column_as(show::Column::Id, "show_id")
        .column_as(show::Column::VenueId, "venue_id")
        .column_as(venue::Column::Name, "venue_name")
        .column_as(show::Column::ArtistId, "artist_id")
        .column_as(artist::Column::Name, "artist_name")
        .column_as(artist::Column::ImageLink, "artist_image_link")
        .column_as(show::Column::StartTime, "start_time")
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .into_model::<ShowListing>()
        .all(db)
        .await?;
    Ok(rows)
}
