//! Case-insensitive partial-match search over venue and artist names.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::entities::{artist, venue};
use crate::error::DirectoryError;
use crate::listings::{upcoming_show_count, ShowParty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

/// Lowercase the term and escape SQL LIKE wildcards so user input matches
/// literally (and cannot be abused to force expensive scans).
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Substring match on venue name; hits carry the upcoming-show count at the
/// supplied instant. Ordered by ascending id for reproducibility.
pub async fn search_venues<C: ConnectionTrait>(
    db: &C,
    term: &str,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<SearchResults, DirectoryError> {
    let pattern = like_pattern(term);
    let venues = venue::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                venue::Entity,
                venue::Column::Name,
            ))))
            .like(LikeExpr::new(pattern).escape('\\')),
        )
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?;

    let mut data = Vec::with_capacity(venues.len());
    for v in venues {
        let num_upcoming_shows = upcoming_show_count(db, ShowParty::Venue(v.id), now).await?;
        data.push(SearchHit {
            id: v.id,
            name: v.name,
            num_upcoming_shows,
        });
    }
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Substring match on artist name, symmetric with [`search_venues`].
pub async fn search_artists<C: ConnectionTrait>(
    db: &C,
    term: &str,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<SearchResults, DirectoryError> {
    let pattern = like_pattern(term);
    let artists = artist::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                artist::Entity,
                artist::Column::Name,
            ))))
            .like(LikeExpr::new(pattern).escape('\\')),
        )
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?;

    let mut data = Vec::with_capacity(artists.len());
    for a in artists {
        let num_upcoming_shows = upcoming_show_count(db, ShowParty::Artist(a.id), now).await?;
        data.push(SearchHit {
            id: a.id,
            name: a.name,
            num_upcoming_shows,
        });
    }
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}
