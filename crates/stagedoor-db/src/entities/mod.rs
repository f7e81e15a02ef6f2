use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

pub mod artist;
pub mod show;
pub mod venue;

/// Ordered genre tags, stored as a JSON column so the same schema works on
/// Postgres and SQLite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Genres(pub Vec<String>);

impl From<Vec<String>> for Genres {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}
