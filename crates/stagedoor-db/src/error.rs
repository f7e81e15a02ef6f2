//! Error taxonomy for the directory data services.

use sea_orm::DbErr;
use thiserror::Error;

/// Which table a not-found error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Venue => write!(f, "venue"),
            EntityKind::Artist => write!(f, "artist"),
            EntityKind::Show => write!(f, "show"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i32 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Store(#[from] DbErr),
}

impl DirectoryError {
    pub fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }

    /// True when the error should surface as a user-visible 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
