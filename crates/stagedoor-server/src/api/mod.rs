pub mod artists;
pub mod search;
pub mod shows;
pub mod venues;

use axum::http::StatusCode;
use stagedoor_db::error::DirectoryError;

/// Map a data-service error onto the HTTP surface. Store failures are
/// logged here and reported to the client generically.
pub fn error_response(err: DirectoryError) -> (StatusCode, String) {
    match err {
        DirectoryError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        DirectoryError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        DirectoryError::Store(e) => {
            tracing::error!("database error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    }
}
