use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::identity::directory::ProfileDirectory;
use crate::leaderboard::SnapshotCache;
use crate::score::repository::ScoreRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub score_repository: Arc<dyn ScoreRepository + Send + Sync>,
    pub profile_directory: Arc<dyn ProfileDirectory + Send + Sync>,
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl AppState {
    pub fn new(
        score_repository: Arc<dyn ScoreRepository + Send + Sync>,
        profile_directory: Arc<dyn ProfileDirectory + Send + Sync>,
    ) -> Self {
        Self {
            score_repository,
            profile_directory,
            snapshot_cache: Arc::new(SnapshotCache::new()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// A read or write against the score store failed (network/backend).
    /// Never reported to callers as "not better"; it gets its own status.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Candidate score failed validation before any storage access.
    /// A contract violation by the submitting game, not a user condition.
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::StorageUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Storage unavailable: {}", msg),
            ),
            AppError::InvalidScore(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
