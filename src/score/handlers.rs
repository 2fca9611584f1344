use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::ScoreService,
    types::{
        BestScoreResponse, RegisterGuestRequest, RegisterGuestResponse, SubmitScoreRequest,
        SubmitScoreResponse,
    },
};
use crate::game::GameType;
use crate::identity::{IdentityResolver, SessionContext};
use crate::shared::{AppError, AppState};

/// HTTP handler for submitting a score
///
/// POST /scores
/// Returns whether the candidate replaced the caller's stored best.
/// A storage failure is a 503, never reported as `accepted: false`.
#[instrument(name = "submit_score", skip(state, session))]
pub async fn submit_score(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<Json<SubmitScoreResponse>, AppError> {
    let resolver = IdentityResolver::new(Arc::clone(&state.profile_directory));
    let identity = resolver.resolve(&session);

    info!(game = %request.game, score = request.score, "Submitting score");

    let service = ScoreService::new(Arc::clone(&state.score_repository));
    let outcome = service.submit(&identity, request.game, request.score).await?;

    info!(
        game = %request.game,
        accepted = outcome.accepted,
        "Score submission completed"
    );

    Ok(Json(SubmitScoreResponse {
        accepted: outcome.accepted,
    }))
}

/// HTTP handler for reading the caller's best score for one game
///
/// GET /scores/:game/best
#[instrument(name = "best_score", skip(state, session))]
pub async fn best_score(
    State(state): State<AppState>,
    session: SessionContext,
    Path(game): Path<GameType>,
) -> Result<Json<BestScoreResponse>, AppError> {
    let resolver = IdentityResolver::new(Arc::clone(&state.profile_directory));
    let identity = resolver.resolve(&session);

    let service = ScoreService::new(Arc::clone(&state.score_repository));
    let score = service.best_score(&identity, game).await?;

    Ok(Json(BestScoreResponse {
        game,
        score,
        display: game.format_score(score),
    }))
}

/// HTTP handler for registering a guest nickname
///
/// POST /guests
/// Pre-seeds the six per-game rows for a fresh nickname; idempotent.
#[instrument(name = "register_guest", skip(state))]
pub async fn register_guest(
    State(state): State<AppState>,
    Json(request): Json<RegisterGuestRequest>,
) -> Result<Json<RegisterGuestResponse>, AppError> {
    let service = ScoreService::new(Arc::clone(&state.score_repository));
    let nickname = service.register_guest(&request.nickname).await?;

    state.snapshot_cache.remember_nickname(&nickname);

    info!(nickname = %nickname, "Guest registration completed");
    Ok(Json(RegisterGuestResponse { nickname }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::session::NICKNAME_HEADER;
    use crate::score::models::{Partition, ScoreRecord};
    use crate::score::repository::ScoreRepository;
    use crate::shared::test_utils::AppStateBuilder;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    /// Score repository whose every call fails, for the degraded path.
    struct UnreachableScoreRepository;

    #[async_trait]
    impl ScoreRepository for UnreachableScoreRepository {
        async fn find_one(
            &self,
            _identity_key: &str,
            _partition: Partition,
            _game: GameType,
        ) -> Result<Option<ScoreRecord>, AppError> {
            Err(AppError::StorageUnavailable("connection refused".to_string()))
        }
        async fn find_all(
            &self,
            _game: GameType,
            _partition: Option<Partition>,
        ) -> Result<Vec<ScoreRecord>, AppError> {
            Err(AppError::StorageUnavailable("connection refused".to_string()))
        }
        async fn upsert_if_better(
            &self,
            _identity_key: &str,
            _partition: Partition,
            _game: GameType,
            _score: i64,
        ) -> Result<bool, AppError> {
            Err(AppError::StorageUnavailable("connection refused".to_string()))
        }
        async fn insert_if_absent(&self, _rows: Vec<ScoreRecord>) -> Result<(), AppError> {
            Err(AppError::StorageUnavailable("connection refused".to_string()))
        }
    }

    fn app() -> Router {
        let app_state = AppStateBuilder::new().build();
        Router::new()
            .route("/scores", axum::routing::post(submit_score))
            .route("/scores/:game/best", axum::routing::get(best_score))
            .route("/guests", axum::routing::post(register_guest))
            .with_state(app_state)
    }

    fn post_score(nickname: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scores")
            .header("content-type", "application/json")
            .header(NICKNAME_HEADER, nickname)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(
        response: axum::response::Response,
    ) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_submit_score_handler_accepts_first_score() {
        let app = app();

        let response = app
            .oneshot(post_score("Alice", r#"{"game": "reaction", "score": 320}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let submit: SubmitScoreResponse = response_json(response).await;
        assert!(submit.accepted);
    }

    #[tokio::test]
    async fn test_submit_then_read_best() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_score("Alice", r#"{"game": "math", "score": 80}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("GET")
            .uri("/scores/math/best")
            .header(NICKNAME_HEADER, "Alice")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let best: BestScoreResponse = response_json(response).await;
        assert_eq!(best.score, Some(80));
        assert_eq!(best.display, "80pts");
    }

    #[tokio::test]
    async fn test_unplayed_game_reads_as_not_played() {
        let app = app();

        let request = Request::builder()
            .method("GET")
            .uri("/scores/typing/best")
            .header(NICKNAME_HEADER, "Alice")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let best: BestScoreResponse = response_json(response).await;
        assert_eq!(best.score, None);
        assert_eq!(best.display, "not played");
    }

    #[tokio::test]
    async fn test_negative_score_is_a_bad_request() {
        let app = app();

        let response = app
            .oneshot(post_score("Alice", r#"{"game": "math", "score": -5}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_storage_failure_is_couldnt_save_not_a_rejection() {
        let app_state = AppStateBuilder::new()
            .with_score_repository(Arc::new(UnreachableScoreRepository))
            .build();
        let app = Router::new()
            .route("/scores", axum::routing::post(submit_score))
            .with_state(app_state);

        let response = app
            .oneshot(post_score("Alice", r#"{"game": "reaction", "score": 280}"#))
            .await
            .unwrap();

        // A failed save is a distinct signal, never "you didn't beat your best".
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = response_json(response).await;
        assert!(body.get("accepted").is_none());
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn test_register_guest_handler() {
        let app = app();

        let request = Request::builder()
            .method("POST")
            .uri("/guests")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"nickname": "  Alice "}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let registered: RegisterGuestResponse = response_json(response).await;
        assert_eq!(registered.nickname, "Alice");
    }
}
