//! End-to-end submission and ranking flows over the public HTTP surface.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use tower::ServiceExt; // for `oneshot`

use braingym::identity::directory::{AccountProfile, InMemoryProfileDirectory};
use braingym::identity::session::NICKNAME_HEADER;
use braingym::leaderboard::types::RankingsResponse;
use braingym::score::types::SubmitScoreResponse;
use braingym::{
    AppState, GameType, Identity, IdentityResolver, InMemoryScoreRepository, LeaderboardAggregator,
    ScoreService,
};

fn app_with(
    repository: Arc<InMemoryScoreRepository>,
    directory: Arc<InMemoryProfileDirectory>,
) -> Router {
    let state = AppState::new(repository, directory);
    Router::new()
        .route("/scores", post(braingym::score::submit_score))
        .route("/scores/:game/best", get(braingym::score::best_score))
        .route("/guests", post(braingym::score::register_guest))
        .route("/rankings", get(braingym::leaderboard::all_rankings))
        .route("/rankings/:game", get(braingym::leaderboard::game_rankings))
        .route("/rankings/:game/me", get(braingym::leaderboard::own_rank))
        .route("/me", get(braingym::identity::whoami))
        .with_state(state)
}

fn app() -> Router {
    app_with(
        Arc::new(InMemoryScoreRepository::new()),
        Arc::new(InMemoryProfileDirectory::new()),
    )
}

async fn submit(app: &Router, nickname: &str, game: &str, score: i64) -> SubmitScoreResponse {
    let body = format!(r#"{{"game": "{}", "score": {}}}"#, game, score);
    let request = Request::builder()
        .method("POST")
        .uri("/scores")
        .header("content-type", "application/json")
        .header(NICKNAME_HEADER, nickname)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn rankings(app: &Router, game: &str) -> RankingsResponse {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/rankings/{}", game))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_reaction_best_survives_worse_followup() {
    // Scenario: 320, then an improvement to 280, then a regression attempt.
    let app = app();

    assert!(submit(&app, "Alice", "reaction", 320).await.accepted);
    assert!(submit(&app, "Alice", "reaction", 280).await.accepted);
    assert!(!submit(&app, "Alice", "reaction", 300).await.accepted);

    let board = rankings(&app, "reaction").await;
    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].score, 280);
}

#[tokio::test]
async fn test_math_ranking_orders_guests_by_points() {
    let app = app();

    submit(&app, "Bob", "math", 50).await;
    submit(&app, "Alice", "math", 80).await;

    let board = rankings(&app, "math").await;
    assert_eq!(board.entries.len(), 2);
    assert_eq!(board.entries[0].display_name, "Alice");
    assert_eq!(board.entries[0].score, 80);
    assert_eq!(board.entries[0].rank, 1);
    assert_eq!(board.entries[1].display_name, "Bob");
    assert_eq!(board.entries[1].score, 50);
    assert_eq!(board.entries[1].rank, 2);
}

#[tokio::test]
async fn test_racing_duplicate_submissions_leave_one_record() {
    let repository = Arc::new(InMemoryScoreRepository::new());
    let service = ScoreService::new(repository.clone());
    let alice = Identity::Guest {
        nickname: "Alice".to_string(),
    };

    let (first, second) = tokio::join!(
        service.submit(&alice, GameType::Reaction, 280),
        service.submit(&alice, GameType::Reaction, 280),
    );
    first.unwrap();
    second.unwrap();

    assert_eq!(repository.record_count(), 1);
    assert_eq!(
        service
            .best_score(&alice, GameType::Reaction)
            .await
            .unwrap(),
        Some(280)
    );
}

#[tokio::test]
async fn test_stored_score_is_pointwise_best_of_all_submissions() {
    let repository = Arc::new(InMemoryScoreRepository::new());
    let service = ScoreService::new(repository.clone());
    let alice = Identity::Guest {
        nickname: "Alice".to_string(),
    };

    let reaction_candidates = [500, 350, 420, 280, 280, 330];
    for candidate in reaction_candidates {
        service
            .submit(&alice, GameType::Reaction, candidate)
            .await
            .unwrap();
    }
    let typing_candidates = [20, 55, 40, 55, 70];
    for candidate in typing_candidates {
        service
            .submit(&alice, GameType::Typing, candidate)
            .await
            .unwrap();
    }

    assert_eq!(
        service.best_score(&alice, GameType::Reaction).await.unwrap(),
        Some(280)
    );
    assert_eq!(
        service.best_score(&alice, GameType::Typing).await.unwrap(),
        Some(70)
    );
    // One row per identity+game, regardless of accept/reject mix.
    assert_eq!(repository.record_count(), 2);
}

#[tokio::test]
async fn test_rankings_are_deterministic_across_reruns() {
    let app = app();

    submit(&app, "A", "memory", 10).await;
    submit(&app, "B", "memory", 10).await;
    submit(&app, "C", "memory", 12).await;

    let first = rankings(&app, "memory").await;
    let second = rankings(&app, "memory").await;

    assert_eq!(first.entries, second.entries);
    assert_eq!(first.entries[0].display_name, "C");
    // Tied identities keep first-observed order with distinct ranks.
    assert_eq!(first.entries[1].display_name, "A");
    assert_eq!(first.entries[1].rank, 2);
    assert_eq!(first.entries[2].display_name, "B");
    assert_eq!(first.entries[2].rank, 3);
}

#[tokio::test]
async fn test_guest_and_account_with_same_display_name_stay_separate_rows() {
    let repository = Arc::new(InMemoryScoreRepository::new());
    let directory = Arc::new(InMemoryProfileDirectory::with_profiles(vec![(
        "acct-1".to_string(),
        AccountProfile {
            display_name: Some("Alice".to_string()),
            ..AccountProfile::default()
        },
    )]));
    let service = ScoreService::new(repository.clone());

    let guest = Identity::Guest {
        nickname: "Alice".to_string(),
    };
    let account = Identity::Authenticated {
        account_id: "acct-1".to_string(),
    };
    service.submit(&guest, GameType::Color, 30).await.unwrap();
    service.submit(&account, GameType::Color, 45).await.unwrap();

    let aggregator = LeaderboardAggregator::new(
        repository.clone(),
        IdentityResolver::new(directory.clone()),
    );
    let entries = aggregator.rankings(GameType::Color).await.unwrap();

    // Same display string twice is accepted ambiguity; the identities are
    // still ranked as two distinct entries.
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].display_name, "Alice");
    assert!(entries[0].is_authenticated);
    assert_eq!(entries[1].display_name, "Alice");
    assert!(!entries[1].is_authenticated);
    assert_eq!(repository.record_count(), 2);
}

#[tokio::test]
async fn test_registered_guest_appears_unplayed_until_first_score() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/guests")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"nickname": "Fresh"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Registered rows are defined but empty: no ranking entry yet.
    let board = rankings(&app, "math").await;
    assert!(board.entries.is_empty());

    submit(&app, "Fresh", "math", 42).await;
    let board = rankings(&app, "math").await;
    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].display_name, "Fresh");
}

#[tokio::test]
async fn test_authenticated_scores_rank_under_resolved_display_name() {
    let repository = Arc::new(InMemoryScoreRepository::new());
    let directory = Arc::new(InMemoryProfileDirectory::with_profiles(vec![(
        "acct-9".to_string(),
        AccountProfile {
            email: Some("carol@example.com".to_string()),
            ..AccountProfile::default()
        },
    )]));
    let app = app_with(repository.clone(), directory);

    let service = ScoreService::new(repository);
    service
        .submit(
            &Identity::Authenticated {
                account_id: "acct-9".to_string(),
            },
            GameType::Pattern,
            7,
        )
        .await
        .unwrap();

    let board = rankings(&app, "pattern").await;
    assert_eq!(board.entries.len(), 1);
    // Email-only account: display name is the local part.
    assert_eq!(board.entries[0].display_name, "carol");
    assert!(board.entries[0].is_authenticated);
}
