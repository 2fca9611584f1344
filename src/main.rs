mod game;
mod identity;
mod leaderboard;
mod score;
mod shared;

use axum::{
    routing::{get, post},
    Router,
};
use score::repository::InMemoryScoreRepository;
// use score::repository::PostgresScoreRepository; // For production
use identity::directory::InMemoryProfileDirectory;
use shared::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "braingym=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting braingym score service");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let score_repository = Arc::new(InMemoryScoreRepository::new());
    let profile_directory = Arc::new(InMemoryProfileDirectory::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let score_repository = Arc::new(PostgresScoreRepository::new(pool));

    let app_state = AppState::new(score_repository, profile_directory);

    // build our application: submission, best-score, registration,
    // rankings, and identity routes
    let app = Router::new()
        .route("/scores", post(score::submit_score))
        .route("/scores/:game/best", get(score::best_score))
        .route("/guests", post(score::register_guest))
        .route("/rankings", get(leaderboard::all_rankings))
        .route("/rankings/:game", get(leaderboard::game_rankings))
        .route("/rankings/:game/me", get(leaderboard::own_rank))
        .route("/me", get(identity::whoami))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
