// Library crate for the braingym score service
// This file exposes the public API for integration tests

pub mod game;
pub mod identity;
pub mod leaderboard;
pub mod score;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use game::{GameType, ScoreDirection};
pub use identity::{Identity, IdentityResolver, SessionContext};
pub use leaderboard::{LeaderboardAggregator, LeaderboardEntry};
pub use score::{InMemoryScoreRepository, Partition, ScoreRecord, ScoreService, SubmissionOutcome};
pub use shared::{AppError, AppState};
