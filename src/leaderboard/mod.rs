// Public API - what other modules can use
pub use handlers::{all_rankings, game_rankings, own_rank};
pub use models::LeaderboardEntry;
pub use service::LeaderboardAggregator;
pub use snapshot::SnapshotCache;

// Internal modules
pub mod handlers;
pub mod models;
pub mod service;
pub mod snapshot;
pub mod types;
