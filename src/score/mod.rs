// Public API - what other modules can use
pub use handlers::{best_score, register_guest, submit_score};
pub use models::{Partition, ScoreRecord};
pub use repository::{InMemoryScoreRepository, ScoreRepository};
pub use service::{ScoreService, SubmissionOutcome};

// Internal modules
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod service;
pub mod types;
