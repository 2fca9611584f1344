use serde::{Deserialize, Serialize};

use crate::game::GameType;

/// Request payload for submitting a finished game's score
#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub game: GameType,
    pub score: i64,
}

/// Response for a score submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    pub accepted: bool,
}

/// Request payload for registering a guest nickname
#[derive(Debug, Deserialize)]
pub struct RegisterGuestRequest {
    pub nickname: String,
}

/// Response for guest registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterGuestResponse {
    pub nickname: String,
}

/// Response for a best-score lookup; `score` is null when the game has not
/// been played yet and `display` carries the rendered form ("320ms",
/// "not played").
#[derive(Debug, Serialize, Deserialize)]
pub struct BestScoreResponse {
    pub game: GameType,
    pub score: Option<i64>,
    pub display: String,
}
