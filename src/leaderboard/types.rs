use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::LeaderboardEntry;
use crate::game::GameType;

/// Response for a single game's rankings. `cached` marks a stale snapshot
/// served because the score store was unreachable.
#[derive(Debug, Serialize, Deserialize)]
pub struct RankingsResponse {
    pub game: GameType,
    pub entries: Vec<LeaderboardEntry>,
    pub cached: bool,
}

/// Response for all games' rankings in one call
#[derive(Debug, Serialize, Deserialize)]
pub struct AllRankingsResponse {
    pub rankings: HashMap<GameType, Vec<LeaderboardEntry>>,
}

/// Response for the caller's own rank in one game; `entry` is null when the
/// caller has no recorded score for that game.
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnRankResponse {
    pub game: GameType,
    pub entry: Option<LeaderboardEntry>,
}
