use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use super::models::LeaderboardEntry;
use crate::game::GameType;

/// Best-effort cache of the last successfully computed rankings and the
/// last registered nickname. Never a source of truth: every successful
/// aggregation overwrites it, and it only serves reads when the store is
/// unreachable so clients see stale data instead of nothing.
pub struct SnapshotCache {
    rankings: RwLock<HashMap<GameType, Vec<LeaderboardEntry>>>,
    nickname: RwLock<Option<String>>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            rankings: RwLock::new(HashMap::new()),
            nickname: RwLock::new(None),
        }
    }

    pub fn store_rankings(&self, game: GameType, entries: &[LeaderboardEntry]) {
        debug!(%game, entry_count = entries.len(), "Storing rankings snapshot");
        self.rankings
            .write()
            .unwrap()
            .insert(game, entries.to_vec());
    }

    pub fn last_known_rankings(&self, game: GameType) -> Option<Vec<LeaderboardEntry>> {
        self.rankings.read().unwrap().get(&game).cloned()
    }

    pub fn remember_nickname(&self, nickname: &str) {
        *self.nickname.write().unwrap() = Some(nickname.to_string());
    }

    pub fn last_nickname(&self) -> Option<String> {
        self.nickname.read().unwrap().clone()
    }
}
