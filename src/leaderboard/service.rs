use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

use super::models::LeaderboardEntry;
use crate::game::{GameType, ScoreDirection};
use crate::identity::directory::ACCOUNT_FALLBACK_NAME;
use crate::identity::{Identity, IdentityResolver};
use crate::score::models::Partition;
use crate::score::repository::ScoreRepository;
use crate::score::policy;
use crate::shared::AppError;

/// Service for deriving ranked per-game leaderboards from the score records.
///
/// Read-only over the store: aggregation merges both identity partitions
/// into one view without ever writing back. A guest nickname that happens to
/// equal an authenticated display name shows up as two entries with the same
/// display string; that ambiguity is accepted, not resolved here.
pub struct LeaderboardAggregator {
    repository: Arc<dyn ScoreRepository + Send + Sync>,
    resolver: IdentityResolver,
}

impl LeaderboardAggregator {
    pub fn new(
        repository: Arc<dyn ScoreRepository + Send + Sync>,
        resolver: IdentityResolver,
    ) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Ranked entries for one game, best score per identity, both partitions.
    ///
    /// The reduction walks records in first-observed order and keeps the
    /// best per (partition, key), so historical duplicate rows collapse to
    /// one entry. The sort is stable, which makes reruns over unchanged
    /// data byte-identical, ties included.
    #[instrument(skip(self))]
    pub async fn rankings(&self, game: GameType) -> Result<Vec<LeaderboardEntry>, AppError> {
        let records = self.repository.find_all(game, None).await?;
        debug!(%game, record_count = records.len(), "Aggregating rankings");

        let mut order: Vec<(Partition, String)> = Vec::new();
        let mut best: HashMap<(Partition, String), i64> = HashMap::new();
        for record in records {
            let Some(score) = record.score else {
                // Registered-but-unplayed rows never rank.
                continue;
            };
            let key = (record.partition, record.identity_key);
            match best.entry(key) {
                Entry::Vacant(slot) => {
                    order.push(slot.key().clone());
                    slot.insert(score);
                }
                Entry::Occupied(mut slot) => {
                    if policy::is_better(game, score, Some(*slot.get())) {
                        slot.insert(score);
                    }
                }
            }
        }

        // One batched directory call for all authenticated identities.
        let account_ids: Vec<String> = order
            .iter()
            .filter(|(partition, _)| *partition == Partition::Authenticated)
            .map(|(_, key)| key.clone())
            .collect();
        let display_names = self.resolver.display_names(&account_ids).await?;

        let mut entries: Vec<LeaderboardEntry> = order
            .iter()
            .map(|key| {
                let score = best[key];
                let (partition, identity_key) = key;
                let (display_name, is_authenticated) = match partition {
                    Partition::Guest => (identity_key.clone(), false),
                    Partition::Authenticated => (
                        display_names
                            .get(identity_key)
                            .cloned()
                            .unwrap_or_else(|| ACCOUNT_FALLBACK_NAME.to_string()),
                        true,
                    ),
                };
                LeaderboardEntry {
                    display_name,
                    score,
                    rank: 0,
                    is_authenticated,
                }
            })
            .collect();

        match game.direction() {
            ScoreDirection::LowerIsBetter => entries.sort_by_key(|e| e.score),
            ScoreDirection::HigherIsBetter => entries.sort_by(|a, b| b.score.cmp(&a.score)),
        }
        for (position, entry) in entries.iter_mut().enumerate() {
            entry.rank = position as u32 + 1;
        }

        Ok(entries)
    }

    /// Rankings for every game in one pass.
    #[instrument(skip(self))]
    pub async fn rankings_all(
        &self,
    ) -> Result<HashMap<GameType, Vec<LeaderboardEntry>>, AppError> {
        let mut all = HashMap::new();
        for game in GameType::iter() {
            all.insert(game, self.rankings(game).await?);
        }
        Ok(all)
    }

    /// Locates the caller's entry by (display name, best score). A display
    /// convenience on top of `rankings`, so it inherits the accepted
    /// display-name collision ambiguity.
    #[instrument(skip(self, identity))]
    pub async fn own_entry(
        &self,
        game: GameType,
        identity: &Identity,
    ) -> Result<Option<LeaderboardEntry>, AppError> {
        let record = self
            .repository
            .find_one(identity.key(), identity.partition(), game)
            .await?;
        let Some(score) = record.and_then(|r| r.score) else {
            return Ok(None);
        };

        let display_name = self.resolver.display_name(identity).await?;
        let entries = self.rankings(game).await?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.display_name == display_name && entry.score == score))
    }
}
