use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use super::models::{Partition, ScoreRecord};
use super::policy;
use super::repository::ScoreRepository;
use crate::game::GameType;
use crate::identity::{Identity, GUEST_FALLBACK_NAME};
use crate::shared::AppError;

/// Outcome of a single submission. `accepted = false` means the write path
/// ran and the candidate was not better; storage failures surface as errors
/// instead, never as a rejected outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub accepted: bool,
}

/// Service for handling score submission business logic
pub struct ScoreService {
    repository: Arc<dyn ScoreRepository + Send + Sync>,
}

impl ScoreService {
    pub fn new(repository: Arc<dyn ScoreRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Submits a candidate score for the identity's (partition, game) row.
    ///
    /// The common not-better case returns without touching the store. The
    /// write itself is a conditional upsert whose comparison is re-evaluated
    /// at write time, so a concurrently landed better score stays put and
    /// this submission reports `accepted = false`.
    #[instrument(skip(self, identity), fields(identity_key = %identity.key()))]
    pub async fn submit(
        &self,
        identity: &Identity,
        game: GameType,
        candidate: i64,
    ) -> Result<SubmissionOutcome, AppError> {
        if candidate < 0 {
            return Err(AppError::InvalidScore(format!(
                "score must be non-negative, got {}",
                candidate
            )));
        }

        let current = self
            .repository
            .find_one(identity.key(), identity.partition(), game)
            .await?;
        let current_best = current.and_then(|record| record.score);

        if !policy::is_better(game, candidate, current_best) {
            debug!(%game, candidate, ?current_best, "Candidate does not beat stored best");
            return Ok(SubmissionOutcome { accepted: false });
        }

        let accepted = self
            .repository
            .upsert_if_better(identity.key(), identity.partition(), game, candidate)
            .await?;

        info!(%game, candidate, accepted, "Score submission processed");
        Ok(SubmissionOutcome { accepted })
    }

    /// One-time guest registration: pre-seeds one unplayed row per game so a
    /// fresh nickname shows defined-but-empty state. Idempotent; existing
    /// rows (including real scores) are left untouched.
    #[instrument(skip(self))]
    pub async fn register_guest(&self, nickname: &str) -> Result<String, AppError> {
        let nickname = {
            let trimmed = nickname.trim();
            if trimmed.is_empty() {
                GUEST_FALLBACK_NAME.to_string()
            } else {
                trimmed.to_string()
            }
        };

        let rows: Vec<ScoreRecord> = GameType::iter()
            .map(|game| ScoreRecord::unplayed(nickname.clone(), Partition::Guest, game))
            .collect();
        self.repository.insert_if_absent(rows).await?;

        info!(nickname = %nickname, "Guest registered");
        Ok(nickname)
    }

    /// Current stored best for an identity and game. Absence and an
    /// unplayed pre-seeded row both read as no score.
    #[instrument(skip(self, identity), fields(identity_key = %identity.key()))]
    pub async fn best_score(
        &self,
        identity: &Identity,
        game: GameType,
    ) -> Result<Option<i64>, AppError> {
        let record = self
            .repository
            .find_one(identity.key(), identity.partition(), game)
            .await?;
        Ok(record.and_then(|r| r.score))
    }
}
