use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{Partition, ScoreRecord};
use super::policy;
use crate::game::GameType;
use crate::shared::AppError;

/// Storage boundary for score records.
///
/// `upsert_if_better` is the concurrency-bearing primitive: the comparison
/// is re-evaluated atomically at write time, so two racing submissions for
/// the same identity+game can never end with the worse score stored.
#[async_trait]
pub trait ScoreRepository {
    async fn find_one(
        &self,
        identity_key: &str,
        partition: Partition,
        game: GameType,
    ) -> Result<Option<ScoreRecord>, AppError>;

    /// All records for a game, optionally restricted to one partition,
    /// ordered by first observation (creation time).
    async fn find_all(
        &self,
        game: GameType,
        partition: Option<Partition>,
    ) -> Result<Vec<ScoreRecord>, AppError>;

    /// Atomic conditional upsert: inserts or replaces the single record for
    /// (identity_key, partition, game) only when `score` beats the stored
    /// value per the game's direction. Returns whether the write happened.
    async fn upsert_if_better(
        &self,
        identity_key: &str,
        partition: Partition,
        game: GameType,
        score: i64,
    ) -> Result<bool, AppError>;

    /// Inserts the given rows, skipping any whose key already exists.
    /// Used for the idempotent guest pre-seed; never deletes or replaces.
    async fn insert_if_absent(&self, rows: Vec<ScoreRecord>) -> Result<(), AppError>;
}

/// In-memory implementation of ScoreRepository for development and testing
///
/// A single mutex guards the whole record set, so the conditional upsert is
/// naturally atomic. Rows keep insertion order, which gives `find_all` the
/// first-observed ordering the ranking determinism rests on.
pub struct InMemoryScoreRepository {
    records: Mutex<Vec<ScoreRecord>>,
}

impl Default for InMemoryScoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated records
    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Returns the current number of stored records
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self))]
    async fn find_one(
        &self,
        identity_key: &str,
        partition: Partition,
        game: GameType,
    ) -> Result<Option<ScoreRecord>, AppError> {
        debug!(identity_key = %identity_key, %partition, %game, "Fetching score record from memory");

        let records = self.records.lock().unwrap();
        let record = records
            .iter()
            .find(|r| r.identity_key == identity_key && r.partition == partition && r.game == game)
            .cloned();

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_all(
        &self,
        game: GameType,
        partition: Option<Partition>,
    ) -> Result<Vec<ScoreRecord>, AppError> {
        debug!(%game, ?partition, "Listing score records from memory");

        let records = self.records.lock().unwrap();
        let matched = records
            .iter()
            .filter(|r| r.game == game && partition.map_or(true, |p| r.partition == p))
            .cloned()
            .collect();

        Ok(matched)
    }

    #[instrument(skip(self))]
    async fn upsert_if_better(
        &self,
        identity_key: &str,
        partition: Partition,
        game: GameType,
        score: i64,
    ) -> Result<bool, AppError> {
        debug!(identity_key = %identity_key, %partition, %game, score, "Conditional upsert in memory");

        let mut records = self.records.lock().unwrap();
        let position = records
            .iter()
            .position(|r| r.identity_key == identity_key && r.partition == partition && r.game == game);

        match position {
            Some(index) => {
                let record = &mut records[index];
                // Comparison happens under the lock, at write time.
                if policy::is_better(game, score, record.score) {
                    record.score = Some(score);
                    record.updated_at = Utc::now();
                    debug!(identity_key = %identity_key, %game, score, "Score record replaced in memory");
                    Ok(true)
                } else {
                    debug!(identity_key = %identity_key, %game, score, "Stored score retained in memory");
                    Ok(false)
                }
            }
            None => {
                let now = Utc::now();
                records.push(ScoreRecord {
                    identity_key: identity_key.to_string(),
                    partition,
                    game,
                    score: Some(score),
                    created_at: now,
                    updated_at: now,
                });
                debug!(identity_key = %identity_key, %game, score, "Score record inserted in memory");
                Ok(true)
            }
        }
    }

    #[instrument(skip(self, rows))]
    async fn insert_if_absent(&self, rows: Vec<ScoreRecord>) -> Result<(), AppError> {
        debug!(row_count = rows.len(), "Inserting absent score records in memory");

        let mut records = self.records.lock().unwrap();
        for row in rows {
            let exists = records.iter().any(|r| {
                r.identity_key == row.identity_key
                    && r.partition == row.partition
                    && r.game == row.game
            });
            if !exists {
                records.push(row);
            }
        }

        Ok(())
    }
}

/// PostgreSQL implementation of the score repository
///
/// Expects a `score_records` table with a unique constraint on
/// (identity_key, partition, game_type); the conditional upsert is a single
/// `INSERT ... ON CONFLICT ... DO UPDATE ... WHERE` statement so the
/// comparison is evaluated inside the database, not in a read-then-write.
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<ScoreRecord, AppError> {
        let partition: String = row.get("partition");
        let game: String = row.get("game_type");
        Ok(ScoreRecord {
            identity_key: row.get("identity_key"),
            partition: Partition::from_str(&partition).map_err(|_| {
                warn!(partition = %partition, "Unknown partition value in database");
                AppError::Internal
            })?,
            game: GameType::from_str(&game).map_err(|_| {
                warn!(game = %game, "Unknown game type value in database");
                AppError::Internal
            })?,
            score: row.get("score"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self))]
    async fn find_one(
        &self,
        identity_key: &str,
        partition: Partition,
        game: GameType,
    ) -> Result<Option<ScoreRecord>, AppError> {
        debug!(identity_key = %identity_key, %partition, %game, "Fetching score record from database");

        let row = sqlx::query(
            "SELECT identity_key, partition, game_type, score, created_at, updated_at \
             FROM score_records \
             WHERE identity_key = $1 AND partition = $2 AND game_type = $3",
        )
        .bind(identity_key)
        .bind(partition.to_string())
        .bind(game.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, identity_key = %identity_key, "Failed to fetch score record");
            AppError::StorageUnavailable(e.to_string())
        })?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(
        &self,
        game: GameType,
        partition: Option<Partition>,
    ) -> Result<Vec<ScoreRecord>, AppError> {
        debug!(%game, ?partition, "Listing score records from database");

        let rows = match partition {
            Some(partition) => {
                sqlx::query(
                    "SELECT identity_key, partition, game_type, score, created_at, updated_at \
                     FROM score_records \
                     WHERE game_type = $1 AND partition = $2 \
                     ORDER BY created_at, identity_key",
                )
                .bind(game.to_string())
                .bind(partition.to_string())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT identity_key, partition, game_type, score, created_at, updated_at \
                     FROM score_records \
                     WHERE game_type = $1 \
                     ORDER BY created_at, identity_key",
                )
                .bind(game.to_string())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            warn!(error = %e, %game, "Failed to list score records");
            AppError::StorageUnavailable(e.to_string())
        })?;

        rows.iter().map(Self::record_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn upsert_if_better(
        &self,
        identity_key: &str,
        partition: Partition,
        game: GameType,
        score: i64,
    ) -> Result<bool, AppError> {
        debug!(identity_key = %identity_key, %partition, %game, score, "Conditional upsert in database");

        let lower_is_better = game == GameType::Reaction;
        let result = sqlx::query(
            "INSERT INTO score_records (identity_key, partition, game_type, score, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             ON CONFLICT (identity_key, partition, game_type) DO UPDATE \
             SET score = EXCLUDED.score, updated_at = EXCLUDED.updated_at \
             WHERE score_records.score IS NULL \
                OR ($5 AND EXCLUDED.score < score_records.score) \
                OR (NOT $5 AND EXCLUDED.score > score_records.score)",
        )
        .bind(identity_key)
        .bind(partition.to_string())
        .bind(game.to_string())
        .bind(score)
        .bind(lower_is_better)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, identity_key = %identity_key, "Failed conditional score upsert");
            AppError::StorageUnavailable(e.to_string())
        })?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, rows))]
    async fn insert_if_absent(&self, rows: Vec<ScoreRecord>) -> Result<(), AppError> {
        debug!(row_count = rows.len(), "Inserting absent score records in database");

        for row in rows {
            sqlx::query(
                "INSERT INTO score_records (identity_key, partition, game_type, score, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (identity_key, partition, game_type) DO NOTHING",
            )
            .bind(&row.identity_key)
            .bind(row.partition.to_string())
            .bind(row.game.to_string())
            .bind(row.score)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, identity_key = %row.identity_key, "Failed to pre-seed score record");
                AppError::StorageUnavailable(e.to_string())
            })?;
        }

        Ok(())
    }
}
