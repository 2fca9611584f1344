use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::game::GameType;

/// Which of the two disjoint identity key spaces a record is filed under.
/// A guest nickname and an authenticated account id never share a key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Partition {
    Guest,
    Authenticated,
}

/// Stored best score for one (identity, game) pair.
///
/// At most one record exists per (identity_key, partition, game); submissions
/// update it in place rather than appending rows. `score = None` means
/// "registered, not yet played" and only appears through guest pre-seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub identity_key: String,
    pub partition: Partition,
    pub game: GameType,
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Creates an empty "registered, not yet played" row.
    pub fn unplayed(identity_key: String, partition: Partition, game: GameType) -> Self {
        let now = Utc::now();
        Self {
            identity_key,
            partition,
            game,
            score: None,
            created_at: now,
            updated_at: now,
        }
    }
}
