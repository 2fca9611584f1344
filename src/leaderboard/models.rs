use serde::{Deserialize, Serialize};

/// One row of a per-game ranking. Derived on demand from the score records;
/// never persisted, recomputed on every aggregation.
///
/// Ranks are 1-based and positional: equal scores receive consecutive
/// distinct ranks in first-observed order rather than a shared rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub score: i64,
    pub rank: u32,
    pub is_authenticated: bool,
}
