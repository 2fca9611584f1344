//! The best-score-wins decision: pure, partition-agnostic, no failure modes.

use crate::game::{GameType, ScoreDirection};

/// Returns true when `candidate` should replace `current_best`.
///
/// A missing current best always loses to the candidate (first score
/// recorded). Ties are never better, so duplicate submissions of the same
/// value are idempotent.
pub fn is_better(game: GameType, candidate: i64, current_best: Option<i64>) -> bool {
    match current_best {
        None => true,
        Some(best) => match game.direction() {
            ScoreDirection::LowerIsBetter => candidate < best,
            ScoreDirection::HigherIsBetter => candidate > best,
        },
    }
}
