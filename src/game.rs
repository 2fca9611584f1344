use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The six mini-games. The string forms below are the wire/storage
/// identifiers and must never change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameType {
    Reaction,
    Memory,
    Color,
    Math,
    Pattern,
    Typing,
}

/// Which way a game's scores improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    /// Reaction time: fewer milliseconds is better.
    LowerIsBetter,
    /// Points: more is better.
    HigherIsBetter,
}

impl GameType {
    pub fn direction(&self) -> ScoreDirection {
        match self {
            GameType::Reaction => ScoreDirection::LowerIsBetter,
            _ => ScoreDirection::HigherIsBetter,
        }
    }

    /// Human-readable best-score label: "320ms" / "80pts" / "not played".
    pub fn format_score(&self, score: Option<i64>) -> String {
        match score {
            None => "not played".to_string(),
            Some(value) => match self {
                GameType::Reaction => format!("{}ms", value),
                _ => format!("{}pts", value),
            },
        }
    }
}
