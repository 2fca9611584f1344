use serde::{Deserialize, Serialize};

use crate::score::models::Partition;

/// Display name used when a session carries neither an account nor a
/// usable nickname.
pub const GUEST_FALLBACK_NAME: &str = "Guest";

/// The identity a score is filed under. Exactly one is active per session;
/// the two variants map to disjoint storage partitions and are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identity {
    Guest { nickname: String },
    Authenticated { account_id: String },
}

impl Identity {
    /// Default identity for a session with nothing set.
    pub fn default_guest() -> Self {
        Identity::Guest {
            nickname: GUEST_FALLBACK_NAME.to_string(),
        }
    }

    /// Opaque storage key within this identity's partition.
    pub fn key(&self) -> &str {
        match self {
            Identity::Guest { nickname } => nickname,
            Identity::Authenticated { account_id } => account_id,
        }
    }

    pub fn partition(&self) -> Partition {
        match self {
            Identity::Guest { .. } => Partition::Guest,
            Identity::Authenticated { .. } => Partition::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }
}
