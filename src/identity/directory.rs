use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument};

use crate::shared::AppError;

/// Display name used when an account has no profile name, no upstream
/// account name, and no email to derive one from.
pub const ACCOUNT_FALLBACK_NAME: &str = "Player";

/// Profile and upstream-account metadata for one authenticated account.
/// Every field is optional; `preferred_name` applies the fallback chain.
#[derive(Debug, Clone, Default)]
pub struct AccountProfile {
    /// Explicitly chosen profile display name. Highest priority.
    pub display_name: Option<String>,
    /// Full name from the upstream OAuth account.
    pub full_name: Option<String>,
    /// Given name from the upstream OAuth account.
    pub given_name: Option<String>,
    pub email: Option<String>,
}

impl AccountProfile {
    /// Priority: profile display name, then account full name, then given
    /// name, then the local part of the email, then a fixed literal.
    /// This order is a hard contract.
    pub fn preferred_name(&self) -> String {
        if let Some(name) = non_blank(&self.display_name) {
            return name;
        }
        if let Some(name) = non_blank(&self.full_name) {
            return name;
        }
        if let Some(name) = non_blank(&self.given_name) {
            return name;
        }
        if let Some(email) = non_blank(&self.email) {
            if let Some(local_part) = email.split('@').next() {
                if !local_part.is_empty() {
                    return local_part.to_string();
                }
            }
        }
        ACCOUNT_FALLBACK_NAME.to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// External auth/profile collaborator boundary. Lookups are batched: the
/// leaderboard resolves every account in one call, never per row.
#[async_trait]
pub trait ProfileDirectory {
    async fn lookup_profiles(
        &self,
        account_ids: &[String],
    ) -> Result<HashMap<String, AccountProfile>, AppError>;
}

/// In-memory implementation of ProfileDirectory for development and testing
pub struct InMemoryProfileDirectory {
    profiles: Mutex<HashMap<String, AccountProfile>>,
}

impl Default for InMemoryProfileDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_profiles(profiles: Vec<(String, AccountProfile)>) -> Self {
        Self {
            profiles: Mutex::new(profiles.into_iter().collect()),
        }
    }

    pub fn insert(&self, account_id: &str, profile: AccountProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(account_id.to_string(), profile);
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    #[instrument(skip(self, account_ids))]
    async fn lookup_profiles(
        &self,
        account_ids: &[String],
    ) -> Result<HashMap<String, AccountProfile>, AppError> {
        debug!(account_count = account_ids.len(), "Looking up profiles in memory");

        let profiles = self.profiles.lock().unwrap();
        Ok(account_ids
            .iter()
            .filter_map(|id| profiles.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }
}
