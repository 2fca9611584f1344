use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::directory::ProfileDirectory;
use super::models::{Identity, GUEST_FALLBACK_NAME};
use super::session::SessionContext;
use crate::shared::AppError;

/// Maps the active session to the identity scores are filed under, and is
/// the only component that mints display names.
pub struct IdentityResolver {
    directory: Arc<dyn ProfileDirectory + Send + Sync>,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn ProfileDirectory + Send + Sync>) -> Self {
        Self { directory }
    }

    /// Total: an authenticated session wins over a nickname, a usable
    /// nickname makes a guest, and anything else is the default guest.
    pub fn resolve(&self, session: &SessionContext) -> Identity {
        if let Some(account_id) = session
            .account_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            return Identity::Authenticated {
                account_id: account_id.to_string(),
            };
        }

        match session
            .nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            Some(nickname) => Identity::Guest {
                nickname: nickname.to_string(),
            },
            None => Identity::default_guest(),
        }
    }

    /// Display name for a single identity. Guests display their nickname;
    /// authenticated identities go through the profile fallback chain.
    #[instrument(skip(self, identity))]
    pub async fn display_name(&self, identity: &Identity) -> Result<String, AppError> {
        match identity {
            Identity::Guest { nickname } => {
                let trimmed = nickname.trim();
                Ok(if trimmed.is_empty() {
                    GUEST_FALLBACK_NAME.to_string()
                } else {
                    trimmed.to_string()
                })
            }
            Identity::Authenticated { account_id } => {
                let names = self
                    .display_names(std::slice::from_ref(account_id))
                    .await?;
                Ok(names
                    .get(account_id)
                    .cloned()
                    .unwrap_or_else(|| super::directory::ACCOUNT_FALLBACK_NAME.to_string()))
            }
        }
    }

    /// Bulk display-name resolution for authenticated accounts: one
    /// directory call for the whole batch. Accounts the directory does not
    /// know still get a name via the fallback literal.
    #[instrument(skip(self, account_ids))]
    pub async fn display_names(
        &self,
        account_ids: &[String],
    ) -> Result<HashMap<String, String>, AppError> {
        if account_ids.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(account_count = account_ids.len(), "Resolving display names");
        let profiles = self.directory.lookup_profiles(account_ids).await?;

        Ok(account_ids
            .iter()
            .map(|id| {
                let name = profiles
                    .get(id)
                    .map(|p| p.preferred_name())
                    .unwrap_or_else(|| super::directory::ACCOUNT_FALLBACK_NAME.to_string());
                (id.clone(), name)
            })
            .collect())
    }
}
