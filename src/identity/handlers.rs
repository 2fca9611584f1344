use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use super::{Identity, IdentityResolver, SessionContext};
use crate::shared::{AppError, AppState};

/// Response describing who the caller currently plays as
#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub display_name: String,
    pub authenticated: bool,
}

/// HTTP handler for the caller's display identity
///
/// GET /me
/// Never fails on an unresolved session: it falls back to the default
/// guest, or to the last registered nickname when one is cached. The
/// cached nickname is best-effort only; anything the session carries wins.
#[instrument(name = "whoami", skip(state, session))]
pub async fn whoami(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<WhoAmIResponse>, AppError> {
    let resolver = IdentityResolver::new(Arc::clone(&state.profile_directory));
    let identity = resolver.resolve(&session);
    let mut display_name = resolver.display_name(&identity).await?;

    if identity == Identity::default_guest() {
        if let Some(nickname) = state.snapshot_cache.last_nickname() {
            display_name = nickname;
        }
    }

    Ok(Json(WhoAmIResponse {
        display_name,
        authenticated: identity.is_authenticated(),
    }))
}
