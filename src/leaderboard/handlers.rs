use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    service::LeaderboardAggregator,
    types::{AllRankingsResponse, OwnRankResponse, RankingsResponse},
};
use crate::game::GameType;
use crate::identity::{IdentityResolver, SessionContext};
use crate::shared::{AppError, AppState};

fn aggregator(state: &AppState) -> LeaderboardAggregator {
    LeaderboardAggregator::new(
        Arc::clone(&state.score_repository),
        IdentityResolver::new(Arc::clone(&state.profile_directory)),
    )
}

/// HTTP handler for one game's rankings
///
/// GET /rankings/:game
/// On success the snapshot cache is refreshed; when the store is
/// unreachable the last-known snapshot is served with `cached: true`, and
/// only a cold cache surfaces the storage error.
#[instrument(name = "game_rankings", skip(state))]
pub async fn game_rankings(
    State(state): State<AppState>,
    Path(game): Path<GameType>,
) -> Result<Json<RankingsResponse>, AppError> {
    match aggregator(&state).rankings(game).await {
        Ok(entries) => {
            state.snapshot_cache.store_rankings(game, &entries);
            info!(%game, entry_count = entries.len(), "Rankings computed");
            Ok(Json(RankingsResponse {
                game,
                entries,
                cached: false,
            }))
        }
        Err(AppError::StorageUnavailable(msg)) => {
            match state.snapshot_cache.last_known_rankings(game) {
                Some(entries) => {
                    warn!(%game, error = %msg, "Serving stale rankings snapshot");
                    Ok(Json(RankingsResponse {
                        game,
                        entries,
                        cached: true,
                    }))
                }
                None => Err(AppError::StorageUnavailable(msg)),
            }
        }
        Err(other) => Err(other),
    }
}

/// HTTP handler for all games' rankings
///
/// GET /rankings
#[instrument(name = "all_rankings", skip(state))]
pub async fn all_rankings(
    State(state): State<AppState>,
) -> Result<Json<AllRankingsResponse>, AppError> {
    let rankings = aggregator(&state).rankings_all().await?;

    for (game, entries) in &rankings {
        state.snapshot_cache.store_rankings(*game, entries);
    }

    info!(game_count = rankings.len(), "All rankings computed");
    Ok(Json(AllRankingsResponse { rankings }))
}

/// HTTP handler for the caller's own rank in one game
///
/// GET /rankings/:game/me
#[instrument(name = "own_rank", skip(state, session))]
pub async fn own_rank(
    State(state): State<AppState>,
    session: SessionContext,
    Path(game): Path<GameType>,
) -> Result<Json<OwnRankResponse>, AppError> {
    let resolver = IdentityResolver::new(Arc::clone(&state.profile_directory));
    let identity = resolver.resolve(&session);

    let entry = aggregator(&state).own_entry(game, &identity).await?;

    Ok(Json(OwnRankResponse { game, entry }))
}
