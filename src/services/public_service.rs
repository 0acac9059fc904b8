//! Read-only projections of the relayed scoreboard, plus the display controls.

use std::sync::Arc;

use tracing::info;

use crate::{
    dao::models::{RoundInformation, TeamId, Tick},
    dto::{
        public::{
            CurrentStateResponse, PointHistoryResponse, PointTotalsResponse, ServiceStatsResponse,
            TeamsResponse,
        },
        sse::OverlaySnapshot,
    },
    error::ServiceError,
    services::{notification_dispatcher, ranking_cache, sse_events, team_directory},
    state::{Preferences, SharedState, live::format_countdown},
};

/// Current game timing, with the countdown corrected for clock skew.
pub async fn get_state(state: &SharedState) -> CurrentStateResponse {
    let now = state.clock().now();
    let live = state.live().read().await;
    let current = live.current();
    let remaining_seconds = live.remaining_seconds(now);

    CurrentStateResponse {
        current_tick: current.current_tick,
        state: current.state,
        scoreboard_tick: current.scoreboard_tick,
        current_tick_until: current.current_tick_until,
        remaining_seconds,
        countdown: format_countdown(remaining_seconds),
        delta_client_to_server: live.delta_client_to_server(),
        banned_teams: live.banned().iter().copied().collect(),
        final_tick: live.final_tick(),
    }
}

pub async fn get_teams(state: &SharedState) -> TeamsResponse {
    TeamsResponse {
        teams: team_directory::all_teams(state).await,
    }
}

/// Scoreboard snapshot of `tick`, served from the ranking cache.
///
/// Ticks past the published scoreboard are rejected without asking the backend.
pub async fn get_ranking(state: &SharedState, tick: Tick) -> Result<RoundInformation, ServiceError> {
    let scoreboard_tick = state.live().read().await.current().scoreboard_tick;
    if tick > scoreboard_tick {
        return Err(ServiceError::NotFound(format!(
            "scoreboard of tick {tick} is not published yet"
        )));
    }
    let round = ranking_cache::get_ranking(state, tick).await?;
    Ok(Arc::unwrap_or_clone(round))
}

pub async fn get_point_history(
    state: &SharedState,
    team_id: TeamId,
) -> Result<PointHistoryResponse, ServiceError> {
    let points = ranking_cache::get_team_point_history(state, team_id).await?;
    Ok(PointHistoryResponse { team_id, points })
}

pub async fn get_point_totals(
    state: &SharedState,
    team_id: TeamId,
) -> Result<PointTotalsResponse, ServiceError> {
    let points = ranking_cache::get_team_point_totals(state, team_id).await?;
    Ok(PointTotalsResponse { team_id, points })
}

pub async fn get_service_stats(state: &SharedState) -> Result<ServiceStatsResponse, ServiceError> {
    let stats = ranking_cache::get_service_stat_history(state).await?;
    Ok(ServiceStatsResponse { stats })
}

pub async fn get_overlay(state: &SharedState) -> OverlaySnapshot {
    sse_events::overlay_snapshot(&*state.overlay().read().await)
}

/// Hide the first blood banner and return the overlays afterwards.
pub async fn dismiss_overlay(state: &SharedState) -> OverlaySnapshot {
    notification_dispatcher::dismiss(state).await;
    get_overlay(state).await
}

pub async fn get_preferences(state: &SharedState) -> Preferences {
    *state.preferences().read().await
}

/// Replace the display preferences of every dashboard.
pub async fn update_preferences(state: &SharedState, preferences: Preferences) -> Preferences {
    *state.preferences().write().await = preferences;
    info!(?preferences, "display preferences updated");
    sse_events::broadcast_preferences(state, &preferences);
    preferences
}
