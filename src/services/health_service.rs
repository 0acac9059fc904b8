use tracing::warn;

use crate::{
    dto::health::{HealthResponse, HealthStatus},
    state::SharedState,
};

/// Report whether the scoreboard backend is being polled successfully, with cache figures.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let status = if state.is_degraded() {
        warn!("healthcheck while backend unreachable (degraded mode)");
        HealthStatus::Degraded
    } else {
        HealthStatus::Ok
    };

    HealthResponse {
        status,
        scoreboard_tick: state.live().read().await.current().scoreboard_tick,
        cached_rounds: state.rounds().len(),
        known_teams: state.teams().read().await.len(),
    }
}
