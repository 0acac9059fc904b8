use serde::Serialize;
use utoipa::ToSchema;

/// Whether the relay is currently fed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    /// The last poll failed or no state document was received yet; stale data is served.
    Degraded,
}

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Newest scoreboard tick known to the relay, `-1` before the first poll.
    pub scoreboard_tick: i64,
    pub cached_rounds: usize,
    pub known_teams: usize,
}
