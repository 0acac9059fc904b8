use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::{GamePhase, ServiceStat, Team};

/// Current game timing as seen by the relay.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentStateResponse {
    pub current_tick: i64,
    pub state: GamePhase,
    pub scoreboard_tick: i64,
    pub current_tick_until: i64,
    /// Seconds left in the current tick, corrected for clock skew.
    pub remaining_seconds: i64,
    /// `remaining_seconds` rendered as `MM:SS`.
    pub countdown: String,
    /// `client clock - server clock` in seconds.
    pub delta_client_to_server: i64,
    pub banned_teams: Vec<i64>,
    /// Tick of the final scoreboard once the game was stopped.
    pub final_tick: Option<i64>,
}

/// Response payload listing every known team.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

/// Points of a team per service and tick.
#[derive(Debug, Serialize, ToSchema)]
pub struct PointHistoryResponse {
    pub team_id: i64,
    /// Indexed `[service][tick]`.
    pub points: Vec<Vec<f64>>,
}

/// Total points of a team per tick.
#[derive(Debug, Serialize, ToSchema)]
pub struct PointTotalsResponse {
    pub team_id: i64,
    pub points: Vec<f64>,
}

/// Attacker and victim counters per service and tick.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatsResponse {
    /// Indexed `[service][tick]`.
    pub stats: Vec<Vec<ServiceStat>>,
}
