pub mod http;
pub mod models;

use futures::future::BoxFuture;

use crate::dao::{
    http::ApiResult,
    models::{
        CurrentState, RoundInformation, ServiceStatsInformation, TeamHistoryInformation, TeamId,
        TeamsDocument, Tick,
    },
};

/// Current state document together with the `Date` header it was served with.
#[derive(Debug, Clone)]
pub struct CurrentStateResponse {
    pub state: CurrentState,
    pub date_header: Option<String>,
}

/// Read-only access to the static JSON documents published by the scoreboard backend.
pub trait ScoreboardApi: Send + Sync {
    fn current_state(&self) -> BoxFuture<'static, ApiResult<CurrentStateResponse>>;
    fn teams(&self) -> BoxFuture<'static, ApiResult<TeamsDocument>>;
    fn round(&self, tick: Tick) -> BoxFuture<'static, ApiResult<RoundInformation>>;
    fn team_history(&self, team_id: TeamId) -> BoxFuture<'static, ApiResult<TeamHistoryInformation>>;
    fn service_stats(&self) -> BoxFuture<'static, ApiResult<ServiceStatsInformation>>;
}
