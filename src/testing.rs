//! Fakes and fixture builders shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use futures::future::{BoxFuture, ready};
use reqwest::StatusCode;
use time::{OffsetDateTime, macros::datetime};

use crate::{
    config::AppConfig,
    dao::{
        CurrentStateResponse, ScoreboardApi,
        http::{ApiError, ApiResult},
        models::{
            CheckerStatus, CurrentState, GamePhase, Rank, RoundInformation, Service, ServiceResult,
            ServiceStatsInformation, Team, TeamHistoryInformation, TeamId, TeamsDocument, Tick,
        },
    },
    state::{AppState, SharedState, cache::PointHistory, clock::Clock},
};

/// Wall-clock time of every test state: 1_700_000_000 seconds after the epoch.
pub const TEST_NOW: OffsetDateTime = datetime!(2023-11-14 22:13:20 UTC);

#[derive(Default)]
struct FakeData {
    currents: VecDeque<CurrentState>,
    teams: Option<TeamsDocument>,
    rounds: HashMap<Tick, RoundInformation>,
    histories: HashMap<TeamId, PointHistory>,
    stats: Option<ServiceStatsInformation>,
    failing_rounds: u32,
    current_calls: u32,
    teams_calls: u32,
    round_calls: HashMap<Tick, u32>,
    history_calls: HashMap<TeamId, u32>,
}

/// In-memory backend counting the requests it serves.
///
/// Missing documents answer with a 404 status.
#[derive(Clone, Default)]
pub struct FakeApi {
    data: Arc<Mutex<FakeData>>,
}

fn not_found<T>(path: String) -> ApiResult<T> {
    Err(ApiError::RequestStatus {
        path,
        status: StatusCode::NOT_FOUND,
    })
}

impl FakeApi {
    pub fn push_current(&self, state: CurrentState) {
        self.data.lock().unwrap().currents.push_back(state);
    }

    pub fn set_teams(&self, teams: TeamsDocument) {
        self.data.lock().unwrap().teams = Some(teams);
    }

    pub fn insert_round(&self, round: RoundInformation) {
        self.data.lock().unwrap().rounds.insert(round.tick, round);
    }

    pub fn insert_history(&self, team_id: TeamId, points: PointHistory) {
        self.data.lock().unwrap().histories.insert(team_id, points);
    }

    pub fn set_stats(&self, stats: ServiceStatsInformation) {
        self.data.lock().unwrap().stats = Some(stats);
    }

    /// Make the next `count` round requests fail with a 503.
    pub fn fail_next_rounds(&self, count: u32) {
        self.data.lock().unwrap().failing_rounds = count;
    }

    pub fn current_state_calls(&self) -> u32 {
        self.data.lock().unwrap().current_calls
    }

    pub fn teams_calls(&self) -> u32 {
        self.data.lock().unwrap().teams_calls
    }

    pub fn round_calls(&self, tick: Tick) -> u32 {
        self.data.lock().unwrap().round_calls.get(&tick).copied().unwrap_or(0)
    }

    pub fn history_calls(&self, team_id: TeamId) -> u32 {
        self.data.lock().unwrap().history_calls.get(&team_id).copied().unwrap_or(0)
    }
}

impl ScoreboardApi for FakeApi {
    fn current_state(&self) -> BoxFuture<'static, ApiResult<CurrentStateResponse>> {
        let mut data = self.data.lock().unwrap();
        data.current_calls += 1;
        let result = match data.currents.pop_front() {
            Some(state) => Ok(CurrentStateResponse {
                state,
                date_header: None,
            }),
            None => not_found("scoreboard_current.json".into()),
        };
        Box::pin(ready(result))
    }

    fn teams(&self) -> BoxFuture<'static, ApiResult<TeamsDocument>> {
        let mut data = self.data.lock().unwrap();
        data.teams_calls += 1;
        let result = match &data.teams {
            Some(teams) => Ok(teams.clone()),
            None => not_found("scoreboard_teams.json".into()),
        };
        Box::pin(ready(result))
    }

    fn round(&self, tick: Tick) -> BoxFuture<'static, ApiResult<RoundInformation>> {
        let mut data = self.data.lock().unwrap();
        *data.round_calls.entry(tick).or_default() += 1;
        let path = format!("scoreboard_round_{tick}.json");
        let result = if data.failing_rounds > 0 {
            data.failing_rounds -= 1;
            Err(ApiError::RequestStatus {
                path,
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
        } else {
            match data.rounds.get(&tick) {
                Some(round) => Ok(round.clone()),
                None => not_found(path),
            }
        };
        Box::pin(ready(result))
    }

    fn team_history(&self, team_id: TeamId) -> BoxFuture<'static, ApiResult<TeamHistoryInformation>> {
        let mut data = self.data.lock().unwrap();
        *data.history_calls.entry(team_id).or_default() += 1;
        let result = match data.histories.get(&team_id) {
            Some(points) => Ok(TeamHistoryInformation {
                services: Vec::new(),
                points: points.clone(),
            }),
            None => not_found(format!("scoreboard_team_{team_id}.json")),
        };
        Box::pin(ready(result))
    }

    fn service_stats(&self) -> BoxFuture<'static, ApiResult<ServiceStatsInformation>> {
        let data = self.data.lock().unwrap();
        let result = match &data.stats {
            Some(stats) => Ok(stats.clone()),
            None => not_found("scoreboard_service_stats.json".into()),
        };
        Box::pin(ready(result))
    }
}

/// Clock that never moves.
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Application state backed by `api` with the clock frozen at [`TEST_NOW`].
pub fn test_state(api: FakeApi) -> SharedState {
    AppState::new(AppConfig::default(), Arc::new(api), Arc::new(FixedClock(TEST_NOW)))
}

/// Replace the live state as if it had just been polled.
pub async fn set_current(state: &SharedState, current: CurrentState) {
    state.live().write().await.apply(
        CurrentStateResponse {
            state: current,
            date_header: None,
        },
        TEST_NOW,
    );
}

pub fn current(phase: GamePhase, tick: Tick, scoreboard_tick: Tick, until: i64) -> CurrentState {
    CurrentState {
        current_tick: tick,
        state: phase,
        current_tick_until: until,
        scoreboard_tick,
        banned_teams: None,
    }
}

pub fn team(id: TeamId, name: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        vulnbox: String::new(),
        aff: String::new(),
        web: String::new(),
        logo: None,
    }
}

fn service_result(total: f64) -> ServiceResult {
    ServiceResult {
        offense: total,
        defense: 0.0,
        sla: 0.0,
        delta_offense: 0.0,
        delta_defense: 0.0,
        delta_sla: 0.0,
        stolen: 0,
        captured: 0,
        delta_stolen: 0,
        delta_captured: 0,
        status: CheckerStatus::Success,
        previous_status: Vec::new(),
        message: None,
    }
}

/// Round of `tick` with `(name, first bloods)` services and `(team, points per service)` ranks,
/// ranked in the given order.
pub fn round(tick: Tick, services: &[(&str, &[&str])], ranks: &[(TeamId, &[f64])]) -> RoundInformation {
    RoundInformation {
        tick,
        services: services
            .iter()
            .map(|(name, first_blood)| Service {
                name: name.to_string(),
                attackers: 0,
                victims: 0,
                first_blood: first_blood.iter().map(|team| team.to_string()).collect(),
                flag_stores: 1,
                flag_stores_exploited: 0,
            })
            .collect(),
        scoreboard: ranks
            .iter()
            .enumerate()
            .map(|(position, (team_id, points))| Rank {
                team_id: *team_id,
                rank: position as u32 + 1,
                points: points.iter().sum(),
                offense: points.iter().sum(),
                defense: 0.0,
                sla: 0.0,
                delta_offense: 0.0,
                delta_defense: 0.0,
                delta_sla: 0.0,
                services: points.iter().copied().map(service_result).collect(),
            })
            .collect(),
    }
}
