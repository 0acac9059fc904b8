//! Documents served by the scoreboard backend, mirroring its JSON field names.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Identifier of a team as used in the backend documents.
pub type TeamId = i64;
/// Round number of the competition.
pub type Tick = i64;

/// Global phase of the competition as reported by `scoreboard_current.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
pub enum GamePhase {
    /// No ticks are being played.
    Stopped,
    /// The game is paused between ticks.
    Suspended,
    /// Ticks are advancing.
    Running,
}

impl TryFrom<u8> for GamePhase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GamePhase::Stopped),
            2 => Ok(GamePhase::Suspended),
            3 => Ok(GamePhase::Running),
            other => Err(format!("unknown game state {other}")),
        }
    }
}

impl From<GamePhase> for u8 {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Stopped => 1,
            GamePhase::Suspended => 2,
            GamePhase::Running => 3,
        }
    }
}

/// Snapshot of the game timing published in `scoreboard_current.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentState {
    /// Tick currently being played.
    pub current_tick: i64,
    /// Phase of the game.
    pub state: GamePhase,
    /// Unix timestamp (seconds) at which the current tick ends.
    pub current_tick_until: i64,
    /// Latest tick with a published scoreboard. Never ahead of `current_tick`.
    pub scoreboard_tick: i64,
    /// Teams excluded from the competition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_teams: Option<Vec<i64>>,
}

impl CurrentState {
    /// Banned teams as a set, empty when the document omits the list.
    pub fn banned_set(&self) -> BTreeSet<TeamId> {
        self.banned_teams
            .as_deref()
            .unwrap_or_default()
            .iter()
            .copied()
            .collect()
    }
}

impl Default for CurrentState {
    fn default() -> Self {
        Self {
            current_tick: -1,
            state: GamePhase::Stopped,
            current_tick_until: 0,
            scoreboard_tick: -1,
            banned_teams: None,
        }
    }
}

/// Team descriptor from `scoreboard_teams.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    /// Filled in from the key of the teams document.
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub vulnbox: String,
    /// Affiliation (university, country, ...).
    #[serde(default)]
    pub aff: String,
    #[serde(default)]
    pub web: String,
    /// Image file name; the backend writes `false` for teams without a logo.
    #[serde(default, deserialize_with = "deserialize_logo")]
    pub logo: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogoField {
    Path(String),
    Flag(bool),
}

fn deserialize_logo<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LogoField>::deserialize(deserializer)?;
    Ok(match raw {
        Some(LogoField::Path(path)) if !path.is_empty() => Some(path),
        Some(LogoField::Path(_) | LogoField::Flag(_)) | None => None,
    })
}

/// Raw body of `scoreboard_teams.json`, keyed by team id.
pub type TeamsDocument = IndexMap<TeamId, Team>;

/// Per-service metadata attached to round and history documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub attackers: u32,
    #[serde(default)]
    pub victims: u32,
    /// Names of the teams that exploited this service, in order of their first capture.
    #[serde(default)]
    pub first_blood: Vec<String>,
    #[serde(default)]
    pub flag_stores: u32,
    #[serde(default)]
    pub flag_stores_exploited: u32,
}

/// Outcome of the checker for one team and one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckerStatus {
    Success,
    FlagMissing,
    Mumble,
    Offline,
    Timeout,
    Crash,
    Recovering,
    Revoked,
    Pending,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Points of one team for one service at a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceResult {
    #[serde(rename = "o")]
    pub offense: f64,
    #[serde(rename = "d")]
    pub defense: f64,
    #[serde(rename = "s")]
    pub sla: f64,
    #[serde(rename = "do")]
    pub delta_offense: f64,
    #[serde(rename = "dd")]
    pub delta_defense: f64,
    #[serde(rename = "ds")]
    pub delta_sla: f64,
    #[serde(rename = "st", default)]
    pub stolen: u32,
    #[serde(rename = "cap", default)]
    pub captured: u32,
    #[serde(rename = "dst", default)]
    pub delta_stolen: i64,
    #[serde(rename = "dcap", default)]
    pub delta_captured: i64,
    #[serde(rename = "c")]
    pub status: CheckerStatus,
    /// Checker results of the previous ticks, most recent first.
    #[serde(rename = "dc", default)]
    pub previous_status: Vec<CheckerStatus>,
    #[serde(rename = "m", default)]
    pub message: Option<String>,
}

impl ServiceResult {
    /// Sum of offense, defense and SLA points.
    pub fn total(&self) -> f64 {
        self.offense + self.defense + self.sla
    }
}

/// Ranking entry of one team at a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rank {
    pub team_id: i64,
    pub rank: u32,
    pub points: f64,
    #[serde(rename = "o")]
    pub offense: f64,
    #[serde(rename = "d")]
    pub defense: f64,
    #[serde(rename = "s")]
    pub sla: f64,
    #[serde(rename = "do", default)]
    pub delta_offense: f64,
    #[serde(rename = "dd", default)]
    pub delta_defense: f64,
    #[serde(rename = "ds", default)]
    pub delta_sla: f64,
    /// One entry per service, in the order of [`RoundInformation::services`].
    pub services: Vec<ServiceResult>,
}

/// Scoreboard snapshot of a single tick (`scoreboard_round_{tick}.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoundInformation {
    pub tick: i64,
    pub services: Vec<Service>,
    pub scoreboard: Vec<Rank>,
}

impl RoundInformation {
    /// Names of the services in scoreboard order.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|service| service.name.as_str())
    }

    /// Ranking entry of `team_id`, if the team is listed.
    pub fn rank_of(&self, team_id: TeamId) -> Option<&Rank> {
        self.scoreboard.iter().find(|rank| rank.team_id == team_id)
    }
}

/// Point history of a team (`scoreboard_team_{id}.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamHistoryInformation {
    #[serde(default)]
    pub services: Vec<Service>,
    /// Indexed `[service][tick]`.
    pub points: Vec<Vec<f64>>,
}

/// Attacker/victim counters of a service at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceStat {
    #[serde(rename = "a")]
    pub attackers: u32,
    #[serde(rename = "v")]
    pub victims: u32,
}

/// Attack statistics over time (`scoreboard_service_stats.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceStatsInformation {
    #[serde(default)]
    pub services: Vec<Service>,
    /// Indexed `[service][tick]`.
    pub stats: Vec<Vec<ServiceStat>>,
}
