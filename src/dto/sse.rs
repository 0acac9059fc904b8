use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::{GamePhase, Tick},
    state::overlay::{PodiumEntry, PyroStage},
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event with a raw string payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a newer scoreboard tick has been published.
pub struct ScoreboardTickEvent {
    pub tick: i64,
    pub current_tick: i64,
    pub state: GamePhase,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast for every first blood, whether or not the overlay is shown.
pub struct FirstBloodEvent {
    pub service: String,
    pub team: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once the final scoreboard is known.
pub struct GameOverEvent {
    pub tick: i64,
    pub podium: Vec<PodiumEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Banner currently displayed for a first blood.
pub struct FirstBloodBanner {
    pub service: String,
    pub team: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Snapshot of every overlay, broadcast whenever one of them changes.
pub struct OverlaySnapshot {
    pub first_blood: Option<FirstBloodBanner>,
    pub pyro: PyroStage,
    pub podium: Vec<PodiumEntry>,
}

impl ScoreboardTickEvent {
    pub fn new(tick: Tick, current_tick: Tick, state: GamePhase) -> Self {
        Self {
            tick,
            current_tick,
            state,
        }
    }
}
