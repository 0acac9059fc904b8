use serde::Serialize;
use tracing::warn;

use crate::{
    dao::models::{CurrentState, Tick},
    dto::sse::{
        FirstBloodBanner, FirstBloodEvent, GameOverEvent, OverlaySnapshot, ScoreboardTickEvent,
        ServerEvent,
    },
    state::{
        Preferences, SharedState,
        overlay::{FirstBloodOverlay, OverlayState, PodiumEntry},
    },
};

const EVENT_SCOREBOARD_TICK: &str = "scoreboard_tick";
const EVENT_FIRST_BLOOD: &str = "first_blood";
const EVENT_GAME_OVER: &str = "game_over";
const EVENT_OVERLAY: &str = "overlay";
const EVENT_PREFERENCES: &str = "preferences";
const EVENT_INFO: &str = "info";

/// Broadcast that a newer scoreboard tick can be fetched.
pub fn broadcast_scoreboard_tick(state: &SharedState, current: &CurrentState) {
    let payload =
        ScoreboardTickEvent::new(current.scoreboard_tick, current.current_tick, current.state);
    send_public_event(state, EVENT_SCOREBOARD_TICK, &payload);
}

/// Broadcast a first blood, independently of the overlay preference.
pub fn broadcast_first_blood(state: &SharedState, service: &str, team: &str) {
    let payload = FirstBloodEvent {
        service: service.to_string(),
        team: team.to_string(),
    };
    send_public_event(state, EVENT_FIRST_BLOOD, &payload);
}

/// Broadcast the podium of the final scoreboard.
pub fn broadcast_game_over(state: &SharedState, tick: Tick, podium: &[PodiumEntry]) {
    let payload = GameOverEvent {
        tick,
        podium: podium.to_vec(),
    };
    send_public_event(state, EVENT_GAME_OVER, &payload);
}

/// Broadcast the overlays as they are now.
pub fn broadcast_overlay(state: &SharedState, overlay: &OverlayState) {
    send_public_event(state, EVENT_OVERLAY, &overlay_snapshot(overlay));
}

/// Broadcast new display preferences so every dashboard applies them.
pub fn broadcast_preferences(state: &SharedState, preferences: &Preferences) {
    send_public_event(state, EVENT_PREFERENCES, preferences);
}

/// Send a human-readable info message onto the public SSE stream.
pub fn broadcast_public_info(state: &SharedState, message: &str) {
    state.public_sse().broadcast(ServerEvent::new(
        Some(EVENT_INFO.to_string()),
        message.to_string(),
    ));
}

/// Serialisable view of the overlays.
pub fn overlay_snapshot(overlay: &OverlayState) -> OverlaySnapshot {
    let first_blood = match overlay.first_blood() {
        FirstBloodOverlay::Idle => None,
        FirstBloodOverlay::Visible { service, team, .. } => Some(FirstBloodBanner {
            service: service.clone(),
            team: team.clone(),
        }),
    };
    OverlaySnapshot {
        first_blood,
        pyro: overlay.pyro(),
        podium: overlay.podium().to_vec(),
    }
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
