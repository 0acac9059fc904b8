//! Latest current-state document and the clock offset derived from its `Date` header.

use std::collections::BTreeSet;

use time::{OffsetDateTime, PrimitiveDateTime, macros::format_description};
use tracing::{info, warn};

use crate::dao::{
    CurrentStateResponse,
    models::{CurrentState, GamePhase, TeamId, Tick},
};

/// Game state as last reported by the backend, plus what the client derived from it.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    current: CurrentState,
    banned: BTreeSet<TeamId>,
    /// `client clock - server clock`, in whole seconds.
    delta_client_to_server: i64,
    last_date_header: Option<String>,
    final_tick: Option<Tick>,
    synced: bool,
}

/// Changes detected while replacing the current state document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// New scoreboard tick, when it differs from the previous document.
    pub scoreboard_tick_changed: Option<Tick>,
    /// Tick at which the game went from running to stopped.
    pub finished_at: Option<Tick>,
}

impl LiveState {
    /// Latest state document.
    pub fn current(&self) -> &CurrentState {
        &self.current
    }

    /// Whether at least one state document has been received.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Whether the latest document lists `team_id` as banned.
    pub fn is_banned(&self, team_id: TeamId) -> bool {
        self.banned.contains(&team_id)
    }

    /// Banned teams of the latest document.
    pub fn banned(&self) -> &BTreeSet<TeamId> {
        &self.banned
    }

    /// Seconds the local clock runs ahead of the backend.
    pub fn delta_client_to_server(&self) -> i64 {
        self.delta_client_to_server
    }

    /// Tick of the final scoreboard, once the game has been stopped.
    pub fn final_tick(&self) -> Option<Tick> {
        self.final_tick
    }

    /// Replace the current document and report the transitions it causes.
    pub fn apply(&mut self, response: CurrentStateResponse, now: OffsetDateTime) -> Transition {
        let CurrentStateResponse { state, date_header } = response;
        let previous = std::mem::replace(&mut self.current, state);
        self.banned = self.current.banned_set();
        self.synced = true;

        if self.current.scoreboard_tick > self.current.current_tick {
            warn!(
                scoreboard_tick = self.current.scoreboard_tick,
                current_tick = self.current.current_tick,
                "scoreboard tick is ahead of the current tick"
            );
        }

        // A repeated header means the response came from a cache.
        if let Some(header) = date_header.as_deref() {
            if self.last_date_header.as_deref() != Some(header) {
                match parse_http_date(header) {
                    Ok(server_time) => {
                        self.delta_client_to_server = clock_delta(now, server_time);
                        info!(delta = self.delta_client_to_server, date = header, "time delta");
                    }
                    Err(err) => warn!(date = header, error = %err, "unparsable Date header"),
                }
            }
        }
        self.last_date_header = date_header;

        let mut transition = Transition::default();
        if previous.state == GamePhase::Running && self.current.state == GamePhase::Stopped {
            self.final_tick = Some(self.current.current_tick);
            transition.finished_at = Some(self.current.current_tick);
        }
        if previous.scoreboard_tick != self.current.scoreboard_tick {
            transition.scoreboard_tick_changed = Some(self.current.scoreboard_tick);
        }
        transition
    }

    /// Seconds left in the current tick as seen by the server, never negative.
    pub fn remaining_seconds(&self, now: OffsetDateTime) -> i64 {
        (self.current.current_tick_until - now.unix_timestamp() + self.delta_client_to_server).max(0)
    }
}

/// Parse an IMF-fixdate such as `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn parse_http_date(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    PrimitiveDateTime::parse(value.trim(), format).map(PrimitiveDateTime::assume_utc)
}

fn clock_delta(client: OffsetDateTime, server: OffsetDateTime) -> i64 {
    let millis = (client - server).whole_milliseconds();
    millis.div_euclid(1_000) as i64
}

/// Render a countdown as `MM:SS`.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
