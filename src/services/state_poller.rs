//! Keep the current game state fresh, polling faster around tick boundaries.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    dao::models::{CurrentState, GamePhase},
    services::sse_events,
    state::{SharedState, events::LiveEvent},
};

/// Fixed delay after a failed poll; the poller never gives up.
const FAILURE_RETRY: Duration = Duration::from_secs(5);
/// Upper bound for the delay between two polls.
const MAX_WAIT_SECS: i64 = 10;
/// Below this many seconds before the tick ends the poller switches to short delays.
const NEAR_BOUNDARY_SECS: i64 = 2;
const RUNNING_WAIT: Duration = Duration::from_secs(1);
const SUSPENDED_WAIT: Duration = Duration::from_secs(5);
const STOPPED_WAIT: Duration = Duration::from_secs(10);
/// Re-check soon after the game stopped to pick up the final scoreboard.
const FINAL_RECHECK: Duration = Duration::from_secs(2);
/// Maximum random extra delay while running, spreading clients apart.
const MAX_JITTER_SECS: f64 = 0.5;

/// Delay until the next poll for the given state.
///
/// `jitter` is a fraction in `[0, 1)` of the maximum extra delay applied while running.
pub fn next_poll_delay(current: &CurrentState, now_secs: i64, jitter: f64) -> Duration {
    let remaining = current.current_tick_until - now_secs;
    let scoreboard_lagging = current.scoreboard_tick < current.current_tick - 1;

    if remaining < NEAR_BOUNDARY_SECS || scoreboard_lagging {
        match current.state {
            GamePhase::Running => {
                RUNNING_WAIT + Duration::from_secs_f64(jitter.clamp(0.0, 1.0) * MAX_JITTER_SECS)
            }
            GamePhase::Suspended => SUSPENDED_WAIT,
            GamePhase::Stopped => STOPPED_WAIT,
        }
    } else {
        Duration::from_secs(remaining.min(MAX_WAIT_SECS) as u64)
    }
}

/// Fetch the current state once, publish what changed and return the delay until the next poll.
pub async fn poll_once(state: &SharedState) -> Duration {
    let response = match state.api().current_state().await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "failed to fetch current state; retrying");
            if state.update_degraded(true) {
                sse_events::broadcast_public_info(state, "scoreboard backend unreachable");
            }
            return FAILURE_RETRY;
        }
    };

    let now = state.clock().now();
    let (transition, current) = {
        let mut live = state.live().write().await;
        let transition = live.apply(response, now);
        (transition, live.current().clone())
    };

    if state.update_degraded(false) {
        info!("scoreboard backend reachable again");
    }

    let mut delay = next_poll_delay(&current, now.unix_timestamp(), rand::random::<f64>());

    if let Some(tick) = transition.finished_at {
        info!(tick, "game stopped; final scoreboard pending");
        state.events().emit(LiveEvent::Final { tick });
        delay = FINAL_RECHECK;
    }
    if let Some(tick) = transition.scoreboard_tick_changed {
        debug!(tick, "new scoreboard tick");
        state.events().publish_newest_tick(tick);
        sse_events::broadcast_scoreboard_tick(state, &current);
    }

    delay
}

/// Poll forever; abort the task to stop it.
pub async fn run(state: SharedState) {
    loop {
        let delay = poll_once(&state).await;
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, current, test_state};

    const NOW: i64 = 1_700_000_000;

    fn state_doc(state: GamePhase, tick: i64, scoreboard_tick: i64, until: i64) -> CurrentState {
        CurrentState {
            current_tick: tick,
            state,
            current_tick_until: until,
            scoreboard_tick,
            banned_teams: None,
        }
    }

    #[test]
    fn far_from_boundary_waits_remaining_time_capped() {
        let doc = state_doc(GamePhase::Running, 5, 4, NOW + 7);
        assert_eq!(next_poll_delay(&doc, NOW, 0.3), Duration::from_secs(7));
        let doc = state_doc(GamePhase::Running, 5, 4, NOW + 100);
        assert_eq!(next_poll_delay(&doc, NOW, 0.3), Duration::from_secs(10));
    }

    #[test]
    fn near_boundary_uses_short_delay_per_phase() {
        let running = state_doc(GamePhase::Running, 5, 4, NOW + 1);
        assert_eq!(next_poll_delay(&running, NOW, 0.0), Duration::from_secs(1));
        assert_eq!(next_poll_delay(&running, NOW, 0.5), Duration::from_millis(1_250));

        let suspended = state_doc(GamePhase::Suspended, 5, 4, NOW - 30);
        assert_eq!(next_poll_delay(&suspended, NOW, 0.9), Duration::from_secs(5));

        let stopped = state_doc(GamePhase::Stopped, 5, 4, NOW);
        assert_eq!(next_poll_delay(&stopped, NOW, 0.9), Duration::from_secs(10));
    }

    #[test]
    fn lagging_scoreboard_uses_short_delay() {
        let doc = state_doc(GamePhase::Running, 10, 8, NOW + 60);
        assert!(next_poll_delay(&doc, NOW, 0.2) < Duration::from_millis(1_500));
    }

    #[tokio::test]
    async fn failed_poll_retries_after_fixed_delay_and_degrades() {
        let api = FakeApi::default();
        let state = test_state(api.clone());
        assert_eq!(poll_once(&state).await, FAILURE_RETRY);
        assert!(state.is_degraded());
        assert_eq!(api.current_state_calls(), 1);
    }

    #[tokio::test]
    async fn scoreboard_tick_change_is_published() {
        let api = FakeApi::default();
        let state = test_state(api.clone());
        let mut newest = state.events().subscribe_newest_tick();

        api.push_current(current(GamePhase::Running, 6, 5, NOW + 60));
        poll_once(&state).await;

        assert!(!state.is_degraded());
        assert!(newest.has_changed().unwrap());
        assert_eq!(*newest.borrow_and_update(), 5);
    }

    #[tokio::test]
    async fn running_to_stopped_emits_exactly_one_final() {
        let api = FakeApi::default();
        let state = test_state(api.clone());
        let mut events = state.events().subscribe();

        api.push_current(current(GamePhase::Running, 40, 39, NOW + 60));
        poll_once(&state).await;
        api.push_current(current(GamePhase::Stopped, 40, 40, NOW + 60));
        assert_eq!(poll_once(&state).await, FINAL_RECHECK);
        api.push_current(current(GamePhase::Stopped, 40, 40, NOW + 60));
        poll_once(&state).await;

        assert_eq!(events.recv().await.unwrap(), LiveEvent::Final { tick: 40 });
        assert!(events.try_recv().is_err());
        assert_eq!(state.live().read().await.final_tick(), Some(40));
    }
}
