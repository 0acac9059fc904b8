//! Turn live events into the overlays shown on the dashboards.
//!
//! Events are paced by a [`RateLimiter`] so a burst of first bloods is shown one
//! after another instead of overwriting each other.

use std::time::Duration;

use futures::StreamExt;
use tokio::time::sleep;
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tracing::{info, warn};

use crate::{
    dao::models::{RoundInformation, TeamsDocument, Tick},
    error::ServiceError,
    services::{rate_limiter::RateLimiter, ranking_cache, sse_events},
    state::{SharedState, events::LiveEvent, overlay::PodiumEntry},
};

/// How long a first blood banner stays on screen.
pub const FIRST_BLOOD_DISPLAY: Duration = Duration::from_secs(10);
/// Delay between the game over backdrop and the fireworks.
pub const PYRO_EFFECT_DELAY: Duration = Duration::from_secs(1);
/// Total duration of the game over animation.
pub const PYRO_DURATION: Duration = Duration::from_secs(30);
const PODIUM_SIZE: usize = 3;

/// Consume live events until the bus closes or the task is aborted.
pub async fn run(state: SharedState) {
    let events = BroadcastStream::new(state.events().subscribe()).filter_map(|received| async move {
        match received {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "notification dispatcher lagging; events lost");
                None
            }
        }
    });
    let limited = RateLimiter::new(state.config().notification_interval).limit(events);
    futures::pin_mut!(limited);

    while let Some(event) = limited.next().await {
        handle_event(&state, event).await;
    }
}

/// React to a single event.
pub async fn handle_event(state: &SharedState, event: LiveEvent) {
    match event {
        LiveEvent::FirstBlood { service, team } => first_blood(state, service, team).await,
        LiveEvent::Final { tick } => {
            info!(tick, "game is over");
            let state = state.clone();
            tokio::spawn(async move {
                if let Err(err) = game_over(&state, tick).await {
                    warn!(tick, error = %err, "could not load final scoreboard");
                }
            });
        }
    }
}

async fn first_blood(state: &SharedState, service: String, team: String) {
    info!(%team, %service, "first blood");
    sse_events::broadcast_first_blood(state, &service, &team);
    if !state.preferences().read().await.show_notifications {
        return;
    }

    let generation = {
        let mut overlay = state.overlay().write().await;
        let generation = overlay.show_first_blood(service, team);
        sse_events::broadcast_overlay(state, &overlay);
        generation
    };

    let state = state.clone();
    tokio::spawn(async move {
        sleep(FIRST_BLOOD_DISPLAY).await;
        let mut overlay = state.overlay().write().await;
        if overlay.expire_first_blood(generation) {
            sse_events::broadcast_overlay(&state, &overlay);
        }
    });
}

/// Hide the first blood banner right away.
pub async fn dismiss(state: &SharedState) -> bool {
    let mut overlay = state.overlay().write().await;
    let hidden = overlay.dismiss_first_blood();
    if hidden {
        sse_events::broadcast_overlay(state, &overlay);
    }
    hidden
}

/// Fetch the final scoreboard, publish its podium and play the animation.
///
/// The backend renders the last scoreboard after the game stops, so this waits until
/// `tick` has been announced as the newest scoreboard tick.
pub async fn game_over(state: &SharedState, tick: Tick) -> Result<Vec<PodiumEntry>, ServiceError> {
    wait_for_scoreboard(state, tick).await;
    let ranking = ranking_cache::get_ranking(state, tick).await?;
    let podium = {
        let teams = state.teams().read().await;
        podium(&ranking, &teams)
    };
    sse_events::broadcast_game_over(state, tick, &podium);
    state.overlay().write().await.set_podium(podium.clone());

    if state.preferences().read().await.show_notifications {
        play_pyro(state).await;
    }
    Ok(podium)
}

async fn wait_for_scoreboard(state: &SharedState, tick: Tick) {
    let mut newest = state.events().subscribe_newest_tick();
    if *newest.borrow() < tick {
        info!(tick, "waiting for the final scoreboard");
    }
    if newest.wait_for(|newest| *newest >= tick).await.is_err() {
        warn!(tick, "newest tick channel closed before the final scoreboard");
    }
}

/// The best ranked teams of `ranking`, at most three.
pub fn podium(ranking: &RoundInformation, teams: &TeamsDocument) -> Vec<PodiumEntry> {
    ranking
        .scoreboard
        .iter()
        .take(PODIUM_SIZE)
        .map(|rank| PodiumEntry {
            team_id: rank.team_id,
            name: teams.get(&rank.team_id).map(|team| team.name.clone()),
            points: rank.points,
        })
        .collect()
}

async fn play_pyro(state: &SharedState) {
    let generation = {
        let mut overlay = state.overlay().write().await;
        let generation = overlay.start_pyro();
        sse_events::broadcast_overlay(state, &overlay);
        generation
    };

    let reveal_state = state.clone();
    tokio::spawn(async move {
        sleep(PYRO_EFFECT_DELAY).await;
        let mut overlay = reveal_state.overlay().write().await;
        if overlay.reveal_pyro(generation) {
            sse_events::broadcast_overlay(&reveal_state, &overlay);
        }
    });

    let end_state = state.clone();
    tokio::spawn(async move {
        sleep(PYRO_DURATION).await;
        let mut overlay = end_state.overlay().write().await;
        if overlay.end_pyro(generation) {
            sse_events::broadcast_overlay(&end_state, &overlay);
        }
    });
}

#[cfg(test)]
mod tests {
    use tokio::time::advance;

    use super::*;
    use crate::{
        dao::models::GamePhase,
        services::state_poller,
        state::overlay::{FirstBloodOverlay, PyroStage},
        testing::{FakeApi, current, round, team, test_state},
    };

    fn first_blood_event(team: &str) -> LiveEvent {
        LiveEvent::FirstBlood {
            service: "web".into(),
            team: team.into(),
        }
    }

    async fn settle() {
        for _ in 0..32 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_blood_banner_hides_after_display_time() {
        let state = test_state(FakeApi::default());
        handle_event(&state, first_blood_event("A")).await;
        settle().await;
        assert!(matches!(
            state.overlay().read().await.first_blood(),
            FirstBloodOverlay::Visible { .. }
        ));

        advance(FIRST_BLOOD_DISPLAY - Duration::from_millis(10)).await;
        settle().await;
        assert!(matches!(
            state.overlay().read().await.first_blood(),
            FirstBloodOverlay::Visible { .. }
        ));

        advance(Duration::from_millis(20)).await;
        settle().await;
        assert_eq!(state.overlay().read().await.first_blood(), &FirstBloodOverlay::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn escape_hides_banner_immediately() {
        let state = test_state(FakeApi::default());
        handle_event(&state, first_blood_event("A")).await;
        assert!(dismiss(&state).await);
        assert_eq!(state.overlay().read().await.first_blood(), &FirstBloodOverlay::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_notifications_skip_banner() {
        let state = test_state(FakeApi::default());
        state.preferences().write().await.show_notifications = false;
        let mut sse = state.public_sse().subscribe();

        handle_event(&state, first_blood_event("A")).await;

        assert_eq!(state.overlay().read().await.first_blood(), &FirstBloodOverlay::Idle);
        assert_eq!(sse.recv().await.unwrap().event.as_deref(), Some("first_blood"));
    }

    #[test]
    fn podium_takes_at_most_three_teams() {
        let mut teams = TeamsDocument::new();
        teams.insert(1, team(1, "A"));
        let ranking = round(9, &[], &[(1, &[10.0]), (2, &[8.0]), (3, &[5.0]), (4, &[1.0])]);

        let entries = podium(&ranking, &teams);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name.as_deref(), Some("A"));
        assert_eq!(entries[1].name, None);
        assert_eq!(entries[2].team_id, 3);

        let short = round(9, &[], &[(1, &[10.0])]);
        assert_eq!(podium(&short, &teams).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn game_stop_drives_single_podium_and_pyro_sequence() {
        let api = FakeApi::default();
        api.insert_round(round(40, &[], &[(1, &[30.0]), (2, &[20.0]), (3, &[10.0]), (4, &[5.0])]));
        let state = test_state(api.clone());
        let mut events = state.events().subscribe();

        api.push_current(current(GamePhase::Running, 40, 39, 0));
        state_poller::poll_once(&state).await;
        api.push_current(current(GamePhase::Stopped, 40, 40, 0));
        state_poller::poll_once(&state).await;

        let event = events.recv().await.unwrap();
        assert_eq!(event, LiveEvent::Final { tick: 40 });
        assert!(events.try_recv().is_err());

        handle_event(&state, event).await;
        settle().await;
        assert_eq!(api.round_calls(40), 1);
        assert_eq!(state.overlay().read().await.podium().len(), 3);
        assert_eq!(state.overlay().read().await.pyro(), PyroStage::Backdrop);

        advance(PYRO_EFFECT_DELAY).await;
        settle().await;
        assert_eq!(state.overlay().read().await.pyro(), PyroStage::Effect);

        advance(PYRO_DURATION - PYRO_EFFECT_DELAY).await;
        settle().await;
        assert_eq!(state.overlay().read().await.pyro(), PyroStage::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn podium_waits_for_final_scoreboard() {
        let api = FakeApi::default();
        api.insert_round(round(39, &[("web", &["A"])], &[(2, &[20.0]), (1, &[10.0])]));
        api.insert_round(round(40, &[("web", &["A", "B"])], &[(1, &[30.0]), (2, &[20.0])]));
        let state = test_state(api.clone());
        let mut events = state.events().subscribe();

        api.push_current(current(GamePhase::Running, 40, 39, 0));
        state_poller::poll_once(&state).await;
        ranking_cache::get_ranking(&state, 39).await.unwrap();
        api.push_current(current(GamePhase::Stopped, 40, 39, 0));
        state_poller::poll_once(&state).await;

        let event = events.recv().await.unwrap();
        assert_eq!(event, LiveEvent::Final { tick: 40 });
        handle_event(&state, event).await;
        settle().await;
        assert_eq!(api.round_calls(40), 0);
        assert!(state.overlay().read().await.podium().is_empty());

        api.push_current(current(GamePhase::Stopped, 40, 40, 0));
        state_poller::poll_once(&state).await;
        settle().await;

        assert_eq!(api.round_calls(40), 1);
        assert_eq!(state.overlay().read().await.podium()[0].team_id, 1);
        assert_eq!(
            events.recv().await.unwrap(),
            LiveEvent::FirstBlood {
                service: "web".into(),
                team: "B".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dispatcher_spaces_out_bursts() {
        let state = test_state(FakeApi::default());
        let dispatcher = tokio::spawn(run(state.clone()));
        settle().await;
        let mut sse = state.public_sse().subscribe();

        state.events().emit(first_blood_event("A"));
        state.events().emit(first_blood_event("B"));
        settle().await;

        let first = sse.recv().await.unwrap();
        assert_eq!(first.event.as_deref(), Some("first_blood"));
        assert!(first.data.contains("\"A\""));
        let _overlay = sse.recv().await.unwrap();
        assert!(sse.try_recv().is_err());

        advance(state.config().notification_interval).await;
        settle().await;
        let next: Vec<_> = std::iter::from_fn(|| sse.try_recv().ok()).collect();
        assert!(next.iter().any(|event| event.data.contains("\"B\"")));

        dispatcher.abort();
    }
}
