//! Memoised access to round snapshots and team point histories.
//!
//! Fetching the snapshot of the newest scoreboard tick also derives first blood
//! events from the previous snapshot and keeps warmed point histories in sync,
//! so dashboards following the live tick never re-download a team history.
//!
//! Concurrent requests for the same uncached document are not coalesced; each
//! one hits the backend and the last response wins. Derived events are still
//! produced once per tick, guarded by the processed-tick watermark of the round
//! cache.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    dao::models::{RoundInformation, ServiceStat, TeamId, Tick},
    error::ServiceError,
    services::retry::{RetryPolicy, retry_with_backoff},
    state::{SharedState, cache::PointHistory, events::LiveEvent},
};

const ROUND_RETRY: RetryPolicy = RetryPolicy::new(Duration::from_millis(1_500), 10);
const HISTORY_RETRY: RetryPolicy = RetryPolicy::new(Duration::from_millis(1_500), 3);
const STATS_RETRY: RetryPolicy = RetryPolicy::new(Duration::from_millis(1_500), 3);

/// Return the snapshot of `tick`, fetching it on first access.
///
/// Once `tick` is the scoreboard tick and its predecessor is cached, first bloods and
/// point history updates are derived from it exactly once, whether the snapshot came
/// from the backend or from the cache.
pub async fn get_ranking(
    state: &SharedState,
    tick: Tick,
) -> Result<Arc<RoundInformation>, ServiceError> {
    if tick < 0 {
        return Err(ServiceError::InvalidInput(format!("tick {tick} does not exist")));
    }
    let round = match state.rounds().get(tick) {
        Some(cached) => cached,
        None => fetch_round(state, tick).await?,
    };

    process_if_newest(state, tick, &round).await;
    Ok(round)
}

async fn fetch_round(state: &SharedState, tick: Tick) -> Result<Arc<RoundInformation>, ServiceError> {
    let api = state.api();
    let round = retry_with_backoff(ROUND_RETRY, || api.round(tick))
        .await
        .inspect_err(|err| warn!(tick, error = %err, "failed to fetch round"))?;
    if round.tick != tick {
        warn!(requested = tick, served = round.tick, "round document carries another tick");
    }

    let round = Arc::new(round);
    if !state.rounds().put(tick, round.clone()) {
        debug!(tick, "round was fetched concurrently");
    }
    Ok(round)
}

async fn process_if_newest(state: &SharedState, tick: Tick, round: &RoundInformation) {
    let scoreboard_tick = state.live().read().await.current().scoreboard_tick;
    if tick != scoreboard_tick {
        return;
    }
    let Some(previous) = state.rounds().get(tick - 1) else {
        return;
    };
    if state.rounds().claim_processing(tick) {
        process_new_round(state, &previous, round);
    }
}

/// Derive events and cache updates from the newest round and its predecessor.
fn process_new_round(state: &SharedState, previous: &RoundInformation, round: &RoundInformation) {
    for event in detect_first_bloods(previous, round) {
        state.events().emit(event);
    }

    if services_changed(previous, round) {
        info!(tick = round.tick, "service list changed; dropping point history cache");
        state.histories().invalidate_all();
    }

    let extended = state.histories().extend_with_round(round);
    if !extended.is_empty() {
        debug!(tick = round.tick, teams = ?extended, "extended cached point histories");
    }
}

/// First bloods present in `round` but not in `previous`, per service in order.
///
/// Services that did not exist in `previous` produce no events.
pub fn detect_first_bloods(previous: &RoundInformation, round: &RoundInformation) -> Vec<LiveEvent> {
    round
        .services
        .iter()
        .flat_map(|service| {
            let known = previous
                .services
                .iter()
                .find(|old| old.name == service.name)
                .map_or(service.first_blood.len(), |old| old.first_blood.len());
            service
                .first_blood
                .iter()
                .skip(known)
                .map(|team| LiveEvent::FirstBlood {
                    service: service.name.clone(),
                    team: team.clone(),
                })
        })
        .collect()
}

/// Whether the ordered list of service names differs between two rounds.
pub fn services_changed(previous: &RoundInformation, round: &RoundInformation) -> bool {
    !previous.service_names().eq(round.service_names())
}

/// Return the points of `team_id` indexed `[service][tick]`.
///
/// Served from the cache once it covers the current tick.
pub async fn get_team_point_history(
    state: &SharedState,
    team_id: TeamId,
) -> Result<PointHistory, ServiceError> {
    let current_tick = state.live().read().await.current().current_tick;
    let covered = state.histories().covered_ticks(team_id);
    if let Some(covered) = covered {
        if covered as i64 > current_tick {
            if let Some(history) = state.histories().get(team_id) {
                debug!(team_id, "serving point history from cache");
                return Ok(history);
            }
        }
    }

    let api = state.api();
    let history = retry_with_backoff(HISTORY_RETRY, || api.team_history(team_id))
        .await
        .inspect_err(|err| warn!(team_id, error = %err, "failed to fetch team history"))?;
    state.histories().put(team_id, history.points.clone());
    Ok(history.points)
}

/// Total points of `team_id` per tick, summed over all services.
pub async fn get_team_point_totals(
    state: &SharedState,
    team_id: TeamId,
) -> Result<Vec<f64>, ServiceError> {
    let history = get_team_point_history(state, team_id).await?;
    Ok(sum_services(&history))
}

/// Collapse a `[service][tick]` history into one total per tick.
pub fn sum_services(history: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = history.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|tick| {
            history
                .iter()
                .map(|series| series.get(tick).copied().unwrap_or_default())
                .sum()
        })
        .collect()
}

/// Attacker/victim counters indexed `[service][tick]`. Not cached.
pub async fn get_service_stat_history(
    state: &SharedState,
) -> Result<Vec<Vec<ServiceStat>>, ServiceError> {
    let api = state.api();
    let stats = retry_with_backoff(STATS_RETRY, || api.service_stats())
        .await
        .inspect_err(|err| warn!(error = %err, "failed to fetch service stats"))?;
    Ok(stats.stats)
}

/// Fetch the snapshot of every new scoreboard tick as soon as it is announced.
pub async fn follow_newest_tick(state: SharedState) {
    let mut newest = state.events().subscribe_newest_tick();
    loop {
        let tick = *newest.borrow_and_update();
        if tick >= 0 {
            if let Err(err) = get_ranking(&state, tick).await {
                warn!(tick, error = %err, "could not load newest round");
            }
        }
        if newest.changed().await.is_err() {
            break;
        }
    }
}
