//! Process-wide caches of immutable round snapshots and per-team point histories.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use dashmap::DashMap;

use crate::dao::models::{RoundInformation, TeamId, Tick};

/// Points of a team indexed `[service][tick]`.
pub type PointHistory = Vec<Vec<f64>>;

/// Round snapshots keyed by tick. Entries are never evicted.
///
/// Also tracks the newest tick whose first bloods and history updates were derived,
/// so that work happens once per tick however many callers fetch it.
pub struct RoundCache {
    rounds: DashMap<Tick, Arc<RoundInformation>>,
    processed: AtomicI64,
}

impl Default for RoundCache {
    fn default() -> Self {
        Self {
            rounds: DashMap::new(),
            processed: AtomicI64::new(-1),
        }
    }
}

impl RoundCache {
    /// Shared snapshot of `tick`, if cached.
    pub fn get(&self, tick: Tick) -> Option<Arc<RoundInformation>> {
        self.rounds.get(&tick).map(|entry| entry.value().clone())
    }

    /// Store a snapshot, returning `false` when a concurrent fetch already stored one.
    pub fn put(&self, tick: Tick, round: Arc<RoundInformation>) -> bool {
        self.rounds.insert(tick, round).is_none()
    }

    /// Whether `tick` has been fetched.
    pub fn contains(&self, tick: Tick) -> bool {
        self.rounds.contains_key(&tick)
    }

    /// Drop the snapshot of `tick`.
    pub fn invalidate(&self, tick: Tick) {
        self.rounds.remove(&tick);
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Claim the processing of `tick`.
    ///
    /// Returns `true` for exactly one caller per tick, and never for a tick at or
    /// below one already claimed.
    pub fn claim_processing(&self, tick: Tick) -> bool {
        self.processed.fetch_max(tick, Ordering::SeqCst) < tick
    }

    /// Newest tick claimed by [`RoundCache::claim_processing`], `-1` before the first.
    pub fn processed_tick(&self) -> Tick {
        self.processed.load(Ordering::SeqCst)
    }
}

/// Point histories keyed by team, extended in place as new rounds arrive.
#[derive(Default)]
pub struct PointHistoryCache {
    histories: DashMap<TeamId, PointHistory>,
}

impl PointHistoryCache {
    /// Copy of the history of `team_id`, if cached.
    pub fn get(&self, team_id: TeamId) -> Option<PointHistory> {
        self.histories.get(&team_id).map(|entry| entry.value().clone())
    }

    /// Number of ticks covered by the entry of `team_id`.
    pub fn covered_ticks(&self, team_id: TeamId) -> Option<usize> {
        self.histories
            .get(&team_id)
            .and_then(|entry| entry.first().map(Vec::len))
    }

    /// Store a history; empty histories are not cached.
    pub fn put(&self, team_id: TeamId, history: PointHistory) {
        if !history.is_empty() {
            self.histories.insert(team_id, history);
        }
    }

    /// Drop the history of `team_id`.
    pub fn invalidate(&self, team_id: TeamId) {
        self.histories.remove(&team_id);
    }

    /// Drop every entry, e.g. after the service list changed shape.
    pub fn invalidate_all(&self) {
        self.histories.clear();
    }

    /// Number of teams with a cached history.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Append the points of `round` to every entry that ends right before it.
    ///
    /// Returns the teams whose entry was extended.
    pub fn extend_with_round(&self, round: &RoundInformation) -> Vec<TeamId> {
        let Ok(expected_len) = usize::try_from(round.tick) else {
            return Vec::new();
        };

        let mut extended = Vec::new();
        for mut entry in self.histories.iter_mut() {
            let team_id = *entry.key();
            if entry.first().map(Vec::len) != Some(expected_len) {
                continue;
            }
            let Some(rank) = round.rank_of(team_id) else {
                continue;
            };
            for (series, result) in entry.value_mut().iter_mut().zip(&rank.services) {
                series.push(result.total());
            }
            extended.push(team_id);
        }
        extended
    }
}
