pub mod cache;
pub mod clock;
pub mod events;
pub mod live;
pub mod overlay;
mod preferences;
mod sse;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig,
    dao::{ScoreboardApi, models::TeamsDocument},
};

pub use self::preferences::Preferences;
pub use self::sse::{SseHub, SseSubscription};
use self::{
    cache::{PointHistoryCache, RoundCache},
    clock::Clock,
    events::EventBus,
    live::LiveState,
    overlay::OverlayState,
};

pub type SharedState = Arc<AppState>;

const EVENT_CAPACITY: usize = 64;
const SSE_CAPACITY: usize = 32;

/// Central application state: backend handle, caches, live game state and fan-out hubs.
pub struct AppState {
    config: AppConfig,
    api: Arc<dyn ScoreboardApi>,
    clock: Arc<dyn Clock>,
    live: RwLock<LiveState>,
    teams: RwLock<TeamsDocument>,
    rounds: RoundCache,
    histories: PointHistoryCache,
    events: EventBus,
    public_sse: SseHub,
    overlay: RwLock<OverlayState>,
    preferences: RwLock<Preferences>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The relay starts in degraded mode until the first state document arrives.
    pub fn new(config: AppConfig, api: Arc<dyn ScoreboardApi>, clock: Arc<dyn Clock>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let preferences = config.preferences;
        Arc::new(Self {
            config,
            api,
            clock,
            live: RwLock::new(LiveState::default()),
            teams: RwLock::new(TeamsDocument::new()),
            rounds: RoundCache::default(),
            histories: PointHistoryCache::default(),
            events: EventBus::new(EVENT_CAPACITY),
            public_sse: SseHub::new(SSE_CAPACITY),
            overlay: RwLock::new(OverlayState::default()),
            preferences: RwLock::new(preferences),
            degraded: degraded_tx,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the scoreboard backend.
    pub fn api(&self) -> Arc<dyn ScoreboardApi> {
        self.api.clone()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Game state as last polled from the backend.
    pub fn live(&self) -> &RwLock<LiveState> {
        &self.live
    }

    /// Team directory keyed by team id.
    pub fn teams(&self) -> &RwLock<TeamsDocument> {
        &self.teams
    }

    pub fn rounds(&self) -> &RoundCache {
        &self.rounds
    }

    pub fn histories(&self) -> &PointHistoryCache {
        &self.histories
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.public_sse
    }

    pub fn overlay(&self) -> &RwLock<OverlayState> {
        &self.overlay
    }

    pub fn preferences(&self) -> &RwLock<Preferences> {
        &self.preferences
    }

    /// Current degraded flag: set while the backend cannot be polled.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag, returning whether it changed.
    pub fn update_degraded(&self, value: bool) -> bool {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}
