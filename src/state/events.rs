//! In-process fan-out of the newest scoreboard tick and of derived [`LiveEvent`]s.

use tokio::sync::{broadcast, watch};

use crate::dao::models::Tick;

/// Notable things derived from the backend documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    /// `team` is the latest team to exploit `service` for the first time.
    FirstBlood { service: String, team: String },
    /// The game was stopped; `tick` holds the final scoreboard.
    Final { tick: Tick },
}

/// Publish/subscribe hub for the newest scoreboard tick and [`LiveEvent`]s.
///
/// Dropping a receiver unsubscribes it.
pub struct EventBus {
    newest_tick: watch::Sender<Tick>,
    events: broadcast::Sender<LiveEvent>,
}

impl EventBus {
    /// Create a bus buffering at most `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (newest_tick, _rx) = watch::channel(-1);
        let (events, _rx) = broadcast::channel(capacity);
        Self {
            newest_tick,
            events,
        }
    }

    /// Follow the newest scoreboard tick, starting with the current value.
    pub fn subscribe_newest_tick(&self) -> watch::Receiver<Tick> {
        self.newest_tick.subscribe()
    }

    /// Last published scoreboard tick, `-1` before the first poll.
    pub fn newest_tick(&self) -> Tick {
        *self.newest_tick.borrow()
    }

    /// Announce `tick` to every watcher, waking them even if the value is unchanged.
    pub fn publish_newest_tick(&self, tick: Tick) {
        self.newest_tick.send_replace(tick);
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.events.subscribe()
    }

    /// Deliver `event` to all current subscribers; dropped if nobody listens.
    pub fn emit(&self, event: LiveEvent) {
        let _ = self.events.send(event);
    }
}
