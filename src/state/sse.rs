use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Events describing current state rather than a moment; the latest one of each
/// kind is replayed to dashboards that connect later.
static RETAINED_EVENTS: [&str; 4] = ["scoreboard_tick", "overlay", "preferences", "game_over"];

/// Receiver plus the retained events a new subscriber should see first.
pub struct SseSubscription {
    pub replay: Vec<ServerEvent>,
    pub receiver: broadcast::Receiver<ServerEvent>,
}

/// Broadcast hub for a dashboard stream, remembering the latest state events.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
    retained: DashMap<&'static str, ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self {
            sender,
            retained: DashMap::new(),
        }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Subscribe and take a copy of the retained events, in a fixed kind order.
    pub fn subscribe_with_replay(&self) -> SseSubscription {
        let receiver = self.sender.subscribe();
        let replay = RETAINED_EVENTS
            .iter()
            .filter_map(|kind| self.retained.get(kind).map(|event| event.value().clone()))
            .collect();
        SseSubscription { replay, receiver }
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        if let Some(kind) = event
            .event
            .as_deref()
            .and_then(|name| RETAINED_EVENTS.iter().find(|kind| **kind == name).copied())
        {
            self.retained.insert(kind, event.clone());
        }
        let _ = self.sender.send(event);
    }
}
