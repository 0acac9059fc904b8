use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{
    dto::sse::ServerEvent,
    state::{SharedState, SseSubscription},
};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);
const FORWARD_BUFFER: usize = 8;

/// Subscribe to the public stream, including the current tick, overlay and preferences.
pub fn subscribe_public(state: &SharedState) -> SseSubscription {
    state.public_sse().subscribe_with_replay()
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}

/// Convert a subscription into an SSE response: the replayed events first, then
/// live events until the client disconnects.
pub fn to_sse_stream(
    subscription: SseSubscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let SseSubscription {
        replay,
        mut receiver,
    } = subscription;
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(FORWARD_BUFFER);

    tokio::spawn(async move {
        for payload in replay {
            if tx.send(Ok(to_event(payload))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "SSE subscriber lagging; skipping events");
                        }
                    }
                }
            }
        }

        info!("Public SSE stream disconnected");
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::sse_events,
        testing::{FakeApi, test_state},
    };

    #[tokio::test]
    async fn new_dashboard_gets_current_overlay_and_preferences() {
        let state = test_state(FakeApi::default());
        sse_events::broadcast_preferences(&state, &*state.preferences().read().await);
        sse_events::broadcast_first_blood(&state, "web", "A");
        sse_events::broadcast_overlay(&state, &*state.overlay().read().await);

        let subscription = subscribe_public(&state);
        let kinds: Vec<_> = subscription
            .replay
            .iter()
            .filter_map(|event| event.event.clone())
            .collect();
        assert_eq!(kinds, vec!["overlay", "preferences"]);
    }
}
