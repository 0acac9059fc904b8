use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::models::{Team, TeamsDocument},
    services::retry::{RetryPolicy, retry_with_backoff},
    state::SharedState,
};

const TEAMS_RETRY: RetryPolicy = RetryPolicy::new(Duration::from_millis(2_000), 20);
/// Pause before starting a fresh retry budget once the previous one is exhausted.
const RELOAD_DELAY: Duration = Duration::from_secs(5);

/// Load the team directory, retrying until it succeeds.
pub async fn load(state: SharedState) {
    loop {
        let api = state.api();
        match retry_with_backoff(TEAMS_RETRY, || api.teams()).await {
            Ok(document) => {
                let teams = with_ids(document);
                info!(count = teams.len(), "loaded team directory");
                *state.teams().write().await = teams;
                return;
            }
            Err(err) => {
                warn!(error = %err, "failed to load team directory; trying again");
                sleep(RELOAD_DELAY).await;
            }
        }
    }
}

/// Copy each map key into the `id` field of its team.
pub fn with_ids(mut document: TeamsDocument) -> TeamsDocument {
    for (id, team) in document.iter_mut() {
        team.id = *id;
    }
    document
}

/// Every known team in directory order.
pub async fn all_teams(state: &SharedState) -> Vec<Team> {
    state.teams().read().await.values().cloned().collect()
}
