//! Inject live events by hand to rehearse the overlays.

use tracing::info;

use crate::{
    dto::debug::{FirstBloodTrigger, TriggeredEvent},
    error::ServiceError,
    state::{SharedState, events::LiveEvent},
};

/// Pretend the game just ended at the newest scoreboard tick.
pub async fn trigger_final(state: &SharedState) -> Result<TriggeredEvent, ServiceError> {
    let tick = state.live().read().await.current().scoreboard_tick;
    if tick < 0 {
        return Err(ServiceError::InvalidInput("no scoreboard published yet".into()));
    }
    info!(tick, "debug: final notification triggered");
    state.events().emit(LiveEvent::Final { tick });
    Ok(TriggeredEvent::Final { tick })
}

/// Pretend a team just exploited a service for the first time.
pub async fn trigger_first_blood(
    state: &SharedState,
    request: FirstBloodTrigger,
) -> Result<TriggeredEvent, ServiceError> {
    let service = match request.service {
        Some(service) => service,
        None => state
            .rounds()
            .get(state.events().newest_tick())
            .and_then(|round| round.services.first().map(|service| service.name.clone()))
            .ok_or_else(|| ServiceError::NotFound("no service known yet".into()))?,
    };
    let team = match request.team {
        Some(team) => team,
        None => state
            .teams()
            .read()
            .await
            .values()
            .next()
            .map(|team| team.name.clone())
            .ok_or_else(|| ServiceError::NotFound("no team known yet".into()))?,
    };

    info!(%service, %team, "debug: first blood triggered");
    state.events().emit(LiveEvent::FirstBlood {
        service: service.clone(),
        team: team.clone(),
    });
    Ok(TriggeredEvent::FirstBlood { service, team })
}
