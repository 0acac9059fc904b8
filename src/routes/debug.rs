use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::debug::{FirstBloodTrigger, TriggeredEvent},
    error::AppError,
    services::debug_service,
    state::SharedState,
};

/// Manual triggers for rehearsing the overlays; only built with the `debug-hooks` feature.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/debug/trigger-final", post(trigger_final))
        .route("/debug/trigger-firstblood", post(trigger_first_blood))
}

#[utoipa::path(
    post,
    path = "/debug/trigger-final",
    tag = "debug",
    responses(
        (status = 200, description = "Game over event emitted", body = TriggeredEvent),
        (status = 400, description = "No scoreboard published yet")
    )
)]
pub async fn trigger_final(
    State(state): State<SharedState>,
) -> Result<Json<TriggeredEvent>, AppError> {
    Ok(Json(debug_service::trigger_final(&state).await?))
}

#[utoipa::path(
    post,
    path = "/debug/trigger-firstblood",
    tag = "debug",
    request_body = FirstBloodTrigger,
    responses(
        (status = 200, description = "First blood event emitted", body = TriggeredEvent),
        (status = 404, description = "No service or team to default to")
    )
)]
/// Emit a first blood, defaulting to the first cached service and team.
pub async fn trigger_first_blood(
    State(state): State<SharedState>,
    request: Option<Json<FirstBloodTrigger>>,
) -> Result<Json<TriggeredEvent>, AppError> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    Ok(Json(debug_service::trigger_first_blood(&state, request).await?))
}
