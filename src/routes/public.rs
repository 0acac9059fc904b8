use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dao::models::{RoundInformation, TeamId, Tick},
    dto::public::{
        CurrentStateResponse, PointHistoryResponse, PointTotalsResponse, ServiceStatsResponse,
        TeamsResponse,
    },
    error::AppError,
    services::public_service,
    state::SharedState,
};

/// Public read-only endpoints relaying the scoreboard documents.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/teams", get(get_teams))
        .route("/api/ranking/{tick}", get(get_ranking))
        .route("/api/teams/{id}/points", get(get_point_history))
        .route("/api/teams/{id}/points/total", get(get_point_totals))
        .route("/api/service-stats", get(get_service_stats))
}

#[utoipa::path(
    get,
    path = "/api/state",
    tag = "public",
    responses((status = 200, description = "Current game timing", body = CurrentStateResponse))
)]
/// Return the current tick, phase and countdown.
pub async fn get_state(State(state): State<SharedState>) -> Json<CurrentStateResponse> {
    Json(public_service::get_state(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "public",
    responses((status = 200, description = "Team directory", body = TeamsResponse))
)]
/// Return every team known to the scoreboard.
pub async fn get_teams(State(state): State<SharedState>) -> Json<TeamsResponse> {
    Json(public_service::get_teams(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/ranking/{tick}",
    tag = "public",
    params(("tick" = i64, Path, description = "Scoreboard tick")),
    responses(
        (status = 200, description = "Scoreboard of the tick", body = RoundInformation),
        (status = 400, description = "Negative tick"),
        (status = 404, description = "Tick not published"),
        (status = 502, description = "Backend unavailable")
    )
)]
/// Return the scoreboard snapshot of a tick.
pub async fn get_ranking(
    State(state): State<SharedState>,
    Path(tick): Path<Tick>,
) -> Result<Json<RoundInformation>, AppError> {
    Ok(Json(public_service::get_ranking(&state, tick).await?))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}/points",
    tag = "public",
    params(("id" = i64, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Points per service and tick", body = PointHistoryResponse),
        (status = 404, description = "Unknown team"),
        (status = 502, description = "Backend unavailable")
    )
)]
/// Return the points of a team per service and tick.
pub async fn get_point_history(
    State(state): State<SharedState>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<PointHistoryResponse>, AppError> {
    Ok(Json(public_service::get_point_history(&state, team_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}/points/total",
    tag = "public",
    params(("id" = i64, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Total points per tick", body = PointTotalsResponse),
        (status = 404, description = "Unknown team"),
        (status = 502, description = "Backend unavailable")
    )
)]
/// Return the total points of a team per tick.
pub async fn get_point_totals(
    State(state): State<SharedState>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<PointTotalsResponse>, AppError> {
    Ok(Json(public_service::get_point_totals(&state, team_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/service-stats",
    tag = "public",
    responses(
        (status = 200, description = "Attack statistics", body = ServiceStatsResponse),
        (status = 502, description = "Backend unavailable")
    )
)]
/// Return attacker and victim counts per service and tick.
pub async fn get_service_stats(
    State(state): State<SharedState>,
) -> Result<Json<ServiceStatsResponse>, AppError> {
    Ok(Json(public_service::get_service_stats(&state).await?))
}
