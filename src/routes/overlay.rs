use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::sse::OverlaySnapshot,
    services::public_service,
    state::{Preferences, SharedState},
};

/// Overlay and display preference controls shared by all dashboards.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/overlay", get(get_overlay))
        .route("/api/overlay/dismiss", post(dismiss_overlay))
        .route("/api/preferences", get(get_preferences).put(update_preferences))
}

#[utoipa::path(
    get,
    path = "/api/overlay",
    tag = "overlay",
    responses((status = 200, description = "Current overlays", body = OverlaySnapshot))
)]
/// Return the overlays currently displayed.
pub async fn get_overlay(State(state): State<SharedState>) -> Json<OverlaySnapshot> {
    Json(public_service::get_overlay(&state).await)
}

#[utoipa::path(
    post,
    path = "/api/overlay/dismiss",
    tag = "overlay",
    responses((status = 200, description = "Overlays after hiding the banner", body = OverlaySnapshot))
)]
/// Hide the first blood banner immediately.
pub async fn dismiss_overlay(State(state): State<SharedState>) -> Json<OverlaySnapshot> {
    Json(public_service::dismiss_overlay(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/preferences",
    tag = "overlay",
    responses((status = 200, description = "Display preferences", body = Preferences))
)]
pub async fn get_preferences(State(state): State<SharedState>) -> Json<Preferences> {
    Json(public_service::get_preferences(&state).await)
}

#[utoipa::path(
    put,
    path = "/api/preferences",
    tag = "overlay",
    request_body = Preferences,
    responses((status = 200, description = "Updated display preferences", body = Preferences))
)]
/// Replace the display preferences and notify every dashboard.
pub async fn update_preferences(
    State(state): State<SharedState>,
    Json(preferences): Json<Preferences>,
) -> Json<Preferences> {
    Json(public_service::update_preferences(&state, preferences).await)
}
