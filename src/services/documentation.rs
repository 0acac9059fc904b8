use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document of the scoreboard relay.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::public::get_state,
        crate::routes::public::get_teams,
        crate::routes::public::get_ranking,
        crate::routes::public::get_point_history,
        crate::routes::public::get_point_totals,
        crate::routes::public::get_service_stats,
        crate::routes::overlay::get_overlay,
        crate::routes::overlay::dismiss_overlay,
        crate::routes::overlay::get_preferences,
        crate::routes::overlay::update_preferences,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::public::CurrentStateResponse,
            crate::dto::public::TeamsResponse,
            crate::dto::public::PointHistoryResponse,
            crate::dto::public::PointTotalsResponse,
            crate::dto::public::ServiceStatsResponse,
            crate::dto::sse::ScoreboardTickEvent,
            crate::dto::sse::FirstBloodEvent,
            crate::dto::sse::GameOverEvent,
            crate::dto::sse::OverlaySnapshot,
            crate::dao::models::RoundInformation,
            crate::state::Preferences,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "public", description = "Relayed scoreboard documents"),
        (name = "overlay", description = "Notification overlays and display preferences"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;

#[cfg(feature = "debug-hooks")]
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::debug::trigger_final,
        crate::routes::debug::trigger_first_blood,
    ),
    components(schemas(
        crate::dto::debug::FirstBloodTrigger,
        crate::dto::debug::TriggeredEvent,
    )),
    tags((name = "debug", description = "Manual event triggers"))
)]
struct DebugApiDoc;

/// OpenAPI document of every route compiled into this build.
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[allow(unused_mut)]
    let mut doc = ApiDoc::openapi();
    #[cfg(feature = "debug-hooks")]
    doc.merge(DebugApiDoc::openapi());
    doc
}
