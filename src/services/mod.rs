/// Manual event triggers for rehearsing the overlays.
#[cfg(feature = "debug-hooks")]
pub mod debug_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// First blood and game over overlays.
pub mod notification_dispatcher;
/// Public service for read-only scoreboard information.
pub mod public_service;
/// Cached round snapshots and point histories.
pub mod ranking_cache;
/// Minimum spacing between stream items.
pub mod rate_limiter;
/// Linear backoff for backend requests.
pub mod retry;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Adaptive polling of the current game state.
pub mod state_poller;
/// Team directory loading.
pub mod team_directory;
