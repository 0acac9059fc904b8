use axum::Router;

use crate::state::SharedState;

#[cfg(feature = "debug-hooks")]
pub mod debug;
pub mod docs;
pub mod health;
pub mod overlay;
pub mod public;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(public::router())
        .merge(overlay::router());

    #[cfg(feature = "debug-hooks")]
    let api_router = api_router.merge(debug::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
