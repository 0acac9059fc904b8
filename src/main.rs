//! scoreboard-relay binary entrypoint wiring the backend poller, caches, overlays and HTTP layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoreboard_relay::{
    config::AppConfig,
    dao::http::{ApiConfig, HttpScoreboardApi},
    routes,
    services::{notification_dispatcher, ranking_cache, state_poller, team_directory},
    state::{AppState, SharedState, clock::SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    info!(url = %config.api_base_url, "relaying scoreboard backend");
    let api = HttpScoreboardApi::new(
        ApiConfig::new(config.api_base_url.clone()).with_request_timeout(config.request_timeout),
    )
    .context("building scoreboard API client")?;

    let app_state = AppState::new(config, Arc::new(api), Arc::new(SystemClock));
    let tasks = spawn_background_tasks(&app_state);

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    let served = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum");

    for task in tasks {
        task.abort();
    }
    served
}

/// Start the team loader, the poller, the newest round follower and the notification dispatcher.
fn spawn_background_tasks(state: &SharedState) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(team_directory::load(state.clone())),
        tokio::spawn(state_poller::run(state.clone())),
        tokio::spawn(ranking_cache::follow_newest_tick(state.clone())),
        tokio::spawn(notification_dispatcher::run(state.clone())),
    ]
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                error!(error = %err, "cannot listen for SIGTERM; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
