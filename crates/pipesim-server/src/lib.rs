pub mod clock;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use pipesim_core::config::SimConfig;
use pipesim_core::Simulation;
use std::future::Future;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum Router with all routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::health::health))
        // Events (SSE)
        .route("/events", get(routes::events::sse_events))
        // Pipeline
        .route("/commits", get(routes::pipeline::list_commits))
        .route("/pull-requests", get(routes::pipeline::list_pull_requests))
        .route("/deployments", get(routes::pipeline::list_deployments))
        .route("/time-entries", get(routes::time_entries::list_time_entries))
        // Issues
        .route("/issues", get(routes::issues::list_issues))
        .route("/assign-issue", post(routes::issues::assign_issue))
        // Incidents
        .route(
            "/incidents",
            get(routes::incidents::list_incidents).post(routes::incidents::report_incident),
        )
        .route("/resolutions", post(routes::incidents::resolve_incident))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Build state for `config`: a fresh simulation plus the configured notifier.
pub fn app_state(config: SimConfig) -> anyhow::Result<AppState> {
    let notifier = notify::from_config(&config)?;
    let sim = Simulation::new(config)?;
    Ok(AppState::new(sim, notifier))
}

/// Serve the HTTP surface and run the clock on a pre-bound listener until
/// `shutdown` resolves.
///
/// Taking a bound `TcpListener` lets the caller read the actual port first
/// (useful when binding port 0).
pub async fn serve_on<F>(
    listener: tokio::net::TcpListener,
    config: SimConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let interval = config.tick_interval();
    let app_state = app_state(config)?;
    let app = build_router(app_state.clone());

    let (stop_tx, stop_rx) = watch::channel(false);
    let clock = tokio::spawn(clock::run(app_state, interval, stop_rx));

    let actual_port = listener.local_addr()?.port();
    tracing::info!("pipesim listening on http://localhost:{actual_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("shutting down");
        })
        .await?;

    let _ = stop_tx.send(true);
    clock.await?;
    Ok(())
}
