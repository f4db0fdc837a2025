use axum::extract::State;
use axum::Json;
use pipesim_core::commit::Commit;
use pipesim_core::deployment::Deployment;
use pipesim_core::pull_request::PullRequest;

use crate::state::AppState;

/// GET /commits
pub async fn list_commits(State(app): State<AppState>) -> Json<Vec<Commit>> {
    let commits = app.sim.lock().await.store().commits().snapshot();
    Json(commits)
}

/// GET /pull-requests
pub async fn list_pull_requests(State(app): State<AppState>) -> Json<Vec<PullRequest>> {
    let prs = app.sim.lock().await.store().pull_requests().snapshot();
    Json(prs)
}

/// GET /deployments
pub async fn list_deployments(State(app): State<AppState>) -> Json<Vec<Deployment>> {
    let deployments = app.sim.lock().await.store().deployments().snapshot();
    Json(deployments)
}
