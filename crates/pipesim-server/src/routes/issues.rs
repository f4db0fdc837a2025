use axum::extract::{Query, State};
use axum::Json;
use pipesim_core::issue::{self, Issue};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct IssueFilter {
    pub assignee: Option<String>,
}

/// GET /issues: all issues, or only those assigned to `?assignee=`.
pub async fn list_issues(
    State(app): State<AppState>,
    Query(filter): Query<IssueFilter>,
) -> Json<Vec<Issue>> {
    let issues = app.sim.lock().await.store().issues().snapshot();
    match filter.assignee {
        Some(name) => Json(
            issue::assigned_to(&issues, &name)
                .into_iter()
                .cloned()
                .collect(),
        ),
        None => Json(issues),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignIssueBody {
    pub issue_id: u64,
    #[serde(default)]
    pub assignee: Option<String>,
}

/// POST /assign-issue: set or clear an issue's assignee.
pub async fn assign_issue(
    State(app): State<AppState>,
    Json(body): Json<AssignIssueBody>,
) -> Result<Json<Issue>, AppError> {
    let assignee = body
        .assignee
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    let issue = app
        .sim
        .lock()
        .await
        .store_mut()
        .assign_issue(body.issue_id, assignee)?;
    app.publish();
    Ok(Json(issue))
}
