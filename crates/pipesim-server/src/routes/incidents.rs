use axum::extract::State;
use axum::Json;
use pipesim_core::incident::Incident;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// GET /incidents: currently open incidents.
pub async fn list_incidents(State(app): State<AppState>) -> Json<Vec<Incident>> {
    let incidents = app.sim.lock().await.store().incidents().snapshot();
    Json(incidents)
}

#[derive(Debug, Deserialize)]
pub struct ReportIncidentBody {
    pub deployment_id: String,
    #[serde(default)]
    pub message: String,
}

/// POST /incidents: open an incident. Completion stays blocked until every
/// open incident is resolved.
pub async fn report_incident(
    State(app): State<AppState>,
    Json(body): Json<ReportIncidentBody>,
) -> Result<Json<Incident>, AppError> {
    if body.deployment_id.trim().is_empty() {
        return Err(AppError::bad_request("deployment_id must not be empty"));
    }
    let incident = app
        .sim
        .lock()
        .await
        .store_mut()
        .report_incident(body.deployment_id, body.message);
    app.publish();
    Ok(Json(incident))
}

#[derive(Debug, Deserialize)]
pub struct ResolveIncidentBody {
    pub incident_id: String,
}

/// POST /resolutions: close an open incident.
pub async fn resolve_incident(
    State(app): State<AppState>,
    Json(body): Json<ResolveIncidentBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.sim
        .lock()
        .await
        .store_mut()
        .resolve_incident(&body.incident_id)?;
    app.publish();
    Ok(Json(serde_json::json!({})))
}
