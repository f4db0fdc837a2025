use axum::extract::State;
use axum::Json;
use pipesim_core::time_entry::TimeEntry;

use crate::state::AppState;

/// GET /time-entries: open entries serialize with `"end": null`.
pub async fn list_time_entries(State(app): State<AppState>) -> Json<Vec<TimeEntry>> {
    let entries = app.sim.lock().await.store().time_entries().to_vec();
    Json(entries)
}
