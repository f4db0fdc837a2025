use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{extract::State, response::IntoResponse};
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::state::AppState;

fn update() -> Result<Event, Infallible> {
    Ok(Event::default().event("update").data("update"))
}

/// GET /events: one `update` frame per half-tick or mutation.
///
/// A subscriber that falls behind gets a single frame for the missed
/// signals, since every update means "refetch" anyway.
pub async fn sse_events(State(app): State<AppState>) -> impl IntoResponse {
    let updates = BroadcastStream::new(app.event_tx.subscribe()).map(|signal| {
        if let Err(BroadcastStreamRecvError::Lagged(missed)) = signal {
            tracing::debug!(missed, "event subscriber lagged");
        }
        update()
    });
    Sse::new(updates).keep_alive(KeepAlive::default())
}
