use crate::notify::Notifier;
use pipesim_core::Simulation;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Shared application state passed to all route handlers and the clock.
///
/// The simulation sits behind a single mutex: a half-tick, and each external
/// mutation, runs entirely inside one acquisition.
#[derive(Clone)]
pub struct AppState {
    pub sim: Arc<Mutex<Simulation>>,
    pub notifier: Arc<dyn Notifier>,
    pub event_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(sim: Simulation, notifier: Arc<dyn Notifier>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            sim: Arc::new(Mutex::new(sim)),
            notifier,
            event_tx,
        }
    }

    /// Tell SSE subscribers the collections changed.
    pub fn publish(&self) {
        // No subscribers is fine.
        let _ = self.event_tx.send(());
    }
}
