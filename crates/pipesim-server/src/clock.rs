//! Real-time driver for the simulation.

use crate::notify;
use crate::state::AppState;
use chrono::Utc;
use pipesim_core::deployment::DeploymentNotice;
use std::time::Duration;
use tokio::sync::watch;

/// One cycle: half-tick, wait `interval`, half-tick plus gated completion.
///
/// The lock is held only for the synchronous work, never across the sleep.
/// A completion notification is dispatched after the lock is released.
pub async fn run_cycle(state: &AppState, interval: Duration) -> Option<DeploymentNotice> {
    {
        let mut sim = state.sim.lock().await;
        sim.half_tick(Utc::now());
    }
    state.publish();

    tokio::time::sleep(interval).await;

    let notice = {
        let mut sim = state.sim.lock().await;
        sim.half_tick(Utc::now());
        sim.complete_if_clear()
    };
    state.publish();

    if let Some(notice) = &notice {
        notify::dispatch(state.notifier.clone(), notice.clone());
    }
    notice
}

/// Run cycles every `interval` until `shutdown` flips or its sender drops.
pub async fn run(state: AppState, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    tracing::info!(interval_ms = interval.as_millis() as u64, "simulation clock started");
    loop {
        tokio::select! {
            _ = async {
                run_cycle(&state, interval).await;
                tokio::time::sleep(interval).await;
            } => {}
            _ = shutdown.changed() => break,
        }
    }
    tracing::info!("simulation clock stopped");
}
