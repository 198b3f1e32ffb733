// Background poll loop: one collection cycle per interval, result published
// as a whole for the renderer.

use crate::docker_repo::{DaemonApi, collect};
use crate::models::{ContainerRecord, PollSnapshot};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Latest cycle result shared between the poll task and the UI.
///
/// Readers get an `Arc` to an immutable snapshot; `publish` swaps in a new one,
/// so records and error are always observed from the same cycle.
pub struct PollState {
    current: ArcSwap<PollSnapshot>,
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}

impl PollState {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(PollSnapshot::default()),
        }
    }

    pub fn load(&self) -> Arc<PollSnapshot> {
        self.current.load_full()
    }

    /// Replace the published result with the outcome of a new cycle.
    pub fn publish(&self, records: Vec<ContainerRecord>, error: Option<String>) {
        self.current.rcu(|prev| PollSnapshot {
            cycle: prev.cycle + 1,
            records: records.clone(),
            error: error.clone(),
        });
    }
}

/// Daemon, shared state and shutdown for the worker.
pub struct WorkerDeps<D> {
    pub daemon: Arc<D>,
    pub state: Arc<PollState>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub poll_interval: Duration,
}

/// Run one cycle and publish its outcome.
pub async fn poll_once<D: DaemonApi>(daemon: &D, state: &PollState) {
    match collect(daemon).await {
        Ok(records) => {
            tracing::debug!(
                operation = "collect",
                containers = records.len(),
                "Cycle complete"
            );
            state.publish(records, None);
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "collect", "Cycle failed");
            state.publish(Vec::new(), Some(e.to_string()));
        }
    }
}

/// Spawns the poll loop. It stops when `shutdown_rx` fires (or its sender is
/// dropped), abandoning an in-flight cycle.
pub fn spawn<D>(deps: WorkerDeps<D>, config: WorkerConfig) -> tokio::task::JoinHandle<()>
where
    D: DaemonApi + 'static,
{
    let WorkerDeps {
        daemon,
        state,
        mut shutdown_rx,
    } = deps;

    let poll_ms = config.poll_interval.as_millis() as u64;
    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", poll_ms);

    let poll_loop = async move {
        let mut tick = interval(config.poll_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    tokio::select! {
                        _ = poll_once(daemon.as_ref(), &state) => {}
                        _ = &mut shutdown_rx => {
                            tracing::debug!("Worker shutting down mid-cycle");
                            break;
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
    };
    tokio::spawn(poll_loop.instrument(worker_span))
}
