// Background poll worker: drives aggregation cycles on a fixed interval.

use std::sync::Arc;
use tokio::time::{Duration, interval};

use crate::aggregator::{Aggregator, CycleOutcome};

pub struct WorkerDeps {
    pub aggregator: Arc<Aggregator>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub interval_secs: u64,
}

/// The first tick fires immediately, so a cycle runs at startup.
/// A tick that finds a cycle in flight (e.g. a manual refresh) is dropped.
pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        aggregator,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig { interval_secs } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match aggregator.trigger_cycle().await {
                        CycleOutcome::Completed(report) => {
                            tracing::debug!(
                                operation = "poll",
                                processed = report.processed.len(),
                                skipped = report.skipped.len(),
                                "poll tick done"
                            );
                        }
                        CycleOutcome::AlreadyRunning => {
                            tracing::debug!(operation = "poll", "cycle in flight; tick skipped");
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
    })
}
