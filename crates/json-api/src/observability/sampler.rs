//! Periodic runtime and connection pool gauges.

use std::{sync::Arc, time::Duration};

use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

use benchmark_app::database::PoolStats;

use super::Metrics;

/// Background task refreshing gauges that are not driven by requests.
///
/// Pool figures come from the pool handle in memory; sampling never queries the store.
#[derive(Debug)]
pub(crate) struct MetricsSampler {
    handle: JoinHandle<()>,
}

impl MetricsSampler {
    pub(crate) fn spawn<F>(metrics: Arc<Metrics>, pool_stats: F, every: Duration) -> Self
    where
        F: Fn() -> PoolStats + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                sample(&metrics, pool_stats());
            }
        });

        Self { handle }
    }

    pub(crate) fn shutdown(self) {
        self.handle.abort();
    }
}

fn sample(metrics: &Metrics, stats: PoolStats) {
    let runtime = Handle::current().metrics();

    metrics.record_runtime(runtime.num_alive_tasks(), runtime.num_workers());
    metrics.record_pool(stats);

    debug!(
        pool_size = stats.size,
        pool_idle = stats.idle,
        "sampled runtime and pool gauges"
    );
}
