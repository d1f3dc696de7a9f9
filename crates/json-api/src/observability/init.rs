//! Observability lifecycle.

use std::{sync::Arc, time::Duration};

use benchmark_app::database::PoolStats;

use crate::config::ServerConfig;

use super::{Metrics, MetricsSampler, ObservabilityError, logging};

/// Runtime observability state.
#[derive(Debug)]
pub(crate) struct Observability {
    metrics: Arc<Metrics>,
    slow_request_threshold: Duration,
    sample_interval: Duration,
    sampler: Option<MetricsSampler>,
}

impl Observability {
    /// Initialize structured logging and the metrics registry.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        logging::init_subscriber(&config.logging)?;

        Ok(Self {
            metrics: Arc::new(Metrics::new()?),
            slow_request_threshold: config.observability.slow_request_threshold(),
            sample_interval: config.observability.sample_interval(),
            sampler: None,
        })
    }

    pub(crate) fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub(crate) fn slow_request_threshold(&self) -> Duration {
        self.slow_request_threshold
    }

    /// Start publishing process and pool gauges in the background.
    pub(crate) fn start_sampler<F>(&mut self, pool_stats: F)
    where
        F: Fn() -> PoolStats + Send + Sync + 'static,
    {
        self.sampler = Some(MetricsSampler::spawn(
            self.metrics(),
            pool_stats,
            self.sample_interval,
        ));
    }

    /// Stop background sampling.
    pub(crate) fn shutdown(self) {
        if let Some(sampler) = self.sampler {
            sampler.shutdown();
        }
    }
}
