//! Observability setup and request tracing middleware.

use thiserror::Error;

mod init;
mod logging;
mod metrics;
mod request;
mod sampler;

pub(crate) use init::Observability;
pub(crate) use metrics::{Metrics, MetricsEndpoint};
pub(crate) use request::{RequestLogging, label_route};
pub(crate) use sampler::MetricsSampler;

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),

    /// Failed to build or register a metric.
    #[error("failed to build metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
}
