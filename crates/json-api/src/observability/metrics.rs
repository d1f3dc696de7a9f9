//! Prometheus metrics registry and exposition endpoint.

use std::sync::Arc;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use salvo::{
    Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

use benchmark_app::database::PoolStats;

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Every metric the service exposes, registered on one registry.
#[derive(Debug)]
pub(crate) struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    runtime_alive_tasks: IntGauge,
    runtime_workers: IntGauge,
    database_connections: IntGaugeVec,
}

impl Metrics {
    pub(crate) fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total HTTP requests partitioned by method, route and status code.",
            ),
            &["method", "route", "status_code"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method, route and status code.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route", "status_code"],
        )?;

        let requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )?;

        let runtime_alive_tasks = IntGauge::new(
            "runtime_alive_tasks",
            "Tasks currently alive on the async runtime.",
        )?;

        let runtime_workers = IntGauge::new(
            "runtime_workers",
            "Worker threads driving the async runtime.",
        )?;

        let database_connections = IntGaugeVec::new(
            Opts::new(
                "database_connections",
                "Database pool connections partitioned by state.",
            ),
            &["state"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(requests_in_flight.clone()))?;
        registry.register(Box::new(runtime_alive_tasks.clone()))?;
        registry.register(Box::new(runtime_workers.clone()))?;
        registry.register(Box::new(database_connections.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
            runtime_alive_tasks,
            runtime_workers,
            database_connections,
        })
    }

    /// Count a request as in flight until the guard drops.
    pub(crate) fn track_in_flight(&self) -> InFlightRequestGuard {
        self.requests_in_flight.inc();

        InFlightRequestGuard {
            gauge: self.requests_in_flight.clone(),
        }
    }

    pub(crate) fn observe_request(
        &self,
        method: &str,
        route: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        let status_code = status_code.to_string();
        let labels = [method, route, status_code.as_str()];

        self.requests_total.with_label_values(&labels).inc();

        self.request_duration_seconds
            .with_label_values(&labels)
            .observe(duration_seconds);
    }

    pub(crate) fn record_runtime(&self, alive_tasks: usize, workers: usize) {
        self.runtime_alive_tasks.set(saturating_i64(alive_tasks));
        self.runtime_workers.set(saturating_i64(workers));
    }

    pub(crate) fn record_pool(&self, stats: PoolStats) {
        for (state, value) in [
            ("active", stats.active()),
            ("idle", stats.idle),
            ("max_open", stats.max_open),
        ] {
            self.database_connections
                .with_label_values(&[state])
                .set(i64::from(value));
        }
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>, prometheus::Error> {
        let mut encoded = Vec::new();

        TextEncoder::new().encode(&self.registry.gather(), &mut encoded)?;

        Ok(encoded)
    }
}

fn saturating_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[derive(Debug)]
pub(crate) struct InFlightRequestGuard {
    gauge: IntGauge,
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

/// Serves the registry in the Prometheus text format.
#[derive(Debug, Clone)]
pub(crate) struct MetricsEndpoint {
    metrics: Arc<Metrics>,
}

impl MetricsEndpoint {
    pub(crate) fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

#[handler]
impl MetricsEndpoint {
    async fn handle(&self, res: &mut Response) {
        let encoded = match self.metrics.encode() {
            Ok(encoded) => encoded,
            Err(source) => {
                error!("failed to encode metrics response: {source}");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

                return;
            }
        };

        res.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static(prometheus::TEXT_FORMAT),
        );
        res.render(String::from_utf8_lossy(&encoded).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn in_flight_guard_decrements_on_drop() -> TestResult {
        let metrics = Metrics::new()?;

        let guard = metrics.track_in_flight();
        assert_eq!(metrics.requests_in_flight.get(), 1);

        drop(guard);
        assert_eq!(metrics.requests_in_flight.get(), 0);

        Ok(())
    }

    #[test]
    fn pool_gauges_split_by_state() -> TestResult {
        let metrics = Metrics::new()?;

        metrics.record_pool(PoolStats {
            size: 6,
            idle: 2,
            max_open: 100,
        });

        let value = |state: &str| metrics.database_connections.with_label_values(&[state]).get();

        assert_eq!(value("active"), 4);
        assert_eq!(value("idle"), 2);
        assert_eq!(value("max_open"), 100);

        Ok(())
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_every_family() -> TestResult {
        let metrics = Arc::new(Metrics::new()?);

        metrics.observe_request("GET", "/api/v1/users", 200, 0.042);
        metrics.observe_request("POST", "/api/v1/orders", 500, 0.123);
        metrics.record_runtime(12, 4);
        metrics.record_pool(PoolStats::default());

        let service = Service::new(
            Router::new().push(Router::with_path("metrics").get(MetricsEndpoint::new(metrics))),
        );

        let body = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        for family in [
            "http_requests_total",
            "http_request_duration_seconds",
            "http_requests_in_flight",
            "runtime_alive_tasks",
            "runtime_workers",
            "database_connections",
        ] {
            assert!(body.contains(family), "expected {family} in exposition");
        }

        assert!(
            body.contains(
                r#"http_requests_total{method="POST",route="/api/v1/orders",status_code="500"} 1"#
            ),
            "expected labelled counter in exposition"
        );
        assert!(body.contains(r#"database_connections{state="max_open"} 0"#));

        Ok(())
    }
}
