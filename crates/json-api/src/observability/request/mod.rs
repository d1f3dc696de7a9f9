//! Request-level logging, request IDs and HTTP metrics.

mod request_ids;
mod spans;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};

use super::Metrics;

const ROUTE_DEPOT_KEY: &str = "route_label";

const METRICS_PATH: &str = "/metrics";

/// Remember the matched route template for [`RequestLogging`].
///
/// Runs only for requests that matched a route; the rest are labelled `unknown`.
#[handler]
pub(crate) async fn label_route(req: &mut Request, depot: &mut Depot) {
    let label = spans::route_label(
        req.uri().path(),
        req.params()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );

    depot.insert(ROUTE_DEPOT_KEY, label);
}

/// Wraps every request in a span, records its metrics and logs the outcome.
///
/// Installed on the `Service` so that requests matching no route are seen too.
#[derive(Debug, Clone)]
pub(crate) struct RequestLogging {
    metrics: Arc<Metrics>,
    slow_request_threshold: Duration,
}

impl RequestLogging {
    pub(crate) fn new(metrics: Arc<Metrics>, slow_request_threshold: Duration) -> Self {
        Self {
            metrics,
            slow_request_threshold,
        }
    }
}

#[handler]
impl RequestLogging {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if req.uri().path() == METRICS_PATH {
            ctrl.call_next(req, depot, res).await;
            return;
        }

        let started = Instant::now();

        let request_id =
            request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

        request_ids::set_request_id_header(res, &request_id);

        let method = req.method().to_string();
        let path = req.uri().path().to_owned();
        let remote_addr = req.remote_addr().to_string();
        let _in_flight_request = self.metrics.track_in_flight();

        let span = tracing::info_span!(
            parent: None,
            "http.request",
            request_id = %request_id,
            method = %method,
            path = %path,
            route = tracing::field::Empty,
            remote_addr = %remote_addr,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        );

        ctrl.call_next(req, depot, res)
            .instrument(span.clone())
            .await;

        let duration = started.elapsed();
        let matched_route = depot.get::<String>(ROUTE_DEPOT_KEY).ok().cloned();

        // Unmatched requests may leave the status unset until the service answers 404.
        let status = match (&matched_route, res.status_code) {
            (None, None) => StatusCode::NOT_FOUND,
            (_, status_code) => request_ids::response_status_or_ok(status_code),
        };
        let route = matched_route.unwrap_or_else(|| spans::UNMATCHED_ROUTE.to_owned());
        let duration_ms = duration.as_millis();
        let threshold_ms = self.slow_request_threshold.as_millis();

        self.metrics
            .observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

        span.record("route", route.as_str());
        span.record("status", status.as_u16());
        span.record("duration_ms", duration_ms);

        span.in_scope(|| {
            info!(status = status.as_u16(), duration_ms, "request.completed");

            if status.is_server_error() {
                error!(
                    status = status.as_u16(),
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    "server error response"
                );
            } else if status.is_client_error() {
                warn!(
                    status = status.as_u16(),
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    "client error response"
                );
            }

            if duration_ms > threshold_ms {
                warn!(
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    duration_ms,
                    threshold_ms,
                    "slow request detected"
                );
            }
        });
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

    #[handler]
    async fn teapot(res: &mut Response) {
        res.status_code(StatusCode::IM_A_TEAPOT);
    }

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn make_service(metrics: Arc<Metrics>) -> Service {
        Service::new(
            Router::new()
                .hoop(label_route)
                .push(Router::with_path("items/{id}").get(teapot))
                .push(Router::with_path("metrics").get(ok)),
        )
        .hoop(RequestLogging::new(metrics, Duration::from_secs(1)))
    }

    fn request_series(body: &str) -> Vec<&str> {
        body.lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .collect()
    }

    #[tokio::test]
    async fn echoes_incoming_request_id() -> TestResult {
        let res = TestClient::get("http://example.com/items/1")
            .add_header("x-request-id", "abc-123", true)
            .send(&make_service(Arc::new(Metrics::new()?)))
            .await;

        let request_id = res.headers().get("x-request-id").and_then(|v| v.to_str().ok());

        assert_eq!(request_id, Some("abc-123"));

        Ok(())
    }

    #[tokio::test]
    async fn generates_request_id_when_absent() -> TestResult {
        let res = TestClient::get("http://example.com/items/1")
            .send(&make_service(Arc::new(Metrics::new()?)))
            .await;

        let request_id = res
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(uuid::Uuid::parse_str);

        assert!(
            matches!(request_id, Some(Ok(_))),
            "expected a generated UUID, got {request_id:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn records_request_under_route_template() -> TestResult {
        let metrics = Arc::new(Metrics::new()?);
        let id = uuid::Uuid::now_v7();

        TestClient::get(format!("http://example.com/items/{id}"))
            .send(&make_service(Arc::clone(&metrics)))
            .await;

        let body = String::from_utf8(metrics.encode()?)?;

        assert!(
            body.contains(
                r#"http_requests_total{method="GET",route="/items/{id}",status_code="418"} 1"#
            ),
            "{body}"
        );
        assert!(body.contains("http_requests_in_flight 0"), "{body}");

        Ok(())
    }

    #[tokio::test]
    async fn distinct_parameter_values_share_one_series() -> TestResult {
        let metrics = Arc::new(Metrics::new()?);
        let service = make_service(Arc::clone(&metrics));

        for i in 0..50 {
            TestClient::get(format!("http://example.com/items/bad-{i}"))
                .send(&service)
                .await;
        }

        let body = String::from_utf8(metrics.encode()?)?;

        assert_eq!(
            request_series(&body),
            [r#"http_requests_total{method="GET",route="/items/{id}",status_code="418"} 50"#]
        );

        Ok(())
    }

    #[tokio::test]
    async fn unmatched_requests_are_recorded_as_unknown() -> TestResult {
        let metrics = Arc::new(Metrics::new()?);
        let service = make_service(Arc::clone(&metrics));

        for i in 0..50 {
            let res = TestClient::get(format!("http://example.com/scan/{i}"))
                .send(&service)
                .await;

            assert!(res.headers().get("x-request-id").is_some());
        }

        let body = String::from_utf8(metrics.encode()?)?;

        assert_eq!(
            request_series(&body),
            [r#"http_requests_total{method="GET",route="unknown",status_code="404"} 50"#]
        );

        Ok(())
    }

    #[tokio::test]
    async fn metrics_scrapes_are_not_recorded() -> TestResult {
        let metrics = Arc::new(Metrics::new()?);

        let mut res = TestClient::get("http://example.com/metrics")
            .send(&make_service(Arc::clone(&metrics)))
            .await;

        assert_eq!(res.take_string().await?, "ok");
        assert!(res.headers().get("x-request-id").is_none());

        let body = String::from_utf8(metrics.encode()?)?;

        assert!(request_series(&body).is_empty(), "{body}");

        Ok(())
    }
}
