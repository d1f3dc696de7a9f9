//! App Router

use std::{sync::Arc, time::Duration};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{
    healthcheck,
    observability::{Metrics, MetricsEndpoint, RequestLogging, label_route},
    orders,
    state::State,
    users,
};

const OPENAPI_PATH: &str = "/api-doc/openapi.json";

fn api_router() -> Router {
    Router::with_path("api/v1")
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .post(users::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(users::get::handler)
                        .put(users::update::handler)
                        .delete(users::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{id}").get(orders::get::handler)),
        )
}

/// Build the full router: middleware, API routes, metrics and API docs.
fn app_router(state: Arc<State>, metrics: Arc<Metrics>) -> Router {
    let router = Router::new()
        .hoop(label_route)
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(MetricsEndpoint::new(metrics)))
        .push(api_router());

    let doc = OpenApi::new("Benchmark API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    router
        .push(doc.into_router(OPENAPI_PATH))
        .push(SwaggerUi::new(OPENAPI_PATH).into_router("docs"))
}

/// Wrap the router so request logging also covers requests no route matches.
pub(crate) fn app_service(
    state: Arc<State>,
    metrics: Arc<Metrics>,
    slow_request_threshold: Duration,
) -> Service {
    Service::new(app_router(state, Arc::clone(&metrics)))
        .hoop(RequestLogging::new(metrics, slow_request_threshold))
}
