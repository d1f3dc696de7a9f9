//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use benchmark_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Invalid(errors) => StatusError::bad_request()
            .brief("Invalid order payload")
            .detail(errors.to_string()),
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("User does not exist")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
