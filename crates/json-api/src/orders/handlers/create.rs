//! Create Order Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use benchmark_app::domain::orders::data::{NewOrder, NewOrderItem};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// The user placing the order
    pub user_id: Uuid,

    /// At least one item
    #[serde(default)]
    pub order_items: Vec<CreateOrderItemRequest>,
}

/// Create Order Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderItemRequest {
    pub product_name: String,

    /// At least 1
    pub quantity: i64,

    /// Price per unit with at most two decimal places, as a number or a string
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[salvo(schema(value_type = f64))]
    pub unit_price: Decimal,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            user_uuid: request.user_id.into(),
            items: request
                .order_items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        }
    }
}

/// Create Order Handler
///
/// Prices the items and stores the order atomically.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        item_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(request.user_id));
    span.record("item_count", request.order_items.len());

    let order = state
        .orders
        .create_order(request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/v1/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
