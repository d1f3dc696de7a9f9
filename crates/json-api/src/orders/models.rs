//! Order Models

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use benchmark_app::domain::orders::records::{OrderItemRecord, OrderRecord};

use crate::users::models::UserResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub id: Uuid,

    /// The owner of the order
    pub user_id: Uuid,

    /// Human-facing order reference
    pub order_number: String,

    /// Sum of the item totals
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total_amount: Decimal,

    /// One of pending, processing, shipped, delivered or cancelled
    pub status: String,

    /// The date and time the order was created
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<OrderItemResponse>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_name: String,
    pub quantity: u32,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub unit_price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total_price: Decimal,

    pub created_at: String,
}

impl OrderResponse {
    /// Detail view: owner and items included.
    pub(crate) fn with_items(mut order: OrderRecord) -> Self {
        let items = std::mem::take(&mut order.items)
            .into_iter()
            .map(Into::into)
            .collect();

        Self {
            order_items: Some(items),
            ..order.into()
        }
    }
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            id: order.uuid.into(),
            user_id: order.user_uuid.into(),
            order_number: order.order_number,
            total_amount: order.total_amount.to_decimal(),
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            user: order.user.map(Into::into),
            order_items: None,
        }
    }
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            id: item.uuid.into(),
            order_id: item.order_uuid.into(),
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price.to_decimal(),
            total_price: item.total_price.to_decimal(),
            created_at: item.created_at.to_string(),
        }
    }
}
