//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{OrderItemUuid, OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        pagination::Page,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, page: Page) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut conn = self.db.acquire().await?;

        let orders = self.orders_repository.list_orders(&mut conn, page).await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_snapshot().await?;

        let mut record = self.orders_repository.get_order(&mut tx, order).await?;

        let items = self
            .items_repository
            .list_order_items(&mut tx, order)
            .await?;

        tx.commit().await?;

        record.items = items;

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            user_uuid = %order.user_uuid,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty,
            item_count = order.items.len()
        ),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        let draft = order.validate()?;
        let uuid = OrderUuid::new();

        let span = Span::current();

        span.record("order_uuid", tracing::field::display(uuid));
        span.record("order_number", draft.order_number.as_str());

        let mut tx = self.db.begin().await?;

        let created = self
            .orders_repository
            .create_order(&mut tx, uuid, &draft)
            .await?;

        for line in &draft.lines {
            self.items_repository
                .create_order_item(&mut tx, OrderItemUuid::new(), uuid, line)
                .await?;
        }

        tx.commit().await?;

        info!(
            order_uuid = %created.uuid,
            total_amount = %created.total_amount,
            "created order"
        );

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve a page of orders with their owners, newest first. Items are not loaded.
    async fn list_orders(&self, page: Page) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve one order with its owner and items from a single snapshot.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Price the order and write it together with its items, or write nothing.
    ///
    /// The returned record carries neither owner nor items.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;
}
