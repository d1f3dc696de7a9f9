//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgConnection, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::{
    money::{cents_to_bind, try_get_cents},
    orders::{
        data::OrderDraft,
        records::{OrderRecord, OrderStatus, OrderUuid},
    },
    pagination::Page,
    users::records::{UserRecord, UserUuid},
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        conn: &mut PgConnection,
        order: OrderUuid,
        draft: &OrderDraft,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(draft.user_uuid.into_uuid())
            .bind(&draft.order_number)
            .bind(cents_to_bind(draft.total_amount)?)
            .bind(draft.status.as_str())
            .fetch_one(conn)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        conn: &mut PgConnection,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderWithUser>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(conn)
            .await
            .map(|row| row.0)
    }

    pub(crate) async fn list_orders(
        &self,
        conn: &mut PgConnection,
        page: Page,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderWithUser>(LIST_ORDERS_SQL)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(conn)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            order_number: row.try_get("order_number")?,
            total_amount: try_get_cents(row, "total_amount")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            user: None,
            items: Vec::new(),
        })
    }
}

/// An order row carrying its owner's `user_*` columns.
struct OrderWithUser(OrderRecord);

impl<'r> FromRow<'r, PgRow> for OrderWithUser {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let mut order = OrderRecord::from_row(row)?;

        order.user = try_get_joined_user(row, order.user_uuid)?;

        Ok(Self(order))
    }
}

fn try_get_joined_user(row: &PgRow, uuid: UserUuid) -> sqlx::Result<Option<UserRecord>> {
    let Some(username) = row.try_get::<Option<String>, _>("user_username")? else {
        return Ok(None);
    };

    Ok(Some(UserRecord {
        uuid,
        username,
        email: row.try_get("user_email")?,
        full_name: row.try_get("user_full_name")?,
        created_at: row
            .try_get::<SqlxTimestamp, _>("user_created_at")?
            .to_jiff(),
        updated_at: row
            .try_get::<SqlxTimestamp, _>("user_updated_at")?
            .to_jiff(),
    }))
}
