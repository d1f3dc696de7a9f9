//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use benchmark_app::domain::{
    money::Cents,
    orders::{
        MockOrdersService,
        records::{OrderRecord, OrderStatus, OrderUuid},
    },
    users::{
        MockUsersService,
        records::{UserRecord, UserUuid},
    },
};

use crate::state::State;

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_list_users().never();
    users.expect_get_user().never();
    users.expect_create_user().never();
    users.expect_update_user().never();
    users.expect_delete_user().never();

    users
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_list_orders().never();
    orders.expect_get_order().never();
    orders.expect_create_order().never();

    orders
}

pub(crate) fn users_service(users: MockUsersService, route: Router) -> Service {
    let state = Arc::new(State::new(Arc::new(users), Arc::new(strict_orders_mock())));

    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    let state = Arc::new(State::new(Arc::new(strict_users_mock()), Arc::new(orders)));

    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn make_user(uuid: UserUuid) -> UserRecord {
    UserRecord {
        uuid,
        username: "user".to_string(),
        email: "user@example.com".to_string(),
        full_name: "Test User".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, user: UserUuid, total_amount: Cents) -> OrderRecord {
    OrderRecord {
        uuid,
        user_uuid: user,
        order_number: "ORD-0000abcd".to_string(),
        total_amount,
        status: OrderStatus::Pending,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        user: None,
        items: Vec::new(),
    }
}

pub(crate) fn storage_error() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}
