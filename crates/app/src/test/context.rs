//! Test context for service-level integration tests.

use crate::{
    database::Db,
    domain::{orders::PgOrdersService, users::PgUsersService},
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub users: PgUsersService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            users: PgUsersService::new(db.clone()),
            orders: PgOrdersService::new(db),
            db: test_db,
        }
    }
}
