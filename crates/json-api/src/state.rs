//! State

use std::sync::Arc;

use benchmark_app::{
    context::AppContext,
    domain::{orders::OrdersService, users::UsersService},
};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) users: Arc<dyn UsersService>,
    pub(crate) orders: Arc<dyn OrdersService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(users: Arc<dyn UsersService>, orders: Arc<dyn OrdersService>) -> Self {
        Self { users, orders }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: &AppContext) -> Arc<Self> {
        Arc::new(Self::new(Arc::clone(&app.users), Arc::clone(&app.orders)))
    }
}
