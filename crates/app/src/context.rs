//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, DatabaseSettings, Db, PoolStats},
    domain::{
        orders::{OrdersService, PgOrdersService},
        users::{PgUsersService, UsersService},
    },
};

/// Failures while building the [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The pool could not reach the database.
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Services wired to one database handle.
#[derive(Clone)]
pub struct AppContext {
    /// User accounts.
    pub users: Arc<dyn UsersService>,

    /// Orders and their items.
    pub orders: Arc<dyn OrdersService>,

    db: Db,
}

impl AppContext {
    /// Build application context from database settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(settings)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool)))
    }

    /// Build the services on top of an existing handle.
    #[must_use]
    pub fn from_db(db: Db) -> Self {
        Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            db,
        }
    }

    /// Current pool figures, read without touching the store.
    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.db.pool_stats()
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.db.pool().close().await;
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}
