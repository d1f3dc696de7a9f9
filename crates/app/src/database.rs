//! Database connection management

use std::time::Duration;

use sqlx::{
    PgConnection, PgPool, Postgres, Transaction,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
    query,
};

/// SQL used to pin a read-only transaction to a single snapshot.
pub const SET_SNAPSHOT_SQL: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Connection and pool sizing settings for the `PostgreSQL` store.
#[derive(Clone)]
pub struct DatabaseSettings {
    /// Server host name.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Login role.
    pub user: String,

    /// Login password, never printed.
    pub password: String,

    /// Database name.
    pub database: String,

    /// Upper bound on open connections.
    pub max_connections: u32,

    /// Connections kept open while idle.
    pub min_connections: u32,

    /// Age after which a connection is closed and replaced.
    pub max_lifetime: Duration,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}

impl DatabaseSettings {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .max_lifetime(self.max_lifetime)
    }
}

/// Point-in-time view of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Connections currently open, idle or in use.
    pub size: u32,

    /// Open connections not checked out.
    pub idle: u32,

    /// Upper bound on open connections.
    pub max_open: u32,
}

impl PoolStats {
    /// Connections currently checked out by a task.
    #[must_use]
    pub fn active(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }
}

/// Shared handle to the connection pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Wrap an established pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check out a pooled connection for single-statement work.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Begin a read-write transaction.
    ///
    /// The transaction rolls back when dropped without a commit.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a read-only transaction where every statement sees the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting its isolation fails.
    pub async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        set_snapshot(&mut tx).await?;

        Ok(tx)
    }

    /// Read the pool's current size without touching the store.
    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            max_open: self.pool.options().get_max_connections(),
        }
    }
}

async fn set_snapshot(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    query(SET_SNAPSHOT_SQL).execute(conn).await?;

    Ok(())
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    settings
        .pool_options()
        .connect_with(settings.connect_options())
        .await
}
