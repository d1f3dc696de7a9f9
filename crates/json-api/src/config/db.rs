//! Database Config

use std::time::Duration;

use clap::Args;

use benchmark_app::database::DatabaseSettings;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` host
    #[arg(long, env = "DB_HOST", default_value = "postgres")]
    pub db_host: String,

    /// `PostgreSQL` port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// `PostgreSQL` user
    #[arg(long, env = "DB_USER", default_value = "benchmark_user")]
    pub db_user: String,

    /// `PostgreSQL` password
    #[arg(
        long,
        env = "DB_PASSWORD",
        default_value = "benchmark_pass",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub db_password: String,

    /// `PostgreSQL` database name
    #[arg(long, env = "DB_NAME", default_value = "benchmark")]
    pub db_name: String,

    /// Upper bound on open pool connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 100)]
    pub db_max_connections: u32,

    /// Idle connections kept warm; sets the pool's min_connections, not an idle cap
    #[arg(long, env = "DB_MAX_IDLE_CONNECTIONS", default_value_t = 10)]
    pub db_max_idle_connections: u32,

    /// Maximum connection lifetime in seconds
    #[arg(long, env = "DB_CONNECTION_MAX_LIFETIME", default_value_t = 300)]
    pub db_connection_max_lifetime: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn settings(&self) -> DatabaseSettings {
        DatabaseSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.db_max_connections,
            min_connections: self.db_max_idle_connections,
            max_lifetime: Duration::from_secs(self.db_connection_max_lifetime),
        }
    }
}
