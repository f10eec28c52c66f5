/// PostgreSQL connection pool
///
/// Both binaries (API server and worker) build their pool through
/// [`create_pool`] so connection limits and timeouts are configured in one
/// place. The pool is verified with a round-trip query before it is handed
/// back; a bad `DATABASE_URL` fails at startup, not on the first request.
///
/// # Example
///
/// ```no_run
/// use opencampus_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig {
///     url: "postgresql://opencampus@localhost/opencampus".to_string(),
///     ..Default::default()
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Connection pool settings
///
/// Timeouts are plain seconds so they can be read straight from environment
/// variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// Idle connections kept warm
    pub min_connections: u32,

    /// How long to wait for a free connection (seconds)
    pub acquire_timeout_seconds: u64,

    /// Idle time before a connection is dropped (seconds)
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

/// Opens a connection pool and verifies it with a round-trip query
///
/// # Errors
///
/// Returns an error if the URL is invalid, the server is unreachable, or
/// the verification query fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    info!(
        max_connections = config.max_connections,
        "Database pool ready"
    );

    Ok(pool)
}

/// Closes the pool, waiting for in-flight connections to finish
pub async fn close_pool(pool: PgPool) {
    pool.close().await;
    info!("Database pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_seconds, 30);
    }
}
