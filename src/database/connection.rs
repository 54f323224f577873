//! PostgreSQL pool setup and migrations
//!
//! The console usually starts next to its database (compose, CI), so the
//! first connection is retried with a doubling delay before giving up.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Pool, Postgres};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::utils::errors::HotelConsoleError;

pub type DatabasePool = Pool<Postgres>;

const CONNECT_ATTEMPTS: u32 = 5;
const FIRST_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Pool tuning derived from [`DatabaseConfig`]
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections.min(config.max_connections),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout))
            .max_lifetime(Some(self.max_lifetime))
    }
}

/// Delay before retry number `attempt` (1-based)
fn retry_delay(attempt: u32) -> Duration {
    FIRST_RETRY_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Connect, retrying while the database comes up
pub async fn create_pool(config: &PoolConfig) -> Result<DatabasePool, HotelConsoleError> {
    let mut attempt = 1;
    let pool = loop {
        match config.options().connect(&config.url).await {
            Ok(pool) => break pool,
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                let delay = retry_delay(attempt);
                warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "Database not reachable yet, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };

    health_check(&pool).await?;
    info!(max_connections = config.max_connections, attempts = attempt, "Database pool ready");
    Ok(pool)
}

/// Apply pending migrations from `./migrations`
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), HotelConsoleError> {
    let migrator = sqlx::migrate!("./migrations");
    info!(known = migrator.iter().count(), "Applying database migrations");

    migrator.run(pool).await?;

    info!("Database schema up to date");
    Ok(())
}

/// Round-trip one connection from the pool
pub async fn health_check(pool: &DatabasePool) -> Result<(), HotelConsoleError> {
    let mut conn = pool.acquire().await?;
    conn.ping().await?;
    Ok(())
}
