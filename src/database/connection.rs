use std::time::Duration;

use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Single-connection pool over the league database file.
/// A run is one batch, so one connection is enough.
pub fn create_pool(database_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));

    r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .with_context(|| format!("Failed to open league database at {}", database_path))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get().context("League database connection unavailable")
}
