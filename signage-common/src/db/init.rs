//! Database initialization
//!
//! The database holds a single `assets` table. There are no migrations:
//! the table is created on first access if it does not exist, and an
//! existing table is used as-is.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Time a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Column layout of the assets table. `md5` is unused but kept so databases
/// created by older versions open without changes.
const CREATE_ASSETS_TABLE: &str = "CREATE TABLE assets (\
    asset_id TEXT, \
    name TEXT, \
    uri TEXT, \
    md5 TEXT, \
    start_date TIMESTAMP, \
    end_date TIMESTAMP, \
    duration TEXT, \
    mimetype TEXT)";

/// Open (creating if needed) the database file and make sure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .create_if_missing(true)
                .busy_timeout(BUSY_TIMEOUT),
        )
        .await?;

    if newly_created {
        info!("Created new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Create the assets table if it is missing
///
/// Idempotent. Returns `true` when the table was created by this call.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<bool> {
    let existing: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'assets'",
    )
    .fetch_optional(pool)
    .await?;

    if existing.is_some() {
        return Ok(false);
    }

    sqlx::query(CREATE_ASSETS_TABLE).execute(pool).await?;
    info!("Initiated database: created assets table");
    Ok(true)
}
