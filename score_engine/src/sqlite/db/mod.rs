//! # SQLite Database methods
//!
//! Low-level SQLite interactions live here as free functions that accept a `&mut SqliteConnection`. Callers decide
//! whether that connection comes straight from the pool or from an open transaction.
use std::{env, fs, str::FromStr};

use log::{info, warn};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod matches;

const SQLITE_DB_URL: &str = "sqlite://data/scores.db";

/// The database URL from `SCORE_DATABASE_URL`, falling back to a file in `./data`.
pub fn db_url() -> String {
    let result = env::var("SCORE_DATABASE_URL").unwrap_or_else(|_| {
        warn!("🗃️ SCORE_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

/// Opens a connection pool, creating the database file if it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let db_file = options.clone().get_filename().to_path_buf();
    if let Some(dir) = db_file.parent().filter(|d| !d.as_os_str().is_empty() && !d.exists()) {
        info!("🗃️ Creating database directory {}", dir.display());
        fs::create_dir_all(dir)?;
    }
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
