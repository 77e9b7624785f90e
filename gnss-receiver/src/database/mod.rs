use crate::repository::StoreError;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

/// Opens (creating if needed) the SQLite database and applies migrations.
///
/// The pool is limited to one connection so `sqlite::memory:` databases
/// behave as a single store.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StoreError> {
    let open_failed = |reason: String| StoreError::OpenFailed {
        url: database_url.to_string(),
        reason,
    };

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| open_failed(e.to_string()))?
        .create_if_missing(true);

    // Create data directory if it doesn't exist
    if let Some(dir) = options.get_filename().parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| open_failed(e.to_string()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| open_failed(e.to_string()))?;

    log::info!("Opened database {} successfully.", database_url);
    Ok(pool)
}
