//! Versioned post storage on SQLite.
//!
//! Posts are an append-only log of immutable revisions plus a per-post
//! pointer to the current revision. The pool is created once by the host
//! and passed by reference into the repositories.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;

use config::{DbConfig, DbLocation};
use error::{StoreError, StoreResult};

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool for the configured database.
///
/// An in-memory database lives only as long as its connection, so the pool
/// is pinned to one connection that is never reaped.
pub async fn create_pool(config: &DbConfig) -> StoreResult<DbPool> {
    match &config.location {
        DbLocation::InMemory => {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(StoreError::StorageConnection)?
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .map_err(StoreError::StorageConnection)
        }
        DbLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::StorageConnection(sqlx::Error::Io(e)))?;
            }
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await
                .map_err(StoreError::StorageConnection)
        }
    }
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> StoreResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StoreError::StorageConnection)?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
