//! # Local Cache Store
//!
//! Embedded SQLite store backing offline operation: read-only mirrors of
//! reference data (users, members, paid-period history) plus the durable
//! queue of membership payments recorded while the primary store was
//! unreachable.
//!
//! ## Key Components
//!
//! - `schema.rs` - table definitions, created idempotently on open
//! - `mirrors.rs` - mirror replacement and offline lookups
//! - `queue.rs` - pending-payment queue operations
//!
//! The cache file is owned exclusively by this application; the interactive
//! path and the background drain both touch it, so every operation is one
//! short transaction and SQLite's own locking does the rest. Reads of absent
//! rows return empty results, never errors; a storage failure maps to
//! [`SyncError::LocalStore`](crate::error::SyncError::LocalStore) and is
//! fatal for that operation - there is nothing beneath the cache to fall
//! back to.

mod mirrors;
mod queue;
mod schema;

pub use queue::QueuedReceipt;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::{local_store_error, Result};

/// Handle to the embedded cache database
#[derive(Debug, Clone)]
pub struct LocalCache {
    pool: SqlitePool,
}

impl LocalCache {
    /// Open (or create) the cache file and ensure the schema exists.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| crate::error::SyncError::local(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(local_store_error)?;

        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await
            .map_err(local_store_error)?;
        sqlx::query("PRAGMA foreign_keys=ON")
            .execute(&pool)
            .await
            .map_err(local_store_error)?;

        let cache = Self { pool };
        cache.ensure_schema().await?;
        Ok(cache)
    }

    /// Open an in-memory cache (tests and dry runs).
    ///
    /// A single pooled connection with no idle reaping, since an in-memory
    /// SQLite database lives and dies with its connection.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(local_store_error)?;

        let cache = Self { pool };
        cache.ensure_schema().await?;
        Ok(cache)
    }

    /// Create every mirror and queue table if absent.
    ///
    /// Idempotent; safe to call on every startup and before every write.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in schema::CREATE_TABLES {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(local_store_error)?;
        }
        Ok(())
    }

    /// Connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
