//! Bounded, deduplicating history of processed URLs backed by SQLite.
//!
//! The store keeps at most `capacity` URLs. Every `remember` runs the
//! insert and the eviction of entries beyond capacity in one transaction,
//! so the bound holds for every reader once the call returns, and the
//! `UNIQUE` constraint makes concurrent `remember` calls for the same URL
//! report `was_new` exactly once. Concurrency control is left entirely to
//! SQLite's own locking (WAL journal plus a busy timeout).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{debug, info};

use crate::errors::{PageTextError, PageTextResult};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    added_at INTEGER NOT NULL
);
"#;

/// One remembered URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub url: String,
    pub added_at: DateTime<Utc>,
}

/// Persistent, capacity-bounded URL history.
///
/// Cheap to clone; clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    pool: SqlitePool,
    capacity: usize,
    db_path: PathBuf,
}

impl HistoryStore {
    /// Open the history database at `db_path`, creating it if missing.
    pub async fn open(db_path: &Path, capacity: usize) -> PageTextResult<Self> {
        if capacity == 0 {
            return Err(PageTextError::Validation(
                "history capacity must be at least 1".to_string(),
            ));
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PageTextError::Storage(sqlx::Error::Io(e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await?;

        let store = Self {
            pool,
            capacity,
            db_path: db_path.to_path_buf(),
        };

        // A database written with a larger capacity is cut down before use
        let mut tx = store.pool.begin().await?;
        let evicted = evict_beyond(&mut *tx, store.limit()).await?;
        tx.commit().await?;
        if evicted > 0 {
            info!("Trimmed {evicted} history entries beyond capacity {capacity}");
        }

        info!(
            "Opened URL history at {} ({} of {} slots used)",
            db_path.display(),
            store.len().await?,
            capacity
        );

        Ok(store)
    }

    /// Up to `capacity` URLs, most recently added first.
    pub async fn recent_urls(&self) -> PageTextResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT url FROM urls ORDER BY id DESC LIMIT ?")
            .bind(self.limit())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(url,)| url).collect())
    }

    /// Same as [`recent_urls`](Self::recent_urls) but with insertion timestamps.
    pub async fn entries(&self) -> PageTextResult<Vec<HistoryEntry>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT url, added_at FROM urls ORDER BY id DESC LIMIT ?")
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(url, added_at)| -> PageTextResult<HistoryEntry> {
                let added_at = DateTime::from_timestamp_millis(added_at).ok_or_else(|| {
                    sqlx::Error::Decode(
                        format!("added_at {added_at} out of range for '{url}'").into(),
                    )
                })?;
                Ok(HistoryEntry { url, added_at })
            })
            .collect()
    }

    /// Whether `url` is currently remembered.
    pub async fn contains(&self, url: &str) -> PageTextResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM urls WHERE url = ?")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Remember `url`, returning whether it was new.
    ///
    /// A known URL is a no-op. A new URL is inserted and everything older
    /// than the newest `capacity` entries is deleted in the same
    /// transaction; on any failure the transaction rolls back and the
    /// history is unchanged.
    pub async fn remember(&self, url: &str) -> PageTextResult<bool> {
        let added_at = Utc::now().timestamp_millis();

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT OR IGNORE INTO urls (url, added_at) VALUES (?, ?)")
            .bind(url)
            .bind(added_at)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            == 1;

        if inserted {
            let evicted = evict_beyond(&mut *tx, self.limit()).await?;
            if evicted > 0 {
                debug!(
                    "Evicted {} old history entries, keeping at most {}",
                    evicted, self.capacity
                );
            }
        }

        tx.commit().await?;

        Ok(inserted)
    }

    /// Number of remembered URLs.
    pub async fn len(&self) -> PageTextResult<usize> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM urls")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(row.0).unwrap_or_default())
    }

    pub async fn is_empty(&self) -> PageTextResult<bool> {
        Ok(self.len().await? == 0)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn limit(&self) -> i64 {
        i64::try_from(self.capacity).unwrap_or(i64::MAX)
    }
}

/// Delete everything older than the newest `limit` entries
async fn evict_beyond(conn: &mut SqliteConnection, limit: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM urls
        WHERE id NOT IN (
            SELECT id FROM urls ORDER BY id DESC LIMIT ?
        )
        "#,
    )
    .bind(limit)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
