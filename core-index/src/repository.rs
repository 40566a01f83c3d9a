//! # Checksum Index Repository
//!
//! Persistence for checksum records.
//!
//! ## Overview
//!
//! The index maps `(checksum, group)` to the previously materialized file.
//! It is how the system recognizes "this remote item is a file we already
//! have" after the item's name, URL, or grouping changed. Lookups scoped to
//! the wrong group return nothing: identical content in two groups is two
//! independent files.

use crate::{ChecksumRecord, GroupId, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Repository Trait
// ============================================================================

/// Repository trait for checksum-record persistence.
///
/// All operations return `Err` only when the backing store itself fails;
/// a missing record is `Ok(None)`. Callers must treat `Err` as fatal for
/// the run.
#[async_trait]
pub trait MediaIndex: Send + Sync {
    /// Find the record for `(checksum, group)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn lookup(&self, checksum: &str, group: GroupId) -> Result<Option<ChecksumRecord>>;

    /// Find the record whose last known locator is `locator`, scoped to `group`.
    ///
    /// Lets a run recognize an already-listed URL before any transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn lookup_by_locator(
        &self,
        locator: &str,
        group: GroupId,
    ) -> Result<Option<ChecksumRecord>>;

    /// Insert or overwrite the record for `(checksum, group)`.
    ///
    /// Overwriting updates `local_path` and `source_locator` in place; this
    /// is how a rename is absorbed without a new download. The upsert is
    /// atomic per key: concurrent callers resolve to last-writer-wins and
    /// readers never observe a torn write.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn record(
        &self,
        checksum: &str,
        group: GroupId,
        local_path: &Path,
        locator: &str,
    ) -> Result<()>;

    /// Remove the record for `(checksum, group)`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn forget(&self, checksum: &str, group: GroupId) -> Result<()>;

    /// Remove every record belonging to `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn purge_group(&self, group: GroupId) -> Result<()>;

    /// Number of records for `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count(&self, group: GroupId) -> Result<u64>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of [`MediaIndex`].
pub struct SqliteMediaIndex {
    pool: SqlitePool,
}

impl SqliteMediaIndex {
    /// Create a new SQLite media index over an initialized pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaIndex for SqliteMediaIndex {
    async fn lookup(&self, checksum: &str, group: GroupId) -> Result<Option<ChecksumRecord>> {
        let record = sqlx::query_as::<_, ChecksumRecord>(
            r#"
            SELECT checksum, group_id, local_path, source_locator, recorded_at, updated_at
            FROM media_index
            WHERE checksum = ? AND group_id = ?
            "#,
        )
        .bind(checksum)
        .bind(group)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn lookup_by_locator(
        &self,
        locator: &str,
        group: GroupId,
    ) -> Result<Option<ChecksumRecord>> {
        let record = sqlx::query_as::<_, ChecksumRecord>(
            r#"
            SELECT checksum, group_id, local_path, source_locator, recorded_at, updated_at
            FROM media_index
            WHERE group_id = ? AND source_locator = ?
            "#,
        )
        .bind(group)
        .bind(locator)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn record(
        &self,
        checksum: &str,
        group: GroupId,
        local_path: &Path,
        locator: &str,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        // Single-statement upsert keeps the write atomic per key.
        sqlx::query(
            r#"
            INSERT INTO media_index (
                checksum, group_id, local_path, source_locator, recorded_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (checksum, group_id) DO UPDATE SET
                local_path = excluded.local_path,
                source_locator = excluded.source_locator,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(checksum)
        .bind(group)
        .bind(local_path.to_string_lossy().into_owned())
        .bind(locator)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(%group, checksum, path = %local_path.display(), "Recorded checksum");
        Ok(())
    }

    async fn forget(&self, checksum: &str, group: GroupId) -> Result<()> {
        sqlx::query("DELETE FROM media_index WHERE checksum = ? AND group_id = ?")
            .bind(checksum)
            .bind(group)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_group(&self, group: GroupId) -> Result<()> {
        let result = sqlx::query("DELETE FROM media_index WHERE group_id = ?")
            .bind(group)
            .execute(&self.pool)
            .await?;

        debug!(%group, removed = result.rows_affected(), "Purged group from index");
        Ok(())
    }

    async fn count(&self, group: GroupId) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM media_index WHERE group_id = ?",
        )
        .bind(group)
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }
}

// ============================================================================
// Tests
// ============================================================================
