//! Downloader Contracts
//!
//! The reconciliation core decides what to do with each remote item; the
//! transfer agent performs the byte movement. Network transport, session
//! handling, and retry policy all live behind this trait.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Downloader collaborator.
///
/// Implementations own the HTTP stack. The core hands them a destination
/// whose parent directory already exists.
#[async_trait]
pub trait TransferAgent: Send + Sync {
    /// Download the item at `locator` to `dest`.
    ///
    /// Returns the hex-encoded content checksum of the bytes written, which
    /// the caller records in the checksum index. Implementations must not
    /// leave a partial file at `dest` on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails or the destination cannot be
    /// written.
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<String>;

    /// Move previously materialized content from `from` to `to`.
    ///
    /// Used when reconciliation recognizes existing content that belongs at a
    /// new location; no bytes are re-downloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the move fails.
    async fn relocate(&self, from: &Path, to: &Path) -> Result<()>;
}
