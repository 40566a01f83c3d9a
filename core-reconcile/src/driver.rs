//! # Reconciliation Driver
//!
//! Decides, per remote item, whether it is new content, a duplicate already
//! in place, or a relocation of previously known content.
//!
//! ## Overview
//!
//! The driver walks each item through a fixed sequence: resolve its
//! descriptor, obtain a content checksum, consult the checksum index, and
//! hand one of {fetch, skip, relocate} to the transfer agent. Checksum
//! availability is the ordering constraint: when the portal cannot declare a
//! checksum up front, the item must be fetched before the duplicate check can
//! run, so a duplicate may be detected only after the transfer. That wasted
//! transfer is accepted; the index write still saves every future run.
//!
//! ## Failure policy
//!
//! Index errors abort the batch. Placement and transfer errors are scoped to
//! the item that raised them, logged, counted, and the batch continues.

use crate::config::ReconcileConfig;
use crate::descriptor::{Group, MediaDescriptor};
use crate::error::Result;
use bridge_traits::{MediaSource, RemoteItemRecord, TransferAgent};
use core_index::MediaIndex;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Decision for one remote item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No usable local copy; the caller must download.
    Fetch,

    /// Content already materialized at the resolved path; nothing to do.
    Skip { path: PathBuf },

    /// Known content at an outdated location; the caller must move it, then
    /// confirm with [`Reconciler::complete_relocation`]. No bytes are
    /// re-downloaded.
    Relocate { from: PathBuf, to: PathBuf },
}

/// What a confirmed download turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDisposition {
    /// First appearance of this content in its group.
    New,

    /// The content was already indexed elsewhere in the group; the duplicate
    /// was only detectable after the transfer.
    DuplicateAfterTransfer { previous_path: PathBuf },
}

/// Per-batch outcome counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub fetched: u64,
    pub skipped: u64,
    pub relocated: u64,
    pub duplicates_after_transfer: u64,
    pub failed: u64,
}

impl ReconcileStats {
    fn tally(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Fetched => self.fetched += 1,
            ItemOutcome::FetchedDuplicate => {
                self.fetched += 1;
                self.duplicates_after_transfer += 1;
            }
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Relocated => self.relocated += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

enum ItemOutcome {
    Fetched,
    FetchedDuplicate,
    Skipped,
    Relocated,
    Failed,
}

/// Reconciliation driver.
pub struct Reconciler {
    index: Arc<dyn MediaIndex>,
    config: ReconcileConfig,
}

impl Reconciler {
    /// Create a driver over a checksum index.
    pub fn new(index: Arc<dyn MediaIndex>, config: ReconcileConfig) -> Self {
        Self { index, config }
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Decide what to do with one resolved item.
    ///
    /// `checksum` is the item's content checksum when it is already known
    /// (recorded remotely or computed earlier); `None` means it can only be
    /// learned by fetching, which forces the two-phase path.
    ///
    /// # Errors
    ///
    /// Returns an error if the index fails; fatal for the run.
    #[instrument(skip(self, descriptor), fields(group = %descriptor.group.id, locator = %descriptor.source_locator))]
    pub async fn plan(
        &self,
        descriptor: &MediaDescriptor<'_>,
        checksum: Option<&str>,
    ) -> Result<Reconciliation> {
        let Some(checksum) = checksum else {
            debug!("Checksum unknown before transfer");
            return Ok(Reconciliation::Fetch);
        };

        let Some(record) = self.index.lookup(checksum, descriptor.group.id).await? else {
            debug!("Content not in index");
            return Ok(Reconciliation::Fetch);
        };

        let target = descriptor.target_path();
        let recorded = record.path();

        if !file_present(&recorded).await {
            // The indexed copy vanished from disk; rewrite it.
            debug!(recorded = %record.local_path, "Indexed copy missing on disk");
            return Ok(Reconciliation::Fetch);
        }

        if recorded == target {
            if record.source_locator != descriptor.source_locator {
                // Same content, same place, new URL: absorb the rename
                // without any transfer.
                self.index
                    .record(
                        checksum,
                        descriptor.group.id,
                        &target,
                        &descriptor.source_locator,
                    )
                    .await?;
            }
            debug!("Content already in place");
            return Ok(Reconciliation::Skip { path: target });
        }

        debug!(from = %record.local_path, to = %target.display(), "Known content at outdated location");
        Ok(Reconciliation::Relocate {
            from: recorded,
            to: target,
        })
    }

    /// Record a download after the caller confirmed a successful write.
    ///
    /// Reports whether the content turned out to be a duplicate that was only
    /// detectable post-transfer. The freshly written copy wins the index
    /// entry either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the index fails; fatal for the run.
    pub async fn complete_fetch(
        &self,
        descriptor: &MediaDescriptor<'_>,
        checksum: &str,
    ) -> Result<FetchDisposition> {
        let target = descriptor.target_path();
        let previous = self.index.lookup(checksum, descriptor.group.id).await?;

        self.index
            .record(
                checksum,
                descriptor.group.id,
                &target,
                &descriptor.source_locator,
            )
            .await?;

        match previous {
            Some(record) if record.path() != target => {
                debug!(
                    checksum,
                    previous = %record.local_path,
                    "Duplicate content detected after transfer"
                );
                Ok(FetchDisposition::DuplicateAfterTransfer {
                    previous_path: record.path(),
                })
            }
            _ => Ok(FetchDisposition::New),
        }
    }

    /// Record a relocation after the caller moved the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the index fails; fatal for the run.
    pub async fn complete_relocation(
        &self,
        descriptor: &MediaDescriptor<'_>,
        checksum: &str,
    ) -> Result<()> {
        self.index
            .record(
                checksum,
                descriptor.group.id,
                &descriptor.target_path(),
                &descriptor.source_locator,
            )
            .await
            .map_err(Into::into)
    }

    /// Reconcile every item of a group.
    ///
    /// Lists items from `source`, processes them concurrently (bounded by the
    /// configured limit), delegates transfers to `agent`, and returns the
    /// outcome counters. Item-scoped failures are logged and counted; index
    /// failures abort.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails or the index fails.
    #[instrument(skip(self, group, source, agent), fields(group = %group.id))]
    pub async fn sync_group(
        &self,
        group: &Group,
        source: &dyn MediaSource,
        agent: &dyn TransferAgent,
    ) -> Result<ReconcileStats> {
        let records = source.list_items(group.id.0).await?;
        info!(items = records.len(), "Listed remote items");

        let mut stats = ReconcileStats::default();
        let mut outcomes = stream::iter(records)
            .map(|record| self.process_item(group, record, source, agent))
            .buffer_unordered(self.config.max_concurrent_transfers.max(1));

        while let Some(outcome) = outcomes.next().await {
            stats.tally(outcome?);
        }

        info!(
            fetched = stats.fetched,
            skipped = stats.skipped,
            relocated = stats.relocated,
            duplicates = stats.duplicates_after_transfer,
            failed = stats.failed,
            "Group reconciled"
        );
        Ok(stats)
    }

    /// Walk one raw record through the full state machine.
    ///
    /// `Err` is returned only for run-fatal failures; item-scoped failures
    /// come back as `ItemOutcome::Failed`.
    async fn process_item(
        &self,
        group: &Group,
        record: RemoteItemRecord,
        source: &dyn MediaSource,
        agent: &dyn TransferAgent,
    ) -> Result<ItemOutcome> {
        let descriptor = match MediaDescriptor::from_record(&record, group, &self.config).await {
            Ok(descriptor) => descriptor,
            Err(e) if !e.is_fatal() => {
                warn!(locator = %record.source_locator, error = %e, "Item placement failed");
                return Ok(ItemOutcome::Failed);
            }
            Err(e) => return Err(e),
        };

        let declared = match source.declared_checksum(&record).await {
            Ok(checksum) => checksum,
            Err(e) => {
                debug!(locator = %record.source_locator, error = %e, "No pre-transfer checksum");
                None
            }
        };

        let Some(checksum) = declared else {
            return self.fetch_item(&descriptor, agent).await;
        };

        match self.plan(&descriptor, Some(&checksum)).await? {
            Reconciliation::Skip { .. } => Ok(ItemOutcome::Skipped),
            Reconciliation::Fetch => self.fetch_item(&descriptor, agent).await,
            Reconciliation::Relocate { from, to } => {
                match agent.relocate(&from, &to).await {
                    Ok(()) => {
                        self.complete_relocation(&descriptor, &checksum).await?;
                        Ok(ItemOutcome::Relocated)
                    }
                    Err(e) => {
                        warn!(
                            from = %from.display(),
                            to = %to.display(),
                            error = %e,
                            "Relocation failed"
                        );
                        Ok(ItemOutcome::Failed)
                    }
                }
            }
        }
    }

    async fn fetch_item(
        &self,
        descriptor: &MediaDescriptor<'_>,
        agent: &dyn TransferAgent,
    ) -> Result<ItemOutcome> {
        let dest = descriptor.target_path();
        match agent.fetch(&descriptor.source_locator, &dest).await {
            Ok(checksum) => match self.complete_fetch(descriptor, &checksum).await? {
                FetchDisposition::New => Ok(ItemOutcome::Fetched),
                FetchDisposition::DuplicateAfterTransfer { .. } => {
                    Ok(ItemOutcome::FetchedDuplicate)
                }
            },
            Err(e) => {
                warn!(locator = %descriptor.source_locator, error = %e, "Fetch failed");
                Ok(ItemOutcome::Failed)
            }
        }
    }
}

async fn file_present(path: &Path) -> bool {
    matches!(tokio::fs::try_exists(path).await, Ok(true))
}
