//! Periodic catalog synchronisation.
//!
//! The manager fetches a snapshot, merges it into the store and sleeps for a
//! jittered delay before doing it again. Fetch failures are logged and the
//! loop carries on; nothing here ever reaches a query caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use super::schedule::SyncSchedule;
use crate::adapters::{CatalogSource, SourceError};
use crate::library::{CatalogStore, MergeStats, StoreError};

/// Default bound on a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during a sync
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch from {source_name} failed: {error}")]
    Source {
        source_name: String,
        #[source]
        error: SourceError,
    },

    #[error("Fetch from {source_name} timed out after {timeout:?}")]
    Timeout {
        source_name: String,
        timeout: Duration,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a successful sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Source the snapshot came from
    pub source: String,

    /// Merge statistics
    pub stats: MergeStats,

    /// Catalog size after the merge
    pub catalog_len: usize,

    pub finished_at: DateTime<Utc>,
}

/// Keeps the catalog store in step with a remote source
pub struct SyncManager {
    store: Arc<CatalogStore>,
    source: Arc<dyn CatalogSource>,
    bootstrap: Option<Arc<dyn CatalogSource>>,
    schedule: SyncSchedule,
    fetch_timeout: Duration,
}

impl SyncManager {
    /// Create a manager with the default schedule and timeout
    pub fn new(store: Arc<CatalogStore>, source: Arc<dyn CatalogSource>) -> Self {
        Self {
            store,
            source,
            bootstrap: None,
            schedule: SyncSchedule::default(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// One-time seed source loaded before the first regular sync
    pub fn with_bootstrap(mut self, bootstrap: Arc<dyn CatalogSource>) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn with_schedule(mut self, schedule: SyncSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn schedule(&self) -> &SyncSchedule {
        &self.schedule
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// Fetch from the regular source and merge
    pub async fn sync_once(&self) -> Result<SyncReport, SyncError> {
        self.pull(self.source.as_ref()).await
    }

    /// Load the bootstrap snapshot, if one is configured
    pub async fn bootstrap(&self) -> Option<Result<SyncReport, SyncError>> {
        let bootstrap = self.bootstrap.as_ref()?;
        Some(self.pull(bootstrap.as_ref()).await)
    }

    async fn pull(&self, source: &dyn CatalogSource) -> Result<SyncReport, SyncError> {
        let source_name = source.name().to_string();

        let snapshot = match tokio::time::timeout(self.fetch_timeout, source.fetch()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(error)) => return Err(SyncError::Source { source_name, error }),
            Err(_) => {
                return Err(SyncError::Timeout {
                    source_name,
                    timeout: self.fetch_timeout,
                })
            }
        };

        tracing::debug!("Fetched {} records from {}", snapshot.len(), source_name);

        let stats = self.store.merge(snapshot).await?;

        Ok(SyncReport {
            source: source_name,
            stats,
            catalog_len: self.store.len(),
            finished_at: Utc::now(),
        })
    }

    /// Start the recurring sync on the tokio runtime.
    ///
    /// Runs the bootstrap (if any) and one sync right away, then one sync
    /// per scheduled delay until the handle is stopped.
    pub fn start(self) -> SyncHandle {
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            self.run(&mut stop_rx).await;
        });

        SyncHandle { stop_tx, task }
    }

    async fn run(&self, stop_rx: &mut mpsc::Receiver<()>) {
        let bootstrap = tokio::select! {
            result = self.bootstrap() => result,
            _ = stop_rx.recv() => {
                tracing::info!("Catalog sync stopped during bootstrap");
                return;
            }
        };
        if let Some(result) = bootstrap {
            log_outcome("Bootstrap", &result);
        }

        loop {
            let result = tokio::select! {
                result = self.sync_once() => result,
                _ = stop_rx.recv() => break,
            };
            log_outcome("Sync", &result);

            let delay = self.schedule.next_delay();
            tracing::debug!("Next catalog sync in {:?}", delay);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stop_rx.recv() => break,
            }
        }

        tracing::info!("Catalog sync stopped");
    }
}

fn log_outcome(label: &str, result: &Result<SyncReport, SyncError>) {
    match result {
        Ok(report) => tracing::info!(
            "{} from {} complete: {} new, {} updated, {} total",
            label,
            report.source,
            report.stats.inserted,
            report.stats.updated,
            report.catalog_len
        ),
        Err(e) => tracing::warn!("{} failed, catalog left unchanged: {}", label, e),
    }
}

/// Handle to control the recurring sync
pub struct SyncHandle {
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the sync loop and wait for it to exit
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(()).await;
        self.task.await?;
        Ok(())
    }

    /// Whether the loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
