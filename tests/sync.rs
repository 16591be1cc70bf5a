//! Sync Manager Integration Tests
//!
//! Tests for bootstrap ordering, failure absorption, rescheduling and
//! cancellation of the background sync loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reelmatch::adapters::{CatalogSource, FileCatalogSource, SourceError};
use reelmatch::library::{Catalog, CatalogStore, KeywordExtractor};
use reelmatch::sync::{SyncError, SyncManager, SyncSchedule};
use reelmatch::VideoRecord;
use tempfile::TempDir;

/// Source that counts fetches and serves a fixed catalog
struct CountingSource {
    name: String,
    catalog: Catalog,
    fetches: AtomicUsize,
}

impl CountingSource {
    fn new(name: &str, catalog: Catalog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            catalog,
            fetches: AtomicUsize::new(0),
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for CountingSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Catalog, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.clone())
    }
}

/// Source that always serves a malformed payload
struct BrokenSource {
    fetches: AtomicUsize,
}

#[async_trait]
impl CatalogSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    async fn fetch(&self) -> Result<Catalog, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        reelmatch::adapters::parse_snapshot(r#"{"https://y/1": {"no_title": true}}"#)
    }
}

fn record(url: &str, title: &str) -> Catalog {
    [VideoRecord::new(url, title)].into_iter().collect()
}

fn store() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::in_memory(KeywordExtractor::new()))
}

fn fast_schedule() -> SyncSchedule {
    SyncSchedule::new(Duration::from_millis(10), Duration::from_millis(30))
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_bootstrap_then_eager_sync() {
    let store = store();
    let seed = CountingSource::new("seed", record("https://y/seed", "Seed short"));
    let remote = CountingSource::new("remote", record("https://y/remote", "Remote short"));

    let manager = SyncManager::new(Arc::clone(&store), remote.clone())
        .with_bootstrap(seed.clone())
        .with_schedule(SyncSchedule::new(
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        ));

    let handle = manager.start();
    wait_for(|| store.len() == 2).await;
    handle.stop().await.unwrap();

    assert_eq!(seed.fetches(), 1);
    assert_eq!(remote.fetches(), 1);

    // Bootstrap entries come first in catalog order
    let snapshot = store.snapshot();
    let urls: Vec<_> = snapshot.catalog.urls().collect();
    assert_eq!(urls, vec!["https://y/seed", "https://y/remote"]);
}

#[tokio::test]
async fn test_loop_reschedules() {
    let store = store();
    let remote = CountingSource::new("remote", record("https://y/1", "Short"));

    let handle = SyncManager::new(Arc::clone(&store), remote.clone())
        .with_schedule(fast_schedule())
        .start();

    wait_for(|| remote.fetches() >= 3).await;
    handle.stop().await.unwrap();

    // Repeated identical snapshots never grow the catalog
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_failures_are_absorbed_and_retried() {
    let store = store();
    store.merge(record("https://y/kept", "Kept short")).await.unwrap();

    let broken = Arc::new(BrokenSource {
        fetches: AtomicUsize::new(0),
    });

    let handle = SyncManager::new(Arc::clone(&store), broken.clone())
        .with_schedule(fast_schedule())
        .start();

    wait_for(|| broken.fetches.load(Ordering::SeqCst) >= 3).await;
    assert!(!handle.is_finished());
    handle.stop().await.unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.get("https://y/kept").is_some());
}

#[tokio::test]
async fn test_malformed_payload_reports_source_error() {
    let store = store();
    let broken = Arc::new(BrokenSource {
        fetches: AtomicUsize::new(0),
    });

    let result = SyncManager::new(Arc::clone(&store), broken).sync_once().await;

    assert!(matches!(
        result,
        Err(SyncError::Source {
            error: SourceError::Malformed(_),
            ..
        })
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_stop_cancels_pending_timer() {
    let remote = CountingSource::new("remote", Catalog::new());

    let handle = SyncManager::new(store(), remote.clone())
        .with_schedule(SyncSchedule::new(
            Duration::from_secs(86400),
            Duration::from_secs(86400),
        ))
        .start();

    wait_for(|| remote.fetches() == 1).await;

    // Stopping must not wait out the day-long delay
    tokio::time::timeout(Duration::from_secs(2), handle.stop())
        .await
        .expect("stop should not block on the pending timer")
        .unwrap();

    assert_eq!(remote.fetches(), 1);
}

#[tokio::test]
async fn test_sync_from_file_source() {
    let temp = TempDir::new().unwrap();
    let seed = temp.path().join("seed.json");
    tokio::fs::write(
        &seed,
        r#"{
            "https://www.youtube.com/watch?v=1": {
                "title": "CGI 3D Animated Short HD: \"The Olympians\" by - Masters of Pie",
                "url": "https://www.youtube.com/watch?v=1",
                "thumbnail": "https://i.ytimg.com/vi/1/hqdefault.jpg",
                "author": "TheCGBros"
            }
        }"#,
    )
    .await
    .unwrap();

    let catalog_path = temp.path().join("catalog.json");
    let store = Arc::new(
        CatalogStore::open(&catalog_path, KeywordExtractor::new())
            .await
            .unwrap(),
    );

    let report = SyncManager::new(Arc::clone(&store), Arc::new(FileCatalogSource::new(&seed)))
        .sync_once()
        .await
        .unwrap();

    assert_eq!(report.stats.inserted, 1);
    assert_eq!(report.catalog_len, 1);
    assert!(catalog_path.exists());
}
