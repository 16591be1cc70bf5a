//! Persistent catalog store with atomic snapshot swaps.
//!
//! Readers grab an `Arc<CatalogSnapshot>` and keep working on it for as long
//! as they like. A merge builds a fresh snapshot (catalog + vocabulary) off
//! to the side and swaps it in, so a reader never sees half a merge.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

use super::catalog::{Catalog, MergeStats};
use super::vocabulary::{EntityVocabulary, KeywordExtractor};
use crate::domain::VideoRecord;

/// Errors that can occur with the catalog store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Immutable view of the catalog and the vocabulary derived from it
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub catalog: Catalog,
    pub vocabulary: EntityVocabulary,
    pub built_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    fn build(catalog: Catalog, extractor: &KeywordExtractor) -> Self {
        let vocabulary = extractor.build(&catalog);
        Self {
            catalog,
            vocabulary,
            built_at: Some(Utc::now()),
        }
    }
}

/// File-backed catalog store
pub struct CatalogStore {
    /// Where the catalog is persisted (None = memory only)
    path: Option<PathBuf>,

    extractor: KeywordExtractor,

    current: RwLock<Arc<CatalogSnapshot>>,

    /// Serialises merges so concurrent writers cannot lose updates
    write_lock: Mutex<()>,

    /// Set while the in-memory catalog is ahead of the file
    dirty: AtomicBool,
}

impl CatalogStore {
    /// Open a store backed by a JSON file, loading it if present
    pub async fn open(path: impl Into<PathBuf>, extractor: KeywordExtractor) -> Result<Self, StoreError> {
        let path = path.into();
        let catalog = load_catalog(&path).await?;

        tracing::debug!("Loaded {} catalog entries from {}", catalog.len(), path.display());

        let snapshot = CatalogSnapshot::build(catalog, &extractor);
        Ok(Self {
            path: Some(path),
            extractor,
            current: RwLock::new(Arc::new(snapshot)),
            write_lock: Mutex::new(()),
            dirty: AtomicBool::new(false),
        })
    }

    /// Create a store that never touches disk
    pub fn in_memory(extractor: KeywordExtractor) -> Self {
        let snapshot = CatalogSnapshot::build(Catalog::new(), &extractor);
        Self {
            path: None,
            extractor,
            current: RwLock::new(Arc::new(snapshot)),
            write_lock: Mutex::new(()),
            dirty: AtomicBool::new(false),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        // The guarded value is only ever replaced whole, so a poisoned lock still holds a valid Arc
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Get a record by URL
    pub fn get(&self, url: &str) -> Option<VideoRecord> {
        self.snapshot().catalog.get(url).cloned()
    }

    /// Whether the last merge has not reached disk yet
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Number of cataloged records
    pub fn len(&self) -> usize {
        self.snapshot().catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge an incoming snapshot, rebuild the vocabulary and persist.
    ///
    /// The in-memory swap happens before the write, so a failed save leaves
    /// readers on the merged catalog and the error is reported to the caller.
    /// The store stays dirty until a later merge manages to write the file,
    /// even when that merge brings nothing new.
    pub async fn merge(&self, incoming: Catalog) -> Result<MergeStats, StoreError> {
        let _writer = self.write_lock.lock().await;

        let mut catalog = self.snapshot().catalog.clone();
        let stats = catalog.merge(incoming);

        let snapshot = if stats.changed() {
            let snapshot = Arc::new(CatalogSnapshot::build(catalog, &self.extractor));
            if self.path.is_some() {
                self.dirty.store(true, Ordering::SeqCst);
            }
            {
                let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
                *current = Arc::clone(&snapshot);
            }

            tracing::info!(
                "Catalog merged: {} inserted, {} updated ({} total)",
                stats.inserted,
                stats.updated,
                snapshot.catalog.len()
            );
            snapshot
        } else if self.is_dirty() {
            tracing::info!("Retrying save of unsaved catalog");
            self.snapshot()
        } else {
            return Ok(stats);
        };

        if let Some(path) = &self.path {
            save_catalog(path, &snapshot.catalog).await?;
            self.dirty.store(false, Ordering::SeqCst);
        }

        Ok(stats)
    }
}

/// Load a catalog file; a missing file is an empty catalog
async fn load_catalog(path: &Path) -> Result<Catalog, StoreError> {
    if !path.exists() {
        return Ok(Catalog::new());
    }

    let content = fs::read_to_string(path).await.map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Catalog::new());
    }

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

async fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let content = serde_json::to_string_pretty(catalog)?;
    fs::write(path, content).await.map_err(io_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::vocabulary::EntityCategory;
    use tempfile::TempDir;

    fn olympians() -> Catalog {
        [VideoRecord::new(
            "https://y/1",
            r#"CGI 3D Animated Short HD: "The Olympians" by - Masters of Pie"#,
        )]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::open(temp.path().join("catalog.json"), KeywordExtractor::new())
            .await
            .unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_merge_rebuilds_vocabulary() {
        let store = CatalogStore::in_memory(KeywordExtractor::new());
        let before = store.snapshot();

        store.merge(olympians()).await.unwrap();
        let after = store.snapshot();

        assert_eq!(before.vocabulary.count(EntityCategory::FilmStudio), 0);
        assert!(after.vocabulary.contains(EntityCategory::FilmStudio, "Masters of Pie"));
        // Old readers keep their snapshot
        assert!(before.catalog.is_empty());
    }

    #[tokio::test]
    async fn test_merge_persists_and_reloads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("catalog.json");

        let store = CatalogStore::open(&path, KeywordExtractor::new()).await.unwrap();
        store.merge(olympians()).await.unwrap();

        let reopened = CatalogStore::open(&path, KeywordExtractor::new()).await.unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.get("https://y/1").is_some());
    }

    #[tokio::test]
    async fn test_unchanged_merge_keeps_snapshot() {
        let store = CatalogStore::in_memory(KeywordExtractor::new());
        store.merge(olympians()).await.unwrap();
        let first = store.snapshot();

        let stats = store.merge(olympians()).await.unwrap();

        assert!(!stats.changed());
        assert!(Arc::ptr_eq(&first, &store.snapshot()));
    }

    #[tokio::test]
    async fn test_failed_save_is_retried_on_next_merge() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        let store = CatalogStore::open(&path, KeywordExtractor::new()).await.unwrap();

        // A directory in the way makes the write fail
        tokio::fs::create_dir(&path).await.unwrap();
        let result = store.merge(olympians()).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(store.is_dirty());
        assert_eq!(store.len(), 1);

        tokio::fs::remove_dir(&path).await.unwrap();
        let stats = store.merge(olympians()).await.unwrap();
        assert!(!stats.changed());
        assert!(!store.is_dirty());

        let reopened = CatalogStore::open(&path, KeywordExtractor::new()).await.unwrap();
        assert_eq!(reopened.len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_store_is_never_dirty() {
        let store = CatalogStore::in_memory(KeywordExtractor::new());
        store.merge(olympians()).await.unwrap();
        assert!(!store.is_dirty());
        assert!(store.path().is_none());
    }

    #[tokio::test]
    async fn test_open_corrupt_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

        let result = CatalogStore::open(&path, KeywordExtractor::new()).await;
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }
}
