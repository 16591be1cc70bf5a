//! Catalog of mirrored short films.
//!
//! An ordered map keyed by source URL. Iteration order is insertion order,
//! which is what the featured view presents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::VideoRecord;

/// Catalog of all mirrored videos, keyed by URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "IndexMap<String, VideoRecord>")]
pub struct Catalog {
    entries: IndexMap<String, VideoRecord>,
}

/// What a merge did to the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Keys that were not present before
    pub inserted: usize,

    /// Existing keys whose fields changed
    pub updated: usize,

    /// Existing keys left as they were
    pub unchanged: usize,
}

impl MergeStats {
    /// Whether the merge mutated anything
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.updated > 0
    }

    /// Number of incoming records
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

impl From<IndexMap<String, VideoRecord>> for Catalog {
    fn from(entries: IndexMap<String, VideoRecord>) -> Self {
        let mut catalog = Catalog::new();
        for (url, record) in entries {
            catalog.insert(url, record);
        }
        catalog
    }
}

impl FromIterator<VideoRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = VideoRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            let url = record.url.clone();
            catalog.insert(url, record);
        }
        catalog
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert or replace a record; the record URL is normalised to the key
    fn insert(&mut self, url: String, mut record: VideoRecord) {
        record.url = url.clone();
        self.entries.insert(url, record);
    }

    /// Get a record by URL
    pub fn get(&self, url: &str) -> Option<&VideoRecord> {
        self.entries.get(url)
    }

    /// Get a record by position in catalog order
    pub fn get_index(&self, index: usize) -> Option<&VideoRecord> {
        self.entries.get_index(index).map(|(_, record)| record)
    }

    /// Check whether a URL is cataloged
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Merge an incoming snapshot.
    ///
    /// New keys are appended in snapshot order, existing keys are updated in
    /// place. Nothing is ever removed.
    pub fn merge(&mut self, incoming: Catalog) -> MergeStats {
        let mut stats = MergeStats::default();

        for (url, record) in incoming.entries {
            match self.entries.get_mut(&url) {
                Some(existing) => {
                    if existing.absorb(record) {
                        stats.updated += 1;
                    } else {
                        stats.unchanged += 1;
                    }
                }
                None => {
                    self.insert(url, record);
                    stats.inserted += 1;
                }
            }
        }

        stats
    }

    /// Iterate records in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.entries.values()
    }

    /// Iterate URLs in catalog order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Catalog {
        [
            VideoRecord::new("https://y/1", r#"CGI Animated Short Film: "Dust" by ESMA"#),
            VideoRecord::new("https://y/2", r#"CGI 3D Animated Short: "Spring" by Blender Studio"#),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_merge_into_empty() {
        let mut catalog = Catalog::new();
        let stats = catalog.merge(snapshot());

        assert_eq!(stats.inserted, 2);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("https://y/1"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut once = Catalog::new();
        once.merge(snapshot());

        let mut twice = Catalog::new();
        twice.merge(snapshot());
        let second = twice.merge(snapshot());

        assert_eq!(once, twice);
        assert!(!second.changed());
        assert_eq!(second.unchanged, 2);
        assert_eq!(second.total(), 2);
    }

    #[test]
    fn test_merge_never_removes() {
        let mut catalog = snapshot();
        let partial: Catalog = [VideoRecord::new("https://y/3", "Another short")]
            .into_iter()
            .collect();

        catalog.merge(partial);
        catalog.merge(Catalog::new());

        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_merge_overwrites_title_keeps_position() {
        let mut catalog = snapshot();
        let update: Catalog = [VideoRecord::new("https://y/1", "Dust (Remastered)")]
            .into_iter()
            .collect();

        let stats = catalog.merge(update);

        assert_eq!(stats.updated, 1);
        assert_eq!(catalog.get_index(0).unwrap().title, "Dust (Remastered)");
    }

    #[test]
    fn test_deserialize_preserves_order_and_normalises_url() {
        let json = r#"{
            "https://y/b": {"title": "B", "thumbnail": "tb"},
            "https://y/a": {"title": "A", "url": "https://elsewhere", "thumbnail": "ta"}
        }"#;

        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let urls: Vec<_> = catalog.urls().collect();

        assert_eq!(urls, vec!["https://y/b", "https://y/a"]);
        assert_eq!(catalog.get("https://y/a").unwrap().url, "https://y/a");
    }
}
