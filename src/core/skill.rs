//! Host-facing skill surface.
//!
//! Wires the catalog store, query matcher and playlist builder together and
//! exposes the read-side calls a voice assistant host makes.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::adapters::HttpCatalogSource;
use crate::config::{ResolvedConfig, SyncSettings};
use crate::domain::{MatchResult, MediaType, SkillIdentity};
use crate::library::{CatalogStore, KeywordExtractor};
use crate::search::{PlaylistBuilder, QueryMatcher, SearchError, SearchResults};
use crate::sync::SyncManager;

/// Media types the skill answers for
pub const SUPPORTED_MEDIA: [MediaType; 2] = [MediaType::ShortFilm, MediaType::Generic];

/// Short film skill backed by a local catalog mirror
pub struct ShortFilmSkill {
    store: Arc<CatalogStore>,
    matcher: QueryMatcher,
    playlists: PlaylistBuilder,
}

impl ShortFilmSkill {
    /// Create a skill over an existing store
    pub fn new(store: Arc<CatalogStore>, identity: SkillIdentity) -> Self {
        let playlists = PlaylistBuilder::new(Arc::new(identity));
        Self {
            store,
            matcher: QueryMatcher::new(playlists.clone()),
            playlists,
        }
    }

    /// Open the persisted catalog named by the configuration
    pub async fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let extractor =
            KeywordExtractor::new().with_provider_aliases(config.skill.provider_aliases.clone());

        let path = config.catalog_path();
        let store = CatalogStore::open(&path, extractor)
            .await
            .with_context(|| format!("Failed to open catalog: {}", path.display()))?;

        Ok(Self::new(Arc::new(store), config.skill.identity.clone()))
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn identity(&self) -> &SkillIdentity {
        self.playlists.identity()
    }

    pub fn supported_media(&self) -> &'static [MediaType] {
        &SUPPORTED_MEDIA
    }

    /// Scored candidates for a phrase
    #[instrument(skip(self))]
    pub fn search(&self, phrase: &str, media_type: MediaType) -> SearchResults {
        let results = self.matcher.search(self.store.snapshot(), phrase, media_type);
        debug!(matched = results.matched().count(), "Phrase matched");
        results
    }

    /// Like [`search`](Self::search), with the media type given by name
    pub fn search_str(&self, phrase: &str, media_type: &str) -> Result<SearchResults, SearchError> {
        let media_type = media_type.parse::<MediaType>()?;
        Ok(self.search(phrase, media_type))
    }

    /// Whole catalog in catalog order
    pub fn featured(&self) -> Vec<MatchResult> {
        self.playlists.featured(&self.store.snapshot().catalog)
    }

    /// The first `limit` featured entries as one playlist
    pub fn playlist(&self, score: u8, limit: usize) -> MatchResult {
        self.playlists
            .playlist(&self.store.snapshot().catalog, score, limit)
    }

    /// Build the sync manager for this skill's store
    pub fn sync_manager(&self, settings: &SyncSettings) -> Result<SyncManager> {
        sync_manager_for(Arc::clone(&self.store), settings)
    }
}

/// Build a sync manager from settings
pub fn sync_manager_for(store: Arc<CatalogStore>, settings: &SyncSettings) -> Result<SyncManager> {
    let source = HttpCatalogSource::new(&settings.source_url, settings.fetch_timeout())
        .context("Failed to build catalog HTTP client")?;

    let mut manager = SyncManager::new(store, Arc::new(source))
        .with_schedule(settings.schedule())
        .with_fetch_timeout(settings.fetch_timeout());

    if let Some(url) = &settings.bootstrap_url {
        let bootstrap = HttpCatalogSource::new(url, settings.fetch_timeout())
            .context("Failed to build bootstrap HTTP client")?;
        manager = manager.with_bootstrap(Arc::new(bootstrap));
    }

    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VideoRecord;
    use crate::library::Catalog;

    async fn skill() -> ShortFilmSkill {
        let store = Arc::new(CatalogStore::in_memory(KeywordExtractor::new()));
        let catalog: Catalog = [
            VideoRecord::new("https://y/1", r#"CGI 3D Animated Short: "Dust" by ESMA"#),
            VideoRecord::new("https://y/2", r#"CGI Animated Short: "Spring" by Blender Studio"#),
        ]
        .into_iter()
        .collect();
        store.merge(catalog).await.unwrap();

        ShortFilmSkill::new(store, SkillIdentity::default())
    }

    #[tokio::test]
    async fn test_search_str_rejects_unknown_media() {
        let skill = skill().await;
        let result = skill.search_str("play dust", "hologram");
        assert!(matches!(result, Err(SearchError::UnknownMediaType(_))));
    }

    #[tokio::test]
    async fn test_search_str_by_name() {
        let skill = skill().await;
        let results: Vec<_> = skill.search_str("play Dust", "short_film").unwrap().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uri(), Some("youtube//https://y/1"));
    }

    #[tokio::test]
    async fn test_featured_and_playlist() {
        let skill = skill().await;
        assert_eq!(skill.featured().len(), 2);
        assert_eq!(skill.playlist(60, 1).playlist_entries().unwrap().len(), 1);
        assert!(skill.supported_media().contains(&MediaType::ShortFilm));
    }

    #[tokio::test]
    async fn test_sync_manager_from_settings() {
        let skill = skill().await;
        let settings = SyncSettings {
            bootstrap_url: Some("https://example.com/seed.json".to_string()),
            ..Default::default()
        };

        let manager = skill.sync_manager(&settings).unwrap();
        assert_eq!(manager.schedule(), &settings.schedule());
    }
}
