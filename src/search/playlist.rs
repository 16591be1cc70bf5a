//! Featured and playlist views over the catalog.
//!
//! Both views are in catalog order; nothing here re-ranks.

use std::sync::Arc;

use crate::domain::{MatchResult, MediaType, PlaybackType, ResultKind, SkillIdentity, VideoRecord};
use crate::library::Catalog;

/// Confidence carried by every featured entry
pub const FEATURED_CONFIDENCE: u8 = 70;

/// Default number of entries wrapped into a playlist
pub const DEFAULT_PLAYLIST_LIMIT: usize = 250;

/// Builds host-facing results from catalog records
#[derive(Debug, Clone)]
pub struct PlaylistBuilder {
    identity: Arc<SkillIdentity>,
}

impl PlaylistBuilder {
    pub fn new(identity: Arc<SkillIdentity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &SkillIdentity {
        &self.identity
    }

    /// Every catalog entry, in catalog order
    pub fn featured(&self, catalog: &Catalog) -> Vec<MatchResult> {
        catalog.iter().map(|record| self.featured_entry(record)).collect()
    }

    /// The first `limit` featured entries wrapped into one result
    pub fn playlist(&self, catalog: &Catalog, score: u8, limit: usize) -> MatchResult {
        let entries = catalog
            .iter()
            .take(limit)
            .map(|record| self.featured_entry(record))
            .collect();

        MatchResult {
            title: format!("{} (Movie Playlist)", self.identity.provider_name),
            author: Some(self.identity.provider_name.clone()),
            match_confidence: score.min(100),
            media_type: MediaType::ShortFilm,
            playback_type: PlaybackType::Video,
            image: self.identity.skill_icon.clone(),
            bg_image: self.identity.default_bg.clone(),
            skill_icon: self.identity.skill_icon.clone(),
            skill_id: self.identity.skill_id.clone(),
            kind: ResultKind::Playlist { entries },
        }
    }

    fn featured_entry(&self, record: &VideoRecord) -> MatchResult {
        let mut result = self.video_result(record, FEATURED_CONFIDENCE);
        result.bg_image = record.thumbnail.clone();
        result
    }

    /// A single-video search hit
    pub fn video_result(&self, record: &VideoRecord, confidence: u8) -> MatchResult {
        MatchResult {
            title: record.title.clone(),
            author: Some(
                record
                    .author
                    .clone()
                    .unwrap_or_else(|| self.identity.provider_name.clone()),
            ),
            match_confidence: confidence.min(100),
            media_type: MediaType::ShortFilm,
            playback_type: PlaybackType::Video,
            image: record.thumbnail.clone(),
            bg_image: self.identity.default_bg.clone(),
            skill_icon: self.identity.skill_icon.clone(),
            skill_id: self.identity.skill_id.clone(),
            kind: ResultKind::Video {
                uri: record.playback_uri(),
            },
        }
    }
}
