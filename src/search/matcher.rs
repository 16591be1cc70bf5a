//! Phrase matching and scoring.
//!
//! Scoring for a phrase + media type:
//! - 25 if the media type is the skill's target type
//! - +50 for every vocabulary category with a match
//! - +35 when results are filtered by a matched title, +20 when filtered by studio
//!
//! Final confidences are clamped to [0, 100].

use std::collections::BTreeMap;
use std::sync::Arc;

use super::playlist::{PlaylistBuilder, DEFAULT_PLAYLIST_LIMIT};
use crate::domain::{clamp_confidence, MatchResult, MediaType};
use crate::library::{CatalogSnapshot, EntityCategory, EntityVocabulary};

pub const TARGET_MEDIA_SCORE: i32 = 25;
pub const CATEGORY_MATCH_SCORE: i32 = 50;
pub const TITLE_FILTER_SCORE: i32 = 35;
pub const STUDIO_FILTER_SCORE: i32 = 20;

/// The entity matched per category (longest candidate wins)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedEntities {
    matches: BTreeMap<EntityCategory, String>,
}

impl MatchedEntities {
    /// Match a phrase against every vocabulary category
    pub fn from_phrase(vocabulary: &EntityVocabulary, phrase: &str) -> Self {
        let phrase_lower = phrase.to_lowercase();
        let mut matches = BTreeMap::new();

        for category in EntityCategory::ALL {
            let best = vocabulary
                .entries(category)
                .filter(|candidate| contains_term(&phrase_lower, &candidate.to_lowercase()))
                .max_by_key(|candidate| candidate.chars().count());

            if let Some(best) = best {
                matches.insert(category, best.to_string());
            }
        }

        Self { matches }
    }

    pub fn get(&self, category: EntityCategory) -> Option<&str> {
        self.matches.get(&category).map(String::as_str)
    }

    /// Number of distinct categories matched
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, &str)> {
        self.matches.iter().map(|(c, v)| (*c, v.as_str()))
    }
}

/// Case-insensitive whole-term containment.
///
/// Both inputs must already be lowercased. A hit must not be glued to
/// alphanumeric characters on either side.
fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, hit)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + hit.len()..].chars().next();
        before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
    })
}

/// Turns a phrase into scored playback candidates
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    builder: PlaylistBuilder,
    target: MediaType,
    playlist_limit: usize,
}

impl QueryMatcher {
    pub fn new(builder: PlaylistBuilder) -> Self {
        Self {
            builder,
            target: MediaType::ShortFilm,
            playlist_limit: DEFAULT_PLAYLIST_LIMIT,
        }
    }

    /// Score and filter the catalog for a phrase
    pub fn search(
        &self,
        snapshot: Arc<CatalogSnapshot>,
        phrase: &str,
        media_type: MediaType,
    ) -> SearchResults {
        let matched = MatchedEntities::from_phrase(&snapshot.vocabulary, phrase);

        let mut score = if media_type == self.target {
            TARGET_MEDIA_SCORE
        } else {
            0
        };
        score += CATEGORY_MATCH_SCORE * matched.count() as i32;

        let playlist_score = matched
            .get(EntityCategory::StreamingProvider)
            .map(|_| clamp_confidence(score));

        let filter = if let Some(title) = matched.get(EntityCategory::ShortMovieName) {
            Some((title.to_lowercase(), clamp_confidence(score + TITLE_FILTER_SCORE)))
        } else {
            matched
                .get(EntityCategory::FilmStudio)
                .map(|studio| (studio.to_lowercase(), clamp_confidence(score + STUDIO_FILTER_SCORE)))
        };

        SearchResults {
            snapshot,
            builder: self.builder.clone(),
            playlist_limit: self.playlist_limit,
            matched,
            playlist_score,
            filter,
            cursor: 0,
        }
    }
}

/// Lazy sequence of results for one query
pub struct SearchResults {
    snapshot: Arc<CatalogSnapshot>,
    builder: PlaylistBuilder,
    playlist_limit: usize,
    matched: MatchedEntities,
    /// Pending playlist result, taken on first poll
    playlist_score: Option<u8>,
    /// Lowercased title filter and the confidence shared by its hits
    filter: Option<(String, u8)>,
    cursor: usize,
}

impl SearchResults {
    /// Entities the phrase matched
    pub fn matched(&self) -> &MatchedEntities {
        &self.matched
    }
}

impl Iterator for SearchResults {
    type Item = MatchResult;

    fn next(&mut self) -> Option<MatchResult> {
        if let Some(score) = self.playlist_score.take() {
            return Some(
                self.builder
                    .playlist(&self.snapshot.catalog, score, self.playlist_limit),
            );
        }

        let (term, confidence) = self.filter.as_ref()?;

        while let Some(record) = self.snapshot.catalog.get_index(self.cursor) {
            self.cursor += 1;
            if record.title.to_lowercase().contains(term.as_str()) {
                return Some(self.builder.video_result(record, *confidence));
            }
        }

        None
    }
}
