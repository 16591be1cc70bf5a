//! Query matching and result assembly.
//!
//! - QueryMatcher: phrase + media type -> scored, filtered results
//! - PlaylistBuilder: featured list and "play everything" playlist

pub mod matcher;
pub mod playlist;

use thiserror::Error;

use crate::domain::UnknownMediaType;

pub use matcher::{
    MatchedEntities, QueryMatcher, SearchResults, CATEGORY_MATCH_SCORE, STUDIO_FILTER_SCORE,
    TARGET_MEDIA_SCORE, TITLE_FILTER_SCORE,
};
pub use playlist::{PlaylistBuilder, DEFAULT_PLAYLIST_LIMIT, FEATURED_CONFIDENCE};

/// Rejected search input
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    UnknownMediaType(#[from] UnknownMediaType),
}
