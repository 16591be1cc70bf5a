//! reelmatch - Short film catalog mirror and media matcher
//!
//! Answers natural-language media requests ("play a short film by X") by
//! matching them against a locally mirrored catalog of short films synced
//! from a remote source.
//!
//! # Architecture
//!
//! ```text
//! SyncManager ─> CatalogStore ─> KeywordExtractor (vocabulary rebuilt per merge)
//!                     │
//!                     └─> QueryMatcher / PlaylistBuilder ─> MatchResult
//! ```
//!
//! # Modules
//!
//! - `adapters`: Catalog snapshot sources (HTTP, file)
//! - `core`: Host-facing skill surface
//! - `domain`: Data structures (VideoRecord, MediaType, MatchResult)
//! - `library`: Catalog, persistent store, entity vocabulary
//! - `search`: Query matching, featured view, playlists
//! - `sync`: Jittered background synchronisation
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Pull the remote catalog
//! reelmatch sync
//!
//! # Ask for something
//! reelmatch search "play the olympians" --media-type short_film
//!
//! # Keep the mirror fresh
//! reelmatch watch
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod search;
pub mod sync;

// Re-export main types at crate root for convenience
pub use crate::core::ShortFilmSkill;
pub use domain::{MatchResult, MediaType, PlaybackType, ResultKind, SkillIdentity, VideoRecord};
pub use library::{Catalog, CatalogStore, EntityCategory, EntityVocabulary, KeywordExtractor};
pub use search::{PlaylistBuilder, QueryMatcher, SearchError, SearchResults};
pub use sync::{SyncHandle, SyncManager, SyncSchedule};
