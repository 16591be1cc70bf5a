//! Domain types for reelmatch.
//!
//! This module contains the core data structures:
//! - VideoRecord: One mirrored catalog entry
//! - MediaType / MatchResult: What the host asks for and what it gets back

pub mod media;
pub mod video;

// Re-export commonly used types
pub use media::{
    clamp_confidence, MatchResult, MediaType, PlaybackType, ResultKind, SkillIdentity,
    UnknownMediaType,
};
pub use video::{VideoRecord, YOUTUBE_URI_PREFIX};
