//! Media types and the results handed back to the host player.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Media type hint declared by the host alongside a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Generic,
    Audio,
    Music,
    Video,
    Podcast,
    Radio,
    News,
    Movie,
    ShortFilm,
    SilentMovie,
    Documentary,
    Trailer,
    Animation,
    Cartoon,
    Series,
    Game,
}

impl MediaType {
    /// All known media types
    pub const ALL: [MediaType; 16] = [
        MediaType::Generic,
        MediaType::Audio,
        MediaType::Music,
        MediaType::Video,
        MediaType::Podcast,
        MediaType::Radio,
        MediaType::News,
        MediaType::Movie,
        MediaType::ShortFilm,
        MediaType::SilentMovie,
        MediaType::Documentary,
        MediaType::Trailer,
        MediaType::Animation,
        MediaType::Cartoon,
        MediaType::Series,
        MediaType::Game,
    ];

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Generic => "generic",
            MediaType::Audio => "audio",
            MediaType::Music => "music",
            MediaType::Video => "video",
            MediaType::Podcast => "podcast",
            MediaType::Radio => "radio",
            MediaType::News => "news",
            MediaType::Movie => "movie",
            MediaType::ShortFilm => "short_film",
            MediaType::SilentMovie => "silent_movie",
            MediaType::Documentary => "documentary",
            MediaType::Trailer => "trailer",
            MediaType::Animation => "animation",
            MediaType::Cartoon => "cartoon",
            MediaType::Series => "series",
            MediaType::Game => "game",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected media type name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown media type: {0}")]
pub struct UnknownMediaType(pub String);

impl std::str::FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "short" | "shortfilm" => return Ok(MediaType::ShortFilm),
            "film" => return Ok(MediaType::Movie),
            _ => {}
        }

        MediaType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownMediaType(s.to_string()))
    }
}

/// How the host should play a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackType {
    Video,
    Audio,
}

/// Host-supplied identity and branding, passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillIdentity {
    /// Identifier the host registered the skill under
    pub skill_id: String,

    /// Display name of the provider (used as playlist author)
    pub provider_name: String,

    /// Skill icon URI
    pub skill_icon: String,

    /// Default background image URI
    pub default_bg: String,
}

impl Default for SkillIdentity {
    fn default() -> Self {
        Self {
            skill_id: "skill-cgbros.openvoiceos".to_string(),
            provider_name: "The CGBros".to_string(),
            skill_icon: "ui/cgbros_icon.jpg".to_string(),
            default_bg: "ui/cgbros_icon.jpg".to_string(),
        }
    }
}

/// What a result points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultKind {
    /// A single playable video
    Video { uri: String },

    /// A composite of several videos played in order
    Playlist { entries: Vec<MatchResult> },
}

/// A playback candidate returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Confidence in [0, 100]
    pub match_confidence: u8,

    pub media_type: MediaType,

    pub playback_type: PlaybackType,

    pub image: String,

    pub bg_image: String,

    pub skill_icon: String,

    pub skill_id: String,

    #[serde(flatten)]
    pub kind: ResultKind,
}

impl MatchResult {
    /// Playback URI for single-video results
    pub fn uri(&self) -> Option<&str> {
        match &self.kind {
            ResultKind::Video { uri } => Some(uri),
            ResultKind::Playlist { .. } => None,
        }
    }

    /// Entries of a playlist result
    pub fn playlist_entries(&self) -> Option<&[MatchResult]> {
        match &self.kind {
            ResultKind::Playlist { entries } => Some(entries),
            ResultKind::Video { .. } => None,
        }
    }

    pub fn is_playlist(&self) -> bool {
        matches!(self.kind, ResultKind::Playlist { .. })
    }
}

/// Clamp a raw score into the [0, 100] confidence range
pub fn clamp_confidence(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}
