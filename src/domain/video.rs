//! Video records mirrored from the remote catalog.

use serde::{Deserialize, Serialize};

/// Prefix the host player understands for YouTube-backed streams
pub const YOUTUBE_URI_PREFIX: &str = "youtube//";

/// A single short film in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Original source URL (primary key)
    #[serde(default)]
    pub url: String,

    /// Raw upload title, e.g. `CGI 3D Animated Short: "Dust" by - ESMA`
    pub title: String,

    /// Channel or credited author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Thumbnail URI
    #[serde(default)]
    pub thumbnail: String,
}

impl VideoRecord {
    /// Create a new record
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            author: None,
            thumbnail: String::new(),
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the thumbnail
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Playback URI handed to the host
    pub fn playback_uri(&self) -> String {
        format!("{}{}", YOUTUBE_URI_PREFIX, self.url)
    }

    /// Overwrite fields with those of `incoming`.
    ///
    /// Absent author and empty thumbnail keep the stored value. Returns true
    /// when anything changed.
    pub fn absorb(&mut self, incoming: VideoRecord) -> bool {
        let mut changed = false;

        if self.title != incoming.title {
            self.title = incoming.title;
            changed = true;
        }

        if let Some(author) = incoming.author {
            if self.author.as_deref() != Some(author.as_str()) {
                self.author = Some(author);
                changed = true;
            }
        }

        if !incoming.thumbnail.is_empty() && self.thumbnail != incoming.thumbnail {
            self.thumbnail = incoming.thumbnail;
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_uri() {
        let record = VideoRecord::new("https://www.youtube.com/watch?v=abc", "Dust");
        assert_eq!(
            record.playback_uri(),
            "youtube//https://www.youtube.com/watch?v=abc"
        );
    }

    #[test]
    fn test_absorb_keeps_missing_fields() {
        let mut stored = VideoRecord::new("u", "Old title")
            .with_author("ESMA")
            .with_thumbnail("https://img/1.jpg");

        let changed = stored.absorb(VideoRecord::new("u", "New title"));

        assert!(changed);
        assert_eq!(stored.title, "New title");
        assert_eq!(stored.author.as_deref(), Some("ESMA"));
        assert_eq!(stored.thumbnail, "https://img/1.jpg");
    }

    #[test]
    fn test_absorb_identical_is_noop() {
        let mut stored = VideoRecord::new("u", "Title").with_thumbnail("t");
        assert!(!stored.absorb(stored.clone()));
    }

    #[test]
    fn test_deserialize_remote_schema() {
        let json = r#"{"title": "Dust", "url": "https://y/1", "thumbnail": "https://i/1", "author": "TheCGBros"}"#;
        let record: VideoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.author.as_deref(), Some("TheCGBros"));

        let missing_title = r#"{"url": "https://y/1"}"#;
        assert!(serde_json::from_str::<VideoRecord>(missing_title).is_err());
    }
}
