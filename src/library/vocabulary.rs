//! Entity vocabulary mined from catalog titles.
//!
//! Upload titles on short film channels follow a loose convention:
//!
//! ```text
//! CGI 3D Animated Short HD: "The Olympians" by - Masters of Pie
//! CGI Animated Short Film: "Hinterland" by Jack Smith, Anna Lee & Tom Park | CGMeetup
//! ```
//!
//! The quoted part is the film title and whatever follows ` by ` is the
//! credit. These rules are a best-effort heuristic, not a grammar.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::catalog::Catalog;

/// Genre terms that are always recognised
pub const DEFAULT_GENRES: &[&str] = &["3D", "animated", "animation", "CGI"];

/// Names the provider is known by
pub const DEFAULT_PROVIDER_ALIASES: &[&str] = &["CGBros", "CG Bros", "The CGBros", "TheCGBros"];

const CREDIT_SEPARATOR: &str = " by ";

/// Category of a recognised entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    ShortMovieName,
    MovieActor,
    FilmStudio,
    MovieGenre,
    StreamingProvider,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 5] = [
        EntityCategory::ShortMovieName,
        EntityCategory::MovieActor,
        EntityCategory::FilmStudio,
        EntityCategory::MovieGenre,
        EntityCategory::StreamingProvider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::ShortMovieName => "short_movie_name",
            EntityCategory::MovieActor => "movie_actor",
            EntityCategory::FilmStudio => "film_studio",
            EntityCategory::MovieGenre => "movie_genre",
            EntityCategory::StreamingProvider => "streaming_provider",
        }
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown entity category: {}", s))
    }
}

/// Candidate strings per entity category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityVocabulary {
    categories: BTreeMap<EntityCategory, BTreeSet<String>>,
}

impl EntityVocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate; blank strings are ignored
    pub fn add(&mut self, category: EntityCategory, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.categories
            .entry(category)
            .or_default()
            .insert(value.to_string());
    }

    /// Candidates of one category
    pub fn entries(&self, category: EntityCategory) -> impl Iterator<Item = &str> {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Check for a candidate (case-insensitive)
    pub fn contains(&self, category: EntityCategory, value: &str) -> bool {
        self.entries(category).any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Number of candidates in a category
    pub fn count(&self, category: EntityCategory) -> usize {
        self.categories.get(&category).map_or(0, BTreeSet::len)
    }
}

/// Entities mined from one title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleEntities {
    pub titles: Vec<String>,
    pub actors: Vec<String>,
    pub studio: Option<String>,
}

/// Builds an [`EntityVocabulary`] from catalog contents
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    genres: Vec<String>,
    provider_aliases: Vec<String>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self {
            genres: DEFAULT_GENRES.iter().map(|s| s.to_string()).collect(),
            provider_aliases: DEFAULT_PROVIDER_ALIASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the provider aliases (empty input keeps the defaults)
    pub fn with_provider_aliases(mut self, aliases: Vec<String>) -> Self {
        if !aliases.is_empty() {
            self.provider_aliases = aliases;
        }
        self
    }

    /// Build the full vocabulary for a catalog
    pub fn build(&self, catalog: &Catalog) -> EntityVocabulary {
        let mut vocabulary = EntityVocabulary::new();

        for genre in &self.genres {
            vocabulary.add(EntityCategory::MovieGenre, genre);
        }
        for alias in &self.provider_aliases {
            vocabulary.add(EntityCategory::StreamingProvider, alias);
        }

        for record in catalog.iter() {
            let entities = extract_title_entities(&record.title);
            for title in &entities.titles {
                vocabulary.add(EntityCategory::ShortMovieName, title);
            }
            for actor in &entities.actors {
                vocabulary.add(EntityCategory::MovieActor, actor);
            }
            if let Some(studio) = &entities.studio {
                vocabulary.add(EntityCategory::FilmStudio, studio);
            }
        }

        vocabulary
    }
}

/// Mine title, actor and studio candidates out of a raw upload title.
///
/// Titles without the expected separators simply contribute nothing.
pub fn extract_title_entities(title: &str) -> TitleEntities {
    let mut entities = TitleEntities::default();

    if let Some((_, credit)) = title.split_once(CREDIT_SEPARATOR) {
        let credit = normalize_credit(credit);
        if credit.contains(',') {
            entities.actors = split_names(&credit);
        } else if !credit.is_empty() {
            // Single credits are indistinguishable from director names
            entities.studio = Some(credit);
        }
    }

    if let Some(quoted) = quoted_title(title) {
        let quoted = quoted.trim();
        if !quoted.is_empty() {
            entities.titles.push(quoted.to_string());
            if let Some((_, subtitle)) = quoted.split_once(':') {
                let subtitle = subtitle.trim();
                if !subtitle.is_empty() {
                    entities.titles.push(subtitle.to_string());
                }
            }
        }
    }

    entities
}

/// Cut channel suffixes and co-credits, unify separators
fn normalize_credit(credit: &str) -> String {
    let credit = credit.split('|').next().unwrap_or_default();
    let credit = credit.replace('&', ",");
    let credit = credit.split('+').next().unwrap_or_default();
    credit
        .trim_matches(|c: char| c.is_whitespace() || c == '-')
        .to_string()
}

fn split_names(credit: &str) -> Vec<String> {
    credit
        .split(',')
        .flat_map(|part| part.split(" and "))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text between the first pair of double quotes
fn quoted_title(title: &str) -> Option<&str> {
    let (_, rest) = title.split_once('"')?;
    let (quoted, _) = rest.split_once('"')?;
    Some(quoted)
}
