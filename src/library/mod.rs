//! Local mirror of the short film catalog.
//!
//! The catalog is persisted as a single JSON object keyed by video URL,
//! the same schema the remote source serves:
//!
//! ```text
//! ~/.reelmatch/
//! └── catalog.json     # { "<url>": { "title", "url", "thumbnail", "author" } }
//! ```
//!
//! Every merge rebuilds the entity vocabulary from the merged catalog.

pub mod catalog;
pub mod store;
pub mod vocabulary;

pub use catalog::{Catalog, MergeStats};
pub use store::{CatalogSnapshot, CatalogStore, StoreError};
pub use vocabulary::{
    extract_title_entities, EntityCategory, EntityVocabulary, KeywordExtractor, TitleEntities,
};
