//! Local file catalog source, for seed imports and offline use.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{parse_snapshot, CatalogSource, SourceError};
use crate::library::Catalog;

/// Catalog source read from a JSON file on disk
pub struct FileCatalogSource {
    path: PathBuf,
    name: String,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Catalog, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_snapshot(&content)
    }
}
