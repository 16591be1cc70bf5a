//! Adapter interfaces for remote catalog sources.
//!
//! A source returns a full catalog snapshot; merging is the store's job.

pub mod file;
pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::library::Catalog;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;

/// Errors that can occur while fetching a snapshot
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed catalog payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for catalog snapshot sources
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable source description
    fn name(&self) -> &str;

    /// Fetch a full snapshot
    async fn fetch(&self) -> Result<Catalog, SourceError>;
}

/// Parse a `url -> record` JSON payload
pub fn parse_snapshot(payload: &str) -> Result<Catalog, SourceError> {
    Ok(serde_json::from_str(payload)?)
}
