//! HTTP catalog source.
//!
//! Fetches a JSON snapshot with a plain GET.

use std::time::Duration;

use async_trait::async_trait;

use super::{parse_snapshot, CatalogSource, SourceError};
use crate::library::Catalog;

/// Catalog source served over HTTP
pub struct HttpCatalogSource {
    /// Snapshot URL
    url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpCatalogSource {
    /// Create a new source with a request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("reelmatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Catalog, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_snapshot(&body)
    }
}
