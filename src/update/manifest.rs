//! Remote manifest retrieval

#[cfg(test)]
use mockall::automock;

use tracing::{debug, warn};

use crate::update::error::UpdateError;
use crate::update::types::Manifest;

/// Trait for fetching the list of published versions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetches and parses the manifest
    ///
    /// # Returns
    /// * `Ok(Manifest)` - Entries in release order, possibly empty
    /// * `Err(UpdateError)` - Transport failure, non-success status, or malformed body
    async fn fetch_manifest(&self) -> Result<Manifest, UpdateError>;
}

/// Manifest source backed by a single well-known URL
pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
}

impl HttpManifestSource {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_manifest(&self) -> Result<Manifest, UpdateError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if !status.is_success() {
            warn!("Manifest server returned status {}: {}", status, self.url);
            return Err(UpdateError::UnexpectedStatus {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.text().await?;
        debug!("Fetched manifest ({} bytes) from {}", body.len(), self.url);

        Manifest::parse(&body).inspect_err(|e| {
            warn!("Failed to parse manifest from {}: {}", self.url, e);
        })
    }
}
