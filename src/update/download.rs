//! Archive download

use std::path::Path;

use futures::StreamExt;
#[cfg(test)]
use mockall::automock;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::update::error::DownloadError;

/// Trait for copying a remote archive to a local file
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Streams `url` into `dest`, replacing its contents.
    ///
    /// Returns the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;
}

/// Downloader using a shared reqwest client
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if !status.is_success() {
            warn!("Download server returned status {}: {}", status, url);
            return Err(DownloadError::Status(status));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        debug!("Wrote {} bytes from {} to {:?}", written, url, dest);

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    #[tokio::test]
    async fn download_writes_body_to_destination() {
        let mut server = Server::new_async().await;
        let body = vec![7u8; 64 * 1024];

        let mock = server
            .mock("GET", "/1.1.0.zip")
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body(body.clone())
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("archive.zip");
        let downloader = HttpDownloader::new(reqwest::Client::new());

        let written = downloader
            .download(&format!("{}/1.1.0.zip", server.url()), &dest)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn download_replaces_existing_destination_contents() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/small.zip")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("archive.zip");
        std::fs::write(&dest, "much longer previous contents").unwrap();
        let downloader = HttpDownloader::new(reqwest::Client::new());

        downloader
            .download(&format!("{}/small.zip", server.url()), &dest)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[tokio::test]
    async fn download_returns_status_error_for_non_success_response() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/missing.zip")
            .with_status(500)
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("archive.zip");
        let downloader = HttpDownloader::new(reqwest::Client::new());

        let result = downloader
            .download(&format!("{}/missing.zip", server.url()), &dest)
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(DownloadError::Status(status)) if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(!dest.exists());
    }
}
