//! Applies a single update: download, extract, run hooks

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::update::archive::extract_archive;
use crate::update::download::Downloader;
use crate::update::error::{ArchiveError, DownloadError, UpdateError};
use crate::update::hooks::{HookContext, PostExtractHook, run_hooks};
use crate::update::types::UpdateEntry;

/// Summary of one applied update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedUpdate {
    pub version: String,
    pub bytes_downloaded: u64,
    pub files_extracted: usize,
}

pub struct UpdateApplier {
    downloader: Arc<dyn Downloader>,
    root: PathBuf,
    archive_dir: PathBuf,
    hooks: Vec<Box<dyn PostExtractHook>>,
}

impl UpdateApplier {
    pub fn new(downloader: Arc<dyn Downloader>, root: PathBuf, archive_dir: PathBuf) -> Self {
        Self {
            downloader,
            root,
            archive_dir,
            hooks: Vec::new(),
        }
    }

    /// Adds a hook run after every extraction, after previously added hooks
    pub fn with_hook(mut self, hook: impl PostExtractHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Downloads, extracts and finalizes `entry`.
    ///
    /// The temporary archive is removed on every exit path.
    pub async fn apply(&self, entry: &UpdateEntry) -> Result<AppliedUpdate, UpdateError> {
        let download_error = |source: DownloadError| UpdateError::Download {
            version: entry.version.clone(),
            source,
        };
        let extraction_error = |source: ArchiveError| UpdateError::Extraction {
            version: entry.version.clone(),
            source,
        };

        let archive = tempfile::Builder::new()
            .prefix(&format!("update_{}_", file_name_safe(&entry.version)))
            .suffix(".zip")
            .tempfile_in(&self.archive_dir)
            .map_err(|e| download_error(e.into()))?;

        info!("Downloading: {}", entry.download_url);
        let bytes_downloaded = self
            .downloader
            .download(&entry.download_url, archive.path())
            .await
            .map_err(download_error)?;

        info!("Extracting files...");
        let archive_path = archive.path().to_path_buf();
        let root = self.root.clone();
        let files_extracted =
            tokio::task::spawn_blocking(move || extract_archive(&archive_path, &root))
                .await
                .map_err(|e| extraction_error(ArchiveError::Task(e.to_string())))?
                .map_err(extraction_error)?;

        if let Err(e) = archive.close() {
            warn!("Failed to remove temporary archive: {}", e);
        }

        let ctx = HookContext {
            root: &self.root,
            entry,
        };
        run_hooks(&self.hooks, &ctx)?;

        info!("Version {} applied.", entry.version);

        Ok(AppliedUpdate {
            version: entry.version.clone(),
            bytes_downloaded,
            files_extracted,
        })
    }
}

/// Replaces characters that are unsafe in file names
fn file_name_safe(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
