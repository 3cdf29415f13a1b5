use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("{} not found", .0.display())]
    MissingVersionFile(PathBuf),

    #[error("Failed to read version file {}: {source}", path.display())]
    VersionFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    #[error("Failed to download version {version}: {source}")]
    Download {
        version: String,
        #[source]
        source: DownloadError,
    },

    #[error("Failed to extract version {version}: {source}")]
    Extraction {
        version: String,
        #[source]
        source: ArchiveError,
    },

    #[error("Failed to process control file {}: {source}", path.display())]
    ControlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entry escapes the installation root: {0}")]
    UnsafePath(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Failure removing one deletion-manifest entry; logged, never fatal
#[derive(Debug, Error)]
#[error("Error deleting {}: {source}", path.display())]
pub struct DeletionError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
