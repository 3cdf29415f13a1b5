use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Well-known locations
// =============================================================================

/// Manifest listing every published version, oldest first
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/Bogdaudae/Freya/main/update.json";

/// Version marker at the installation root
pub const DEFAULT_VERSION_FILE: &str = "version.txt";

/// Deletion manifest an archive may ship at the installation root
pub const DEFAULT_DELETION_MANIFEST: &str = "todelete.txt";

/// Optional config file looked up at the installation root
pub const CONFIG_FILE_NAME: &str = "updater.json";

const APP_NAME: &str = "freya-updater";

const LOG_FILE_NAME: &str = "freya-updater.log";

// =============================================================================
// Exit codes
// =============================================================================

/// Exit code used when the version file is missing
pub const EXIT_NOT_INITIALIZED: u8 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub manifest_url: String,
    pub version_file: String,
    pub deletion_manifest: String,
    /// Directory for downloaded archives; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    pub user_agent: String,
    pub log: LogConfig,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            version_file: DEFAULT_VERSION_FILE.to_string(),
            deletion_manifest: DEFAULT_DELETION_MANIFEST.to_string(),
            temp_dir: None,
            user_agent: APP_NAME.to_string(),
            log: LogConfig::default(),
        }
    }
}

/// Logging-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,
    /// Whether to also write JSON logs to [`LogConfig::file_path`]
    pub file: bool,
    /// Directory for the JSON log; the per-user data directory when unset
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
            dir: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(data_dir)
            .join(LOG_FILE_NAME)
    }
}

impl UpdaterConfig {
    /// Loads the configuration for an installation.
    ///
    /// An explicit `path` must exist. Without one, `<root>/updater.json` is
    /// used when present and defaults otherwise.
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (root.join(CONFIG_FILE_NAME), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Directory downloaded archives are written to
    pub fn archive_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Builds the HTTP client shared by the manifest fetcher and downloader
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
    }
}

/// Per-user state directory: `$XDG_DATA_HOME/freya-updater`, else the
/// platform data directory, else `./freya-updater`.
pub fn data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        dirs::data_dir(),
    )
}

fn resolve_data_dir(xdg_data_home: Option<PathBuf>, platform_dir: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .filter(|dir| dir.is_absolute())
        .or(platform_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
