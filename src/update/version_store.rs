//! Local version marker

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::update::error::UpdateError;
use crate::update::strip_bom;

/// Reads the installed version from a plain-text marker file.
///
/// There is no write operation: a new marker arrives inside an update archive
/// and overwrites this file during extraction.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `file_name` at the installation root
    pub fn in_root(root: &Path, file_name: &str) -> Self {
        Self::new(root.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the trimmed contents of the marker file, without a byte order
    /// mark
    pub fn read(&self) -> Result<String, UpdateError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let version = strip_bom(&content).trim().to_string();
                debug!("Read version {:?} from {:?}", version, self.path);
                Ok(version)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(UpdateError::MissingVersionFile(self.path.clone()))
            }
            Err(source) => Err(UpdateError::VersionFile {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
