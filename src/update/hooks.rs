//! Post-extraction hooks
//!
//! An update archive steers its own installation by shipping control files at
//! the installation root. Each hook names one control file; after extraction
//! the applier runs the hook only when that file is present.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::update::deletion::{Filesystem, process_deletions};
use crate::update::error::UpdateError;
use crate::update::types::UpdateEntry;
use crate::update::version_store::VersionStore;

/// What a hook knows about the update step that triggered it
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub root: &'a Path,
    pub entry: &'a UpdateEntry,
}

pub trait PostExtractHook: Send + Sync {
    /// Control file name, relative to the installation root
    fn control_file(&self) -> &str;

    /// Consumes the control file at `path`
    fn run(&self, ctx: &HookContext<'_>, path: &Path) -> Result<(), UpdateError>;
}

/// Runs every hook whose control file exists, in order
pub fn run_hooks(
    hooks: &[Box<dyn PostExtractHook>],
    ctx: &HookContext<'_>,
) -> Result<(), UpdateError> {
    for hook in hooks {
        let path = ctx.root.join(hook.control_file());
        if !path.is_file() {
            debug!("No {} shipped with {}", hook.control_file(), ctx.entry.version);
            continue;
        }
        hook.run(ctx, &path)?;
    }
    Ok(())
}

/// Deletes the entries listed in the deletion manifest, then the manifest
pub struct DeletionManifestHook {
    file_name: String,
    fs: Arc<dyn Filesystem>,
}

impl DeletionManifestHook {
    pub fn new(file_name: &str, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            file_name: file_name.to_string(),
            fs,
        }
    }
}

impl PostExtractHook for DeletionManifestHook {
    fn control_file(&self) -> &str {
        &self.file_name
    }

    fn run(&self, ctx: &HookContext<'_>, path: &Path) -> Result<(), UpdateError> {
        info!("Processing {}...", self.file_name);

        let report = process_deletions(self.fs.as_ref(), ctx.root, path).map_err(|source| {
            UpdateError::ControlFile {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(
            "Deleted {} entries ({} failed)",
            report.deleted(),
            report.failed()
        );

        // The manifest may list itself and already be gone
        match std::fs::remove_file(path) {
            Err(source) if source.kind() != ErrorKind::NotFound => {
                Err(UpdateError::ControlFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Checks that the shipped version marker names the version just applied.
///
/// The marker is left in place; it becomes the installed version.
pub struct VersionMarkerHook {
    file_name: String,
}

impl VersionMarkerHook {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
        }
    }
}

impl PostExtractHook for VersionMarkerHook {
    fn control_file(&self) -> &str {
        &self.file_name
    }

    fn run(&self, ctx: &HookContext<'_>, path: &Path) -> Result<(), UpdateError> {
        match VersionStore::new(path).read() {
            Ok(found) if found == ctx.entry.version => {}
            Ok(found) => warn!(
                "{} reports {:?} after applying {}",
                self.file_name, found, ctx.entry.version
            ),
            Err(e) => warn!("Could not verify installed version: {}", e),
        }
        Ok(())
    }
}
