//! Installation fixtures wired to real HTTP implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use freya_updater::update::applier::UpdateApplier;
use freya_updater::update::deletion::LocalFilesystem;
use freya_updater::update::download::HttpDownloader;
use freya_updater::update::hooks::{DeletionManifestHook, VersionMarkerHook};
use freya_updater::update::manifest::HttpManifestSource;
use freya_updater::update::runner::Updater;
use freya_updater::update::version_store::VersionStore;

/// Installation root plus a separate directory for downloaded archives
pub struct Installation {
    pub root: TempDir,
    pub archives: TempDir,
}

impl Installation {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            archives: TempDir::new().unwrap(),
        }
    }

    pub fn with_version(version: &str) -> Self {
        let installation = Self::new();
        installation.write("version.txt", version);
        installation
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn archive_count(&self) -> usize {
        std::fs::read_dir(self.archives.path()).unwrap().count()
    }

    /// Updater as the binary wires it, pointed at `manifest_url`
    pub fn updater(&self, manifest_url: &str) -> Updater {
        build_updater(self.root.path(), self.archives.path(), manifest_url)
    }
}

fn build_updater(root: &Path, archives: &Path, manifest_url: &str) -> Updater {
    let client = reqwest::Client::new();

    let applier = UpdateApplier::new(
        Arc::new(HttpDownloader::new(client.clone())),
        root.to_path_buf(),
        archives.to_path_buf(),
    )
    .with_hook(DeletionManifestHook::new(
        "todelete.txt",
        Arc::new(LocalFilesystem),
    ))
    .with_hook(VersionMarkerHook::new("version.txt"));

    Updater::new(
        VersionStore::in_root(root, "version.txt"),
        Arc::new(HttpManifestSource::new(client, manifest_url)),
        applier,
    )
}
