//! ZIP extraction onto the installation root

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::update::error::ArchiveError;

/// Extracts every entry of `archive_path` under `root`, overwriting existing
/// files at the same relative paths.
///
/// Returns the number of files written. Entries whose names would land
/// outside `root` abort the extraction.
pub fn extract_archive(archive_path: &Path, root: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::UnsafePath(entry.name().to_string()));
        };
        let target = root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;

        // Keep shipped executables runnable
        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode().filter(|mode| mode & 0o111 != 0) {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))?;
        }

        debug!("Extracted {:?}", target);
        written += 1;
    }

    Ok(written)
}
