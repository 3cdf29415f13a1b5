//! Deletion manifest processing
//!
//! A deletion manifest is line oriented. A line ending in a path separator
//! switches the directory context to `root/<line>` and deletes nothing. Any
//! other non-blank line names a file or folder, resolved against the current
//! context:
//!
//! ```text
//! old_launcher.exe        -> <root>/old_launcher.exe
//! plugins\legacy\         (context = <root>/plugins/legacy)
//! a.dll                   -> <root>/plugins/legacy/a.dll
//! cache                   -> <root>/plugins/legacy/cache (recursive)
//! ```

use std::io;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::{info, warn};

use crate::update::error::DeletionError;
use crate::update::strip_bom;

/// Characters that terminate a directory-context line
pub const PATH_SEPARATORS: &[char] = &['\\', '/'];

/// What a single manifest line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Later leaf lines resolve under this directory
    Enter(PathBuf),
    /// Remove this file or directory
    Remove(PathBuf),
    /// Line would reach outside the installation root
    Reject(String),
}

/// Interprets one line against the current directory context.
///
/// `context` is `None` after a rejected context line; leaf lines under it are
/// rejected too until the next valid context line.
pub fn step(
    root: &Path,
    context: Option<PathBuf>,
    line: &str,
) -> (Option<PathBuf>, Option<Instruction>) {
    let line = line.trim();
    if line.is_empty() {
        return (context, None);
    }

    if line.ends_with(PATH_SEPARATORS) {
        return match relative_path(line.trim_end_matches(PATH_SEPARATORS)) {
            Some(dir) => {
                let dir = root.join(dir);
                (Some(dir.clone()), Some(Instruction::Enter(dir)))
            }
            None => (None, Some(Instruction::Reject(line.to_string()))),
        };
    }

    // An empty leaf would name the context directory itself
    let leaf = relative_path(line).filter(|leaf| leaf.components().next().is_some());
    let target = context
        .as_deref()
        .zip(leaf)
        .map(|(dir, leaf)| dir.join(leaf));

    match target {
        Some(target) => (context, Some(Instruction::Remove(target))),
        None => (context, Some(Instruction::Reject(line.to_string()))),
    }
}

/// Folds every line of a manifest into instructions, starting at `root`
pub fn instructions(root: &Path, content: &str) -> Vec<Instruction> {
    content
        .lines()
        .scan(Some(root.to_path_buf()), |context, line| {
            let (next, instruction) = step(root, context.take(), line);
            *context = next;
            Some(instruction)
        })
        .flatten()
        .collect()
}

/// Splits `text` on either separator into a path that stays below its base
fn relative_path(text: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for part in text.split(PATH_SEPARATORS) {
        match part {
            "" | "." => continue,
            ".." => return None,
            _ if cfg!(windows) && part.contains(':') => return None,
            _ => path.push(part),
        }
    }
    Some(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// File-system operations used while deleting
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Returns `None` when nothing exists at `path`
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// The real file system
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        // Symlinks are removed as links, never followed
        let metadata = std::fs::symlink_metadata(path).ok()?;
        if metadata.is_dir() {
            Some(EntryKind::Directory)
        } else {
            Some(EntryKind::File)
        }
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Result of one deletion instruction
#[derive(Debug)]
pub enum DeletionOutcome {
    DeletedFolder(PathBuf),
    DeletedFile(PathBuf),
    NotFound(PathBuf),
    Rejected(String),
    Failed(DeletionError),
}

#[derive(Debug, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl DeletionReport {
    pub fn deleted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    DeletionOutcome::DeletedFolder(_) | DeletionOutcome::DeletedFile(_)
                )
            })
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DeletionOutcome::Failed(_) | DeletionOutcome::Rejected(_)))
            .count()
    }
}

/// Runs instructions in order. A failing entry is logged and recorded, and
/// the remaining entries are still processed.
pub fn execute(fs: &dyn Filesystem, instructions: &[Instruction]) -> DeletionReport {
    let mut report = DeletionReport::default();

    for instruction in instructions {
        let outcome = match instruction {
            Instruction::Enter(_) => continue,
            Instruction::Reject(line) => {
                warn!("Skipping entry outside installation root: {}", line);
                DeletionOutcome::Rejected(line.clone())
            }
            Instruction::Remove(path) => remove(fs, path),
        };
        report.outcomes.push(outcome);
    }

    report
}

fn remove(fs: &dyn Filesystem, path: &Path) -> DeletionOutcome {
    let result = match fs.entry_kind(path) {
        Some(EntryKind::Directory) => fs.remove_dir_all(path).map(|_| {
            info!("Deleted folder: {}", path.display());
            DeletionOutcome::DeletedFolder(path.to_path_buf())
        }),
        Some(EntryKind::File) => fs.remove_file(path).map(|_| {
            info!("Deleted file: {}", path.display());
            DeletionOutcome::DeletedFile(path.to_path_buf())
        }),
        None => {
            info!("Not found: {}", path.display());
            Ok(DeletionOutcome::NotFound(path.to_path_buf()))
        }
    };

    result.unwrap_or_else(|source| {
        let error = DeletionError {
            path: path.to_path_buf(),
            source,
        };
        warn!("{}", error);
        DeletionOutcome::Failed(error)
    })
}

/// Reads the manifest at `manifest_path` and deletes what it lists under `root`
pub fn process_deletions(
    fs: &dyn Filesystem,
    root: &Path,
    manifest_path: &Path,
) -> io::Result<DeletionReport> {
    let content = std::fs::read_to_string(manifest_path)?;
    Ok(execute(fs, &instructions(root, strip_bom(&content))))
}
