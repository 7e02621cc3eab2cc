//! Process-wide scratch directory for downloaded artifacts.
//!
//! The directory lives under the platform temp root and survives restarts.
//! Only its contents are swept. Writers take a shared guard from
//! [`TempWorkspace::lock_shared`]; [`TempWorkspace::clear`] takes the exclusive
//! guard so a sweep never runs while a download is being written.

use crate::error::{Result, ScaffoldError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, error};

/// Name of the scratch folder created under the temp root.
pub const WORKSPACE_DIR_NAME: &str = "tmp-scaffold-bot";

/// What kind of entry a top-level child of the workspace is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    /// Regular file or symbolic link, removed directly.
    File,
    /// Directory, removed together with its contents.
    Directory,
}

/// Outcome of one sweep over the workspace.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClearReport {
    /// Entries that were removed.
    pub removed: usize,
    /// Entries that could not be removed.
    pub failed: Vec<PathBuf>,
}

impl ClearReport {
    /// Whether every entry was removed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Scratch directory shared by every download.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
    lock: RwLock<()>,
}

impl TempWorkspace {
    /// Creates `<root>/tmp-scaffold-bot` if it does not exist yet.
    pub fn ensure(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(WORKSPACE_DIR_NAME);
        fs::create_dir_all(&path).map_err(|e| {
            ScaffoldError::with_source(
                format!("cannot create temp workspace {}", path.display()),
                e,
            )
        })?;
        debug!("Initialized temp directory {}", path.display());

        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path a file with the given name would occupy inside the workspace.
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Shared guard held while writing into the workspace.
    pub async fn lock_shared(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().await
    }

    /// Removes every top-level entry, logging and skipping failures.
    pub async fn clear(&self) -> ClearReport {
        let _exclusive = self.lock.write().await;
        let path = self.path.clone();

        match tokio::task::spawn_blocking(move || sweep(&path, remove_entry)).await {
            Ok(report) => report,
            Err(e) => {
                error!("Temp directory sweep aborted: {e}");
                ClearReport::default()
            }
        }
    }
}

/// Removes one entry according to its kind.
pub fn remove_entry(path: &Path, kind: EntryKind) -> io::Result<()> {
    match kind {
        EntryKind::File => fs::remove_file(path),
        EntryKind::Directory => fs::remove_dir_all(path),
    }
}

/// Sweeps the immediate children of `dir` through `remove`.
///
/// Regular files and symlinks (including links to directories) are
/// [`EntryKind::File`]; real directories are [`EntryKind::Directory`]. A
/// missing directory is treated as empty.
pub fn sweep<F>(dir: &Path, mut remove: F) -> ClearReport
where
    F: FnMut(&Path, EntryKind) -> io::Result<()>,
{
    let mut report = ClearReport::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
        Err(e) => {
            error!("Error listing {}: {e}", dir.display());
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error reading entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();

        // file_type does not follow symlinks
        let kind = match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => EntryKind::Directory,
            Ok(_) => EntryKind::File,
            Err(e) => {
                error!("Error deleting {}: {e}", path.display());
                report.failed.push(path);
                continue;
            }
        };

        match remove(&path, kind) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                error!("Error deleting {}: {e}", path.display());
                report.failed.push(path);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn populate(dir: &Path) {
        fs::write(dir.join("plain.txt"), b"hello").unwrap();
        let nested = dir.join("nested");
        fs::create_dir_all(nested.join("deeper")).unwrap();
        fs::write(nested.join("inner.bin"), b"\x00\x01").unwrap();
        fs::write(nested.join("deeper").join("leaf"), b"x").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(dir.join("plain.txt"), dir.join("link")).unwrap();
        #[cfg(not(unix))]
        fs::write(dir.join("link"), b"stand-in").unwrap();
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let first = TempWorkspace::ensure(root.path()).unwrap();
        assert!(first.path().is_dir());
        assert_eq!(first.path(), root.path().join(WORKSPACE_DIR_NAME));

        fs::write(first.file_path("keep.txt"), b"data").unwrap();
        let second = TempWorkspace::ensure(root.path()).unwrap();
        assert_eq!(first.path(), second.path());
        assert!(second.file_path("keep.txt").exists());
    }

    #[test]
    fn test_ensure_fails_when_root_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, b"not a dir").unwrap();
        assert!(TempWorkspace::ensure(&blocker).is_err());
    }

    #[tokio::test]
    async fn test_clear_empty_and_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::ensure(root.path()).unwrap();

        assert_eq!(workspace.clear().await, ClearReport::default());
        assert_eq!(workspace.clear().await, ClearReport::default());

        fs::remove_dir(workspace.path()).unwrap();
        let report = workspace.clear().await;
        assert_eq!(report.removed, 0);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_clear_removes_files_links_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::ensure(root.path()).unwrap();
        populate(workspace.path());

        let report = workspace.clear().await;

        assert_eq!(report.removed, 3);
        assert!(report.is_clean());
        assert!(workspace.path().is_dir());
        assert_eq!(fs::read_dir(workspace.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_unlinked_not_followed() {
        let root = tempfile::tempdir().unwrap();
        let outside = root.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("precious"), b"keep me").unwrap();

        let workspace = TempWorkspace::ensure(root.path()).unwrap();
        std::os::unix::fs::symlink(&outside, workspace.file_path("dir-link")).unwrap();

        let report = sweep(workspace.path(), remove_entry);
        assert_eq!(report.removed, 1);
        assert!(outside.join("precious").exists());
    }

    #[test]
    fn test_failed_entry_does_not_stop_sweep() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::ensure(root.path()).unwrap();
        populate(workspace.path());

        let report = sweep(workspace.path(), |path, kind| {
            if path.file_name().is_some_and(|name| name == "plain.txt") {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            remove_entry(path, kind)
        });

        assert_eq!(report.removed, 2);
        assert_eq!(report.failed, vec![workspace.file_path("plain.txt")]);
        let remaining: Vec<_> = fs::read_dir(workspace.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(remaining, vec![OsString::from("plain.txt")]);
    }

    #[test]
    fn test_sweep_reports_entry_kinds() {
        let root = tempfile::tempdir().unwrap();
        let workspace = TempWorkspace::ensure(root.path()).unwrap();
        populate(workspace.path());

        let mut seen = Vec::new();
        let report = sweep(workspace.path(), |path, kind| {
            seen.push((path.file_name().unwrap().to_owned(), kind));
            Ok(())
        });

        assert_eq!(report.removed, 3);
        seen.sort();
        assert_eq!(
            seen,
            vec![
                (OsString::from("link"), EntryKind::File),
                (OsString::from("nested"), EntryKind::Directory),
                (OsString::from("plain.txt"), EntryKind::File),
            ]
        );
    }
}
