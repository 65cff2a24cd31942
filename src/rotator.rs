use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use thiserror::Error;

/// A regular file found in a rotated directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// A single file that could not be removed.
#[derive(Debug, Error)]
#[error("failed to delete {}: {source}", .path.display())]
pub struct DeletionError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum RotateError {
    /// The directory could not be listed; nothing was deleted.
    #[error("cannot read directory {}: {source}", .path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Some candidates were deleted, others were not.
    #[error(
        "failed to delete {} of {} files in {}",
        .failures.len(),
        .failures.len() + .deleted.len(),
        .dir.display()
    )]
    PartialDeletion {
        dir: PathBuf,
        deleted: Vec<PathBuf>,
        failures: Vec<DeletionError>,
    },
}

impl RotateError {
    /// Paths that were removed before the error was reported.
    pub fn deleted(&self) -> &[PathBuf] {
        match self {
            RotateError::DirectoryAccess { .. } => &[],
            RotateError::PartialDeletion { deleted, .. } => deleted,
        }
    }
}

/// Delete all but the `keep` most recently modified regular files in `dir`.
///
/// Returns the removed paths oldest first. A file that cannot be removed does
/// not stop the remaining candidates from being processed; the failures are
/// reported together in [`RotateError::PartialDeletion`].
pub fn rotate(dir: &Path, keep: usize) -> Result<Vec<PathBuf>, RotateError> {
    let entries = collect_entries(dir)?;
    let candidates = deletion_candidates(entries, keep);
    delete_all(dir, candidates)
}

/// List the regular files of `dir`, non-recursively.
pub fn collect_entries(dir: &Path) -> Result<Vec<FileEntry>, RotateError> {
    let access_error = |source| RotateError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(access_error)? {
        let entry = entry.map_err(access_error)?;
        // file_type() does not follow symlinks, so links are skipped too
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(access_error(err)),
        };
        if !file_type.is_file() {
            continue;
        }
        let modified = match entry.metadata().and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(access_error(err)),
        };
        entries.push(FileEntry {
            path: entry.path(),
            modified,
        });
    }
    Ok(entries)
}

/// Everything outside the `keep` newest entries, oldest first.
pub fn deletion_candidates(mut entries: Vec<FileEntry>, keep: usize) -> Vec<FileEntry> {
    if entries.len() <= keep {
        return Vec::new();
    }
    entries.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
    let excess = entries.len() - keep;
    entries.truncate(excess);
    entries
}

fn delete_all(dir: &Path, candidates: Vec<FileEntry>) -> Result<Vec<PathBuf>, RotateError> {
    let mut deleted = Vec::with_capacity(candidates.len());
    let mut failures = Vec::new();
    for FileEntry { path, .. } in candidates {
        match fs::remove_file(&path) {
            Ok(()) => deleted.push(path),
            Err(source) => failures.push(DeletionError { path, source }),
        }
    }

    if failures.is_empty() {
        Ok(deleted)
    } else {
        Err(RotateError::PartialDeletion {
            dir: dir.to_path_buf(),
            deleted,
            failures,
        })
    }
}
