use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{PathKey, PathKind, ProjectRoot};
use crate::error::{Error, Result};
use crate::notify::{Event, Notifier};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub path: PathBuf,
    pub deleted: bool,
}

fn unlink_symlink(target: &Path) -> std::io::Result<()> {
    #[cfg(windows)]
    {
        match fs::remove_file(target) {
            Ok(()) => Ok(()),
            // Directory symlinks and junctions need remove_dir on Windows.
            Err(remove_file_err) => match fs::remove_dir(target) {
                Ok(()) => Ok(()),
                Err(_) => Err(remove_file_err),
            },
        }
    }

    #[cfg(not(windows))]
    {
        fs::remove_file(target)
    }
}

/// Removes one catalog entry if it is present.
///
/// Absent entries are skipped without a notification, so running the same deletion twice is
/// harmless. What is on disk decides the removal: directories go recursively, anything else is
/// unlinked. Symlinks are never followed.
pub fn delete_path(
    root: &ProjectRoot,
    key: PathKey,
    notifier: &mut dyn Notifier,
) -> Result<DeleteResponse> {
    let target = root.path_of(key);
    let relative = PathBuf::from(key.relative());

    let meta = match fs::symlink_metadata(&target) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::trace!(path = %relative.display(), "already absent");
            return Ok(DeleteResponse {
                path: relative,
                deleted: false,
            });
        }
        Err(err) => return Err(Error::io_path("symlink_metadata", &relative, err)),
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        unlink_symlink(&target).map_err(|err| Error::io_path("unlink_symlink", &relative, err))?;
    } else if file_type.is_dir() {
        fs::remove_dir_all(&target)
            .map_err(|err| Error::io_path("remove_dir_all", &relative, err))?;
    } else {
        fs::remove_file(&target).map_err(|err| Error::io_path("remove_file", &relative, err))?;
    }

    let found = if file_type.is_dir() {
        PathKind::Directory
    } else {
        PathKind::File
    };
    tracing::debug!(path = %relative.display(), expected = %key.kind(), %found, "deleted");
    notifier.notify(Event::Deleted {
        path: relative.clone(),
    });
    Ok(DeleteResponse {
        path: relative,
        deleted: true,
    })
}

/// Runs [`delete_path`] over `keys` in order and returns how many entries were removed.
pub fn delete_all(
    root: &ProjectRoot,
    keys: &[PathKey],
    notifier: &mut dyn Notifier,
) -> Result<usize> {
    let mut deleted = 0usize;
    for key in keys {
        if delete_path(root, *key, notifier)?.deleted {
            deleted += 1;
        }
    }
    Ok(deleted)
}
