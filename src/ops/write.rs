use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{PathKey, ProjectRoot};
use crate::error::{Error, Result};
use crate::notify::{Event, Notifier};
use crate::stubs::Stub;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteResponse {
    pub path: PathBuf,
    pub written: bool,
    pub bytes_written: u64,
}

fn len_u64(bytes: &[u8]) -> u64 {
    u64::try_from(bytes.len()).unwrap_or(u64::MAX)
}

/// Overwrites an existing file with a stub.
///
/// Skipped when `unless` exists (an alternative setup is already in place) or when the target is
/// missing; both skips are reported through `notifier`.
pub fn replace_with_stub(
    root: &ProjectRoot,
    target: PathKey,
    stub: Stub,
    unless: Option<PathKey>,
    notifier: &mut dyn Notifier,
) -> Result<WriteResponse> {
    let path = root.path_of(target);
    let relative = PathBuf::from(target.relative());
    let skipped = |reason: String, notifier: &mut dyn Notifier| {
        tracing::debug!(path = %relative.display(), %reason, "replace skipped");
        notifier.notify(Event::Skipped {
            path: relative.clone(),
            reason,
        });
        WriteResponse {
            path: relative.clone(),
            written: false,
            bytes_written: 0,
        }
    };

    if let Some(guard) = unless
        && root.path_of(guard).try_exists().unwrap_or(false)
    {
        let reason = match guard {
            PathKey::PestConfig => "Using Pest".to_string(),
            other => format!("{other} exists"),
        };
        return Ok(skipped(reason, notifier));
    }

    match fs::symlink_metadata(&path) {
        Ok(_) => {}
        // Unlike copy_stub, a missing target is not recreated here.
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(skipped(format!("{target} not found"), notifier));
        }
        Err(err) => return Err(Error::io_path("symlink_metadata", &relative, err)),
    }

    let bytes = stub.contents().as_bytes();
    super::io::write_bytes_atomic_checked(&path, &relative, bytes, None)?;
    notifier.notify(Event::Replaced {
        path: relative.clone(),
    });
    Ok(WriteResponse {
        path: relative,
        written: true,
        bytes_written: len_u64(bytes),
    })
}

/// Writes a stub byte-for-byte at `target`, creating parent directories and replacing any
/// existing file.
pub fn copy_stub(
    root: &ProjectRoot,
    target: PathKey,
    stub: Stub,
    notifier: &mut dyn Notifier,
) -> Result<WriteResponse> {
    let path = root.path_of(target);
    let relative = PathBuf::from(target.relative());
    let bytes = stub.contents().as_bytes();

    super::io::write_new_file(&path, &relative, bytes)?;
    tracing::debug!(path = %relative.display(), stub = stub.name(), "stub copied");
    notifier.notify(Event::Copied {
        path: relative.clone(),
    });
    Ok(WriteResponse {
        path: relative,
        written: true,
        bytes_written: len_u64(bytes),
    })
}

/// Appends `text` to `target`, creating the file when it does not exist yet.
pub fn append_text(
    root: &ProjectRoot,
    target: PathKey,
    text: &str,
    notifier: &mut dyn Notifier,
) -> Result<WriteResponse> {
    let path = root.path_of(target);
    let relative = PathBuf::from(target.relative());

    super::io::append_bytes(&path, &relative, text.as_bytes())?;
    notifier.notify(Event::Appended {
        path: relative.clone(),
    });
    Ok(WriteResponse {
        path: relative,
        written: true,
        bytes_written: len_u64(text.as_bytes()),
    })
}
