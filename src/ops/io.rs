use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
}

impl FileIdentity {
    fn from_metadata(meta: &fs::Metadata) -> Option<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            Some(Self {
                dev: meta.dev(),
                ino: meta.ino(),
            })
        }
        #[cfg(not(unix))]
        {
            let _ = meta;
            None
        }
    }
}

fn open_regular_file_for_read(path: &Path, relative: &Path) -> Result<(fs::File, fs::Metadata)> {
    let link_meta =
        fs::symlink_metadata(path).map_err(|err| Error::io_path("metadata", relative, err))?;
    if link_meta.file_type().is_symlink() {
        return Err(Error::InvalidPath(format!(
            "path {} is a symlink",
            relative.display()
        )));
    }
    let file = fs::File::open(path).map_err(|err| Error::io_path("open", relative, err))?;
    let meta = file
        .metadata()
        .map_err(|err| Error::io_path("metadata", relative, err))?;
    if !meta.is_file() {
        return Err(Error::InvalidPath(format!(
            "path {} is not a regular file",
            relative.display()
        )));
    }
    Ok((file, meta))
}

pub(crate) fn read_string_limited(path: &Path, relative: &Path, max_bytes: u64) -> Result<String> {
    let (text, _identity) = read_string_limited_with_identity(path, relative, max_bytes)?;
    Ok(text)
}

pub(crate) fn read_string_limited_with_identity(
    path: &Path,
    relative: &Path,
    max_bytes: u64,
) -> Result<(String, Option<FileIdentity>)> {
    let (file, meta) = open_regular_file_for_read(path, relative)?;
    let identity = FileIdentity::from_metadata(&meta);
    let bytes = read_open_file_limited(file, relative, max_bytes, meta.len())?;
    String::from_utf8(bytes)
        .map_err(|_| Error::InvalidUtf8(relative.to_path_buf()))
        .map(|text| (text, identity))
}

fn file_too_large(relative: &Path, size_bytes: u64, max_bytes: u64) -> Error {
    Error::FileTooLarge {
        path: relative.to_path_buf(),
        size_bytes,
        max_bytes,
    }
}

fn read_open_file_limited(
    file: fs::File,
    relative: &Path,
    max_bytes: u64,
    known_size: u64,
) -> Result<Vec<u8>> {
    if known_size > max_bytes {
        return Err(file_too_large(relative, known_size, max_bytes));
    }

    let limit = max_bytes.saturating_add(1);
    let mut bytes = Vec::<u8>::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| Error::io_path("read", relative, err))?;
    let read_size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    if read_size > max_bytes {
        return Err(file_too_large(relative, read_size, max_bytes));
    }
    Ok(bytes)
}

/// Replaces `path` with `bytes` through a sibling temp file, keeping the original permissions.
///
/// When `expected_identity` is set, the write is refused if `path` is no longer the file that
/// was read.
pub(crate) fn write_bytes_atomic_checked(
    path: &Path,
    relative: &Path,
    bytes: &[u8],
    expected_identity: Option<FileIdentity>,
) -> Result<()> {
    if !exists_no_follow(path, relative)? {
        return Err(Error::io_path(
            "open_for_write",
            relative,
            std::io::ErrorKind::NotFound.into(),
        ));
    }
    // Fail early if the original file isn't writable.
    let existing = fs::OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|err| Error::io_path("open_for_write", relative, err))?;
    let meta = existing
        .metadata()
        .map_err(|err| Error::io_path("metadata", relative, err))?;
    drop(existing);
    match (expected_identity, FileIdentity::from_metadata(&meta)) {
        (Some(expected), Some(actual)) if expected != actual => {
            return Err(Error::InvalidPath(format!(
                "path {} changed during operation",
                relative.display()
            )));
        }
        _ => {}
    }

    let parent = path.parent().ok_or_else(|| {
        Error::InvalidPath(format!(
            "invalid path {}: missing parent directory",
            relative.display()
        ))
    })?;

    let mut tmp_file = tempfile::Builder::new()
        .prefix(".slim-scaffold.")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|err| Error::io_path("create_temp", relative, err))?;

    tmp_file
        .as_file_mut()
        .write_all(bytes)
        .map_err(|err| Error::io_path("write", relative, err))?;
    tmp_file
        .as_file_mut()
        .sync_all()
        .map_err(|err| Error::io_path("sync", relative, err))?;

    let tmp_path = tmp_file.into_temp_path();
    fs::set_permissions(&tmp_path, meta.permissions())
        .map_err(|err| Error::io_path("set_permissions", relative, err))?;
    tmp_path
        .persist(path)
        .map_err(|err| Error::io_path("replace_file", relative, err.error))?;

    Ok(())
}

/// Returns whether `path` exists. Symlinks are refused, dangling ones included.
fn exists_no_follow(path: &Path, relative: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => Err(Error::InvalidPath(format!(
            "path {} is a symlink",
            relative.display()
        ))),
        Ok(_) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(Error::io_path("symlink_metadata", relative, err)),
    }
}

fn create_parent_dirs(path: &Path, relative: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io_path("create_dir_all", relative, err))?;
    }
    Ok(())
}

/// Writes a brand new file (or overwrites one), creating missing parent directories.
pub(crate) fn write_new_file(path: &Path, relative: &Path, bytes: &[u8]) -> Result<()> {
    create_parent_dirs(path, relative)?;
    if exists_no_follow(path, relative)? {
        return write_bytes_atomic_checked(path, relative, bytes, None);
    }
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .map_err(|err| Error::io_path("write", relative, err))
}

pub(crate) fn append_bytes(path: &Path, relative: &Path, bytes: &[u8]) -> Result<()> {
    create_parent_dirs(path, relative)?;
    let mut options = fs::OpenOptions::new();
    if exists_no_follow(path, relative)? {
        options.append(true);
    } else {
        options.write(true).create_new(true);
    }
    let mut file = options
        .open(path)
        .map_err(|err| Error::io_path("open_for_append", relative, err))?;
    file.write_all(bytes)
        .map_err(|err| Error::io_path("append", relative, err))?;
    file.sync_all()
        .map_err(|err| Error::io_path("sync", relative, err))
}
