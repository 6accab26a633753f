use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("io error during {op} ({path}): {source}")]
    IoPath {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid project root: {0}")]
    InvalidRoot(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid utf-8 in file: {0}")]
    InvalidUtf8(PathBuf),

    #[error("file is too large ({size_bytes} bytes; max {max_bytes} bytes): {path}")]
    FileTooLarge {
        path: PathBuf,
        size_bytes: u64,
        max_bytes: u64,
    },

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("hook {hook} failed: {message}")]
    Hook { hook: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub const CODE_IO_PATH: &'static str = "io_path";
    pub const CODE_JSON: &'static str = "json";
    pub const CODE_INVALID_ROOT: &'static str = "invalid_root";
    pub const CODE_INVALID_PATH: &'static str = "invalid_path";
    pub const CODE_INVALID_UTF8: &'static str = "invalid_utf8";
    pub const CODE_FILE_TOO_LARGE: &'static str = "file_too_large";
    pub const CODE_INVALID_PATCH: &'static str = "invalid_patch";
    pub const CODE_INVALID_SETTINGS: &'static str = "invalid_settings";
    pub const CODE_HOOK: &'static str = "hook";

    pub fn code(&self) -> &'static str {
        match self {
            Error::IoPath { .. } => Self::CODE_IO_PATH,
            Error::Json(_) => Self::CODE_JSON,
            Error::InvalidRoot(_) => Self::CODE_INVALID_ROOT,
            Error::InvalidPath(_) => Self::CODE_INVALID_PATH,
            Error::InvalidUtf8(_) => Self::CODE_INVALID_UTF8,
            Error::FileTooLarge { .. } => Self::CODE_FILE_TOO_LARGE,
            Error::InvalidPatch(_) => Self::CODE_INVALID_PATCH,
            Error::InvalidSettings(_) => Self::CODE_INVALID_SETTINGS,
            Error::Hook { .. } => Self::CODE_HOOK,
        }
    }

    pub(crate) fn io_path(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::IoPath {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}
