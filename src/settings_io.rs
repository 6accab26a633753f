//! Reading [`Settings`] from a `.toml` or `.json` file.

use std::path::Path;

use crate::ops::io::read_string_limited;
use crate::{Error, Result, Settings};

// Settings files are a handful of lines; anything near this is not a settings file.
const MAX_SETTINGS_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    Json,
}

impl SettingsFormat {
    /// `.json` selects JSON; `.toml` or a bare file name selects TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") | None => Ok(Self::Toml),
            Some(other) => Err(Error::InvalidSettings(format!(
                "{}: unsupported extension {other:?} (use .toml or .json)",
                path.display()
            ))),
        }
    }
}

pub fn parse_settings(raw: &str, format: SettingsFormat) -> Result<Settings> {
    let settings: Settings = match format {
        SettingsFormat::Json => serde_json::from_str(raw)
            .map_err(|err| Error::InvalidSettings(format!("json: {err}")))?,
        SettingsFormat::Toml => {
            toml::from_str(raw).map_err(|err| Error::InvalidSettings(format!("toml: {err}")))?
        }
    };
    settings.validate()?;
    Ok(settings)
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    load_settings_limited(path, MAX_SETTINGS_BYTES)
}

/// Same as [`load_settings`] with a caller-chosen size cap. Symlinks and non-regular files are
/// refused by the shared bounded reader.
pub fn load_settings_limited(path: impl AsRef<Path>, max_bytes: u64) -> Result<Settings> {
    let path = path.as_ref();
    if max_bytes == 0 {
        return Err(Error::InvalidSettings(
            "settings size cap must be > 0".to_string(),
        ));
    }
    let format = SettingsFormat::from_path(path)?;
    let raw = read_string_limited(path, path, max_bytes)?;
    tracing::debug!(path = %path.display(), ?format, "settings read");
    parse_settings(&raw, format)
}
