use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookSettings {
    /// When `false`, external hooks are skipped entirely.
    #[serde(default = "default_hooks_enabled")]
    pub enabled: bool,
    /// Program and arguments that install the API scaffolding.
    #[serde(default = "default_install_api")]
    pub install_api: Vec<String>,
    /// Program and arguments that run pending migrations.
    #[serde(default = "default_migrate")]
    pub migrate: Vec<String>,
}

const fn default_hooks_enabled() -> bool {
    true
}

fn default_install_api() -> Vec<String> {
    ["php", "artisan", "install:api", "--without-migration-prompt"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_migrate() -> Vec<String> {
    ["php", "artisan", "migrate"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: default_hooks_enabled(),
            install_api: default_install_api(),
            migrate: default_migrate(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: u64,
    #[serde(default = "default_max_write_bytes")]
    pub max_write_bytes: u64,
}

const fn default_max_read_bytes() -> u64 {
    1024 * 1024
}

const fn default_max_write_bytes() -> u64 {
    1024 * 1024
}

// Guardrail against misconfiguration; scaffold files are a few kilobytes.
const MAX_BYTES_HARD_CAP: u64 = 256 * 1024 * 1024;

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_read_bytes: default_max_read_bytes(),
            max_write_bytes: default_max_write_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub hooks: HookSettings,
    #[serde(default)]
    pub limits: Limits,
}

fn validate_u64_limit(value: u64, field: &str, hard_cap: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidSettings(format!("{field} must be > 0")));
    }
    if value > hard_cap {
        return Err(Error::InvalidSettings(format!(
            "{field} must be <= {hard_cap}"
        )));
    }
    Ok(())
}

fn validate_command(command: &[String], field: &str) -> Result<()> {
    match command.first() {
        None => Err(Error::InvalidSettings(format!("{field} is empty"))),
        Some(program) if program.trim().is_empty() => Err(Error::InvalidSettings(format!(
            "{field} has an empty program name"
        ))),
        Some(_) => Ok(()),
    }
}

impl Settings {
    /// Structural validation only; no filesystem access and no lookup of hook programs.
    pub fn validate(&self) -> Result<()> {
        validate_u64_limit(
            self.limits.max_read_bytes,
            "limits.max_read_bytes",
            MAX_BYTES_HARD_CAP,
        )?;
        validate_u64_limit(
            self.limits.max_write_bytes,
            "limits.max_write_bytes",
            MAX_BYTES_HARD_CAP,
        )?;
        if self.hooks.enabled {
            validate_command(&self.hooks.install_api, "hooks.install_api")?;
            validate_command(&self.hooks.migrate, "hooks.migrate")?;
        }
        Ok(())
    }
}
