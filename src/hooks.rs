//! External steps the pipeline runs but does not own (package install, migrations).

use std::fmt;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::catalog::ProjectRoot;
use crate::error::{Error, Result};
use crate::settings::HookSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    InstallApi,
    Migrate,
}

impl Hook {
    pub const fn name(self) -> &'static str {
        match self {
            Self::InstallApi => "install-api",
            Self::Migrate => "migrate",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait ScaffoldHooks {
    /// Runs `hook` against `root`. Any error aborts the pipeline.
    fn run(&mut self, hook: Hook, root: &ProjectRoot) -> Result<()>;
}

/// Skips every hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl ScaffoldHooks for NoopHooks {
    fn run(&mut self, hook: Hook, _root: &ProjectRoot) -> Result<()> {
        tracing::debug!(%hook, "hook skipped");
        Ok(())
    }
}

/// Spawns the commands configured in [`HookSettings`] with the project root as working
/// directory. Output is inherited so installer prompts reach the terminal.
#[derive(Debug, Clone)]
pub struct CommandHooks {
    settings: HookSettings,
}

impl CommandHooks {
    pub fn new(settings: HookSettings) -> Self {
        Self { settings }
    }

    fn command_for(&self, hook: Hook) -> &[String] {
        match hook {
            Hook::InstallApi => &self.settings.install_api,
            Hook::Migrate => &self.settings.migrate,
        }
    }
}

impl ScaffoldHooks for CommandHooks {
    fn run(&mut self, hook: Hook, root: &ProjectRoot) -> Result<()> {
        if !self.settings.enabled {
            tracing::debug!(%hook, "hooks disabled");
            return Ok(());
        }

        let Some((program, args)) = self.command_for(hook).split_first() else {
            return Err(Error::Hook {
                hook: hook.name(),
                message: "no command configured".to_string(),
            });
        };

        tracing::info!(%hook, %program, "running hook");
        let status = Command::new(program)
            .args(args)
            .current_dir(root.path())
            .status()
            .map_err(|err| Error::Hook {
                hook: hook.name(),
                message: format!("failed to spawn {program}: {err}"),
            })?;
        if !status.success() {
            return Err(Error::Hook {
                hook: hook.name(),
                message: format!("{program} exited with {status}"),
            });
        }
        Ok(())
    }
}
