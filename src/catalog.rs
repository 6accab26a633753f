//! Well-known locations inside a freshly scaffolded project.
//!
//! Every path the conversion touches is listed here once, tagged with the kind of entry it is
//! expected to be. Resolution is a pure join against [`ProjectRoot`]; nothing in this module
//! touches the filesystem except [`ProjectRoot::new`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKey {
    BootstrapProviders,
    BootstrapApp,
    AuthServiceProvider,
    HttpDir,
    ModelsDir,
    UserModel,
    WebRoutes,
    ApiRoutes,
    ChannelRoutes,
    AuthRoutes,
    AuthConfig,
    DatabaseConfig,
    MailConfig,
    QueueConfig,
    SessionConfig,
    JetstreamConfig,
    DatabaseDir,
    PublicDir,
    ResourcesDir,
    NodeModules,
    PackageJson,
    PackageLock,
    ViteConfig,
    ExampleTest,
    PestConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSpec {
    pub key: PathKey,
    pub relative: &'static str,
    pub kind: PathKind,
}

impl PathKey {
    pub const ALL: [PathKey; 25] = [
        PathKey::BootstrapProviders,
        PathKey::BootstrapApp,
        PathKey::AuthServiceProvider,
        PathKey::HttpDir,
        PathKey::ModelsDir,
        PathKey::UserModel,
        PathKey::WebRoutes,
        PathKey::ApiRoutes,
        PathKey::ChannelRoutes,
        PathKey::AuthRoutes,
        PathKey::AuthConfig,
        PathKey::DatabaseConfig,
        PathKey::MailConfig,
        PathKey::QueueConfig,
        PathKey::SessionConfig,
        PathKey::JetstreamConfig,
        PathKey::DatabaseDir,
        PathKey::PublicDir,
        PathKey::ResourcesDir,
        PathKey::NodeModules,
        PathKey::PackageJson,
        PathKey::PackageLock,
        PathKey::ViteConfig,
        PathKey::ExampleTest,
        PathKey::PestConfig,
    ];

    pub const fn spec(self) -> PathSpec {
        use PathKind::{Directory, File};

        let (relative, kind) = match self {
            Self::BootstrapProviders => ("bootstrap/providers.php", File),
            Self::BootstrapApp => ("bootstrap/app.php", File),
            Self::AuthServiceProvider => ("app/Providers/AuthServiceProvider.php", File),
            Self::HttpDir => ("app/Http", Directory),
            Self::ModelsDir => ("app/Models", Directory),
            Self::UserModel => ("app/Models/User.php", File),
            Self::WebRoutes => ("routes/web.php", File),
            Self::ApiRoutes => ("routes/api.php", File),
            Self::ChannelRoutes => ("routes/channels.php", File),
            Self::AuthRoutes => ("routes/auth.php", File),
            Self::AuthConfig => ("config/auth.php", File),
            Self::DatabaseConfig => ("config/database.php", File),
            Self::MailConfig => ("config/mail.php", File),
            Self::QueueConfig => ("config/queue.php", File),
            Self::SessionConfig => ("config/session.php", File),
            Self::JetstreamConfig => ("config/jetstream.php", File),
            Self::DatabaseDir => ("database", Directory),
            Self::PublicDir => ("public", Directory),
            Self::ResourcesDir => ("resources", Directory),
            Self::NodeModules => ("node_modules", Directory),
            Self::PackageJson => ("package.json", File),
            Self::PackageLock => ("package-lock.json", File),
            Self::ViteConfig => ("vite.config.js", File),
            Self::ExampleTest => ("tests/Feature/ExampleTest.php", File),
            Self::PestConfig => ("tests/Pest.php", File),
        };
        PathSpec {
            key: self,
            relative,
            kind,
        }
    }

    pub const fn relative(self) -> &'static str {
        self.spec().relative
    }

    pub const fn kind(self) -> PathKind {
        self.spec().kind
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.relative())
    }
}

/// Canonical, absolute directory of the project being converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    path: PathBuf,
}

impl ProjectRoot {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let canonical = path.canonicalize().map_err(|err| {
            Error::InvalidRoot(format!("failed to canonicalize {}: {err}", path.display()))
        })?;
        let meta = fs::metadata(&canonical).map_err(|err| {
            Error::InvalidRoot(format!("failed to stat {}: {err}", canonical.display()))
        })?;
        if !meta.is_dir() {
            return Err(Error::InvalidRoot(format!(
                "{} is not a directory",
                canonical.display()
            )));
        }
        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_of(&self, key: PathKey) -> PathBuf {
        let mut out = self.path.clone();
        for part in key.relative().split('/') {
            out.push(part);
        }
        out
    }
}

pub struct PathCatalog;

impl PathCatalog {
    /// Every catalog entry with its absolute location under `root`.
    pub fn resolve(root: &ProjectRoot) -> BTreeMap<PathKey, (PathSpec, PathBuf)> {
        PathKey::ALL
            .iter()
            .map(|key| (*key, (key.spec(), root.path_of(*key))))
            .collect()
    }
}
