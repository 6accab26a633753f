//! The all-or-nothing gate that runs before any destructive step.
//!
//! Rules are evaluated strictly in order and the first failing rule ends the evaluation. The
//! result is a plain `bool`: callers decide how to report a rejection.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{PathKey, PathKind, ProjectRoot};
use crate::error::{Error, Result};

pub const FLUENT_CONFIGURE_MARKER: &str = "return Application::configure";
pub const API_ROUTES_MARKER: &str = "/routes/api.php";
pub const STATEFUL_FRONTEND_MARKER: &str = "EnsureFrontendRequestsAreStateful::class";
pub const INERTIA_REQUESTS_MARKER: &str = "HandleInertiaRequests::class";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PreconditionRule {
    Exists { path: PathKey },
    Absent { path: PathKey },
    Contains { path: PathKey, literal: String },
    NotContains { path: PathKey, literal: String },
}

impl PreconditionRule {
    pub fn exists(path: PathKey) -> Self {
        Self::Exists { path }
    }

    pub fn absent(path: PathKey) -> Self {
        Self::Absent { path }
    }

    pub fn contains(path: PathKey, literal: impl Into<String>) -> Self {
        Self::Contains {
            path,
            literal: literal.into(),
        }
    }

    pub fn not_contains(path: PathKey, literal: impl Into<String>) -> Self {
        Self::NotContains {
            path,
            literal: literal.into(),
        }
    }
}

impl fmt::Display for PreconditionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists { path } => match path.kind() {
                PathKind::Directory => write!(f, "{path} must be a directory"),
                PathKind::File => write!(f, "{path} must exist"),
            },
            Self::Absent { path } => write!(f, "{path} must not exist"),
            Self::Contains { path, literal } => write!(f, "{path} must contain {literal:?}"),
            Self::NotContains { path, literal } => {
                write!(f, "{path} must not contain {literal:?}")
            }
        }
    }
}

/// Filesystem access used by the checker.
pub trait Probe {
    fn exists(&mut self, path: &Path) -> bool;
    fn is_dir(&mut self, path: &Path) -> bool;
    fn read_to_string(&mut self, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct FsProbe {
    max_read_bytes: u64,
}

impl FsProbe {
    pub fn new(max_read_bytes: u64) -> Self {
        Self { max_read_bytes }
    }
}

impl Default for FsProbe {
    fn default() -> Self {
        Self::new(crate::settings::Limits::default().max_read_bytes)
    }
}

impl Probe for FsProbe {
    fn exists(&mut self, path: &Path) -> bool {
        path.try_exists().unwrap_or(false)
    }

    fn is_dir(&mut self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_dir())
    }

    fn read_to_string(&mut self, path: &Path) -> Result<String> {
        crate::ops::io::read_string_limited(path, path, self.max_read_bytes)
    }
}

/// The full rule set for a pristine scaffold.
pub fn canonical_rules() -> Vec<PreconditionRule> {
    vec![
        PreconditionRule::exists(PathKey::BootstrapProviders),
        PreconditionRule::contains(PathKey::BootstrapApp, FLUENT_CONFIGURE_MARKER),
        // install:api already ran
        PreconditionRule::not_contains(PathKey::BootstrapApp, API_ROUTES_MARKER),
        // breeze api (sanctum)
        PreconditionRule::not_contains(PathKey::BootstrapApp, STATEFUL_FRONTEND_MARKER),
        // breeze inertia
        PreconditionRule::not_contains(PathKey::BootstrapApp, INERTIA_REQUESTS_MARKER),
        PreconditionRule::absent(PathKey::AuthServiceProvider),
        PreconditionRule::exists(PathKey::WebRoutes),
        PreconditionRule::absent(PathKey::ApiRoutes),
        // install:broadcasting
        PreconditionRule::absent(PathKey::ChannelRoutes),
        // jetstream
        PreconditionRule::absent(PathKey::JetstreamConfig),
        PreconditionRule::exists(PathKey::DatabaseDir),
        PreconditionRule::exists(PathKey::PublicDir),
        PreconditionRule::exists(PathKey::ResourcesDir),
    ]
}

/// The narrower set older console conversions checked. Not used by any plan.
pub fn legacy_console_rules() -> Vec<PreconditionRule> {
    vec![
        PreconditionRule::exists(PathKey::BootstrapProviders),
        PreconditionRule::contains(PathKey::BootstrapApp, FLUENT_CONFIGURE_MARKER),
        PreconditionRule::absent(PathKey::AuthServiceProvider),
        PreconditionRule::exists(PathKey::WebRoutes),
        PreconditionRule::exists(PathKey::DatabaseDir),
        PreconditionRule::exists(PathKey::PublicDir),
        PreconditionRule::exists(PathKey::ResourcesDir),
    ]
}

#[derive(Debug, Clone)]
pub struct PreconditionChecker {
    rules: Vec<PreconditionRule>,
}

impl PreconditionChecker {
    pub fn new(rules: Vec<PreconditionRule>) -> Self {
        Self { rules }
    }

    pub fn canonical() -> Self {
        Self::new(canonical_rules())
    }

    pub fn rules(&self) -> &[PreconditionRule] {
        &self.rules
    }

    pub fn is_eligible(&self, root: &ProjectRoot, probe: &mut dyn Probe) -> bool {
        let mut contents = ContentCache::default();
        for (index, rule) in self.rules.iter().enumerate() {
            if !evaluate(rule, root, probe, &mut contents) {
                tracing::debug!(rule = %rule, index, "precondition failed");
                return false;
            }
        }
        true
    }
}

#[derive(Default)]
struct ContentCache {
    // `None` records a read failure so it is not retried within one evaluation.
    files: HashMap<PathKey, Option<String>>,
}

impl ContentCache {
    fn get<'a>(
        &'a mut self,
        key: PathKey,
        root: &ProjectRoot,
        probe: &mut dyn Probe,
    ) -> Option<&'a str> {
        self.files
            .entry(key)
            .or_insert_with(|| match probe.read_to_string(&root.path_of(key)) {
                Ok(text) => Some(text),
                Err(err) => {
                    log_read_failure(key, &err);
                    None
                }
            })
            .as_deref()
    }
}

fn log_read_failure(key: PathKey, err: &Error) {
    tracing::debug!(path = %key, error = %err, "precondition read failed");
}

fn evaluate(
    rule: &PreconditionRule,
    root: &ProjectRoot,
    probe: &mut dyn Probe,
    contents: &mut ContentCache,
) -> bool {
    match rule {
        PreconditionRule::Exists { path } => match path.kind() {
            PathKind::Directory => probe.is_dir(&root.path_of(*path)),
            PathKind::File => probe.exists(&root.path_of(*path)),
        },
        PreconditionRule::Absent { path } => !probe.exists(&root.path_of(*path)),
        PreconditionRule::Contains { path, literal } => contents
            .get(*path, root, probe)
            .is_some_and(|text| text.contains(literal.as_str())),
        PreconditionRule::NotContains { path, literal } => {
            if contents.files.contains_key(path) || probe.exists(&root.path_of(*path)) {
                contents
                    .get(*path, root, probe)
                    .is_some_and(|text| !text.contains(literal.as_str()))
            } else {
                true
            }
        }
    }
}
