use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{PathKey, ProjectRoot};
use crate::error::{Error, Result};
use crate::notify::{Event, Notifier};
use crate::settings::Limits;

/// One literal substitution. An empty `replace` deletes every match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRule {
    pub search: String,
    #[serde(default)]
    pub replace: String,
}

impl PatchRule {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }

    pub fn delete(search: impl Into<String>) -> Self {
        Self::new(search, String::new())
    }
}

/// Ordered rules for a single target file; each rule sees the output of the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSet {
    pub target: PathKey,
    pub rules: Vec<PatchRule>,
}

impl PatchSet {
    pub fn single(target: PathKey, search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            target,
            rules: vec![PatchRule::new(search, replace)],
        }
    }

    /// Pairs `searches[i]` with `replaces[i]`.
    pub fn parallel<S, R>(target: PathKey, searches: &[S], replaces: &[R]) -> Result<Self>
    where
        S: AsRef<str>,
        R: AsRef<str>,
    {
        if searches.len() != replaces.len() {
            return Err(Error::InvalidPatch(format!(
                "{target}: {} search literals but {} replacements",
                searches.len(),
                replaces.len()
            )));
        }
        let rules = searches
            .iter()
            .zip(replaces)
            .map(|(search, replace)| PatchRule::new(search.as_ref(), replace.as_ref()))
            .collect();
        Ok(Self { target, rules })
    }

    /// Deletes every literal in `searches`.
    pub fn delete_all<S: AsRef<str>>(target: PathKey, searches: &[S]) -> Self {
        Self {
            target,
            rules: searches
                .iter()
                .map(|search| PatchRule::delete(search.as_ref()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatchResponse {
    pub path: PathBuf,
    /// `false` when the target did not exist and the patch was skipped.
    pub patched: bool,
    pub bytes_written: u64,
}

/// Applies `rules` in order, replacing every literal occurrence of each search string.
pub fn apply_rules(text: &str, rules: &[PatchRule]) -> String {
    let mut out = text.to_string();
    for rule in rules {
        // `str::replace` with an empty pattern would interleave the replacement everywhere.
        if rule.search.is_empty() || !out.contains(rule.search.as_str()) {
            continue;
        }
        out = out.replace(rule.search.as_str(), &rule.replace);
    }
    out
}

/// Rewrites the target of `set` in place. A missing target is a silent no-op.
pub fn patch_file(
    root: &ProjectRoot,
    set: &PatchSet,
    limits: &Limits,
    notifier: &mut dyn Notifier,
) -> Result<PatchResponse> {
    let path = root.path_of(set.target);
    let relative = PathBuf::from(set.target.relative());

    match std::fs::symlink_metadata(&path) {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %relative.display(), "patch target missing; skipped");
            return Ok(PatchResponse {
                path: relative,
                patched: false,
                bytes_written: 0,
            });
        }
        Err(err) => return Err(Error::io_path("symlink_metadata", &relative, err)),
    }

    let (content, identity) =
        super::io::read_string_limited_with_identity(&path, &relative, limits.max_read_bytes)?;
    let updated = apply_rules(&content, &set.rules);

    let updated_len = u64::try_from(updated.len()).unwrap_or(u64::MAX);
    if updated_len > limits.max_write_bytes {
        return Err(Error::FileTooLarge {
            path: relative,
            size_bytes: updated_len,
            max_bytes: limits.max_write_bytes,
        });
    }

    let changed = updated != content;
    if changed {
        super::io::write_bytes_atomic_checked(&path, &relative, updated.as_bytes(), identity)?;
    }

    notifier.notify(Event::Replaced {
        path: relative.clone(),
    });
    Ok(PatchResponse {
        path: relative,
        patched: true,
        bytes_written: if changed { updated_len } else { 0 },
    })
}
