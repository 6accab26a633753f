//! `slim-scaffold` turns a freshly generated Laravel project into an API-only or console-only
//! project.
//!
//! A run is gated by an all-or-nothing precondition check over well-known paths and literal
//! markers. Once the gate passes, a fixed, data-driven plan deletes files and directories and
//! rewrites literal snippets in the remaining ones.

pub mod catalog;
mod error;
pub mod hooks;
pub mod notify;
pub mod ops;
pub mod pipeline;
pub mod plan;
pub mod precondition;
pub mod settings;
#[cfg(feature = "settings-io")]
pub mod settings_io;
pub mod stubs;

pub use error::{Error, Result};

pub use catalog::{PathCatalog, PathKey, PathKind, PathSpec, ProjectRoot};
pub use hooks::{CommandHooks, Hook, NoopHooks, ScaffoldHooks};
pub use notify::{Event, EventLog, Notifier};
pub use ops::{PatchRule, PatchSet, apply_rules, delete_all, delete_path, patch_file};
pub use pipeline::{Outcome, Pipeline};
pub use plan::{FinalizeStep, Variant, VariantPlan, plan_for};
pub use precondition::{FsProbe, PreconditionChecker, PreconditionRule, Probe, canonical_rules};
pub use settings::{HookSettings, Limits, Settings};
pub use stubs::Stub;
