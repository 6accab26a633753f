//! One generic driver for every [`VariantPlan`].
//!
//! The run is strictly sequential: check, hooks, delete, patch, finalize. Only the check is
//! side-effect free; once it passes, every later failure aborts the run and leaves the project
//! partially converted. Nothing is rolled back.

use serde::{Deserialize, Serialize};

use crate::catalog::ProjectRoot;
use crate::error::Result;
use crate::hooks::ScaffoldHooks;
use crate::notify::{Event, Notifier};
use crate::ops;
use crate::plan::{FinalizeStep, VariantPlan};
use crate::precondition::{FsProbe, PreconditionChecker, Probe};
use crate::settings::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The precondition gate failed; the project was not touched.
    Rejected,
    Completed,
}

impl Outcome {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Rejected => 1,
            Self::Completed => 0,
        }
    }
}

pub struct Pipeline<'a> {
    root: &'a ProjectRoot,
    plan: &'a VariantPlan,
    limits: Limits,
}

impl<'a> Pipeline<'a> {
    pub fn new(root: &'a ProjectRoot, plan: &'a VariantPlan) -> Self {
        Self {
            root,
            plan,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Evaluates only the precondition gate.
    pub fn check(&self, probe: &mut dyn Probe) -> bool {
        PreconditionChecker::new(self.plan.preconditions.clone()).is_eligible(self.root, probe)
    }

    pub fn run(
        &self,
        hooks: &mut dyn ScaffoldHooks,
        notifier: &mut dyn Notifier,
    ) -> Result<Outcome> {
        let variant = self.plan.variant;
        let mut probe = FsProbe::new(self.limits.max_read_bytes);
        if !self.check(&mut probe) {
            tracing::info!(%variant, "project rejected by precondition gate");
            return Ok(Outcome::Rejected);
        }

        for hook in &self.plan.hooks {
            hooks.run(*hook, self.root)?;
            notifier.notify(Event::HookRan {
                hook: hook.name().to_string(),
            });
        }

        let deleted = ops::delete_all(self.root, &self.plan.deletions, notifier)?;
        tracing::info!(%variant, deleted, "deletion phase finished");

        for set in &self.plan.patches {
            ops::patch_file(self.root, set, &self.limits, notifier)?;
        }

        for step in &self.plan.finalize {
            self.finalize(step, notifier)?;
        }

        tracing::info!(%variant, "conversion completed");
        Ok(Outcome::Completed)
    }

    fn finalize(&self, step: &FinalizeStep, notifier: &mut dyn Notifier) -> Result<()> {
        match step {
            FinalizeStep::ReplaceWithStub {
                target,
                stub,
                unless,
            } => ops::replace_with_stub(self.root, *target, *stub, *unless, notifier)?,
            FinalizeStep::CopyStub { target, stub } => {
                ops::copy_stub(self.root, *target, *stub, notifier)?
            }
            FinalizeStep::AppendText { target, text } => {
                ops::append_text(self.root, *target, text, notifier)?
            }
        };
        Ok(())
    }
}
