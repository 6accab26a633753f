//! Per-variant conversion data: which rules gate the run, what gets deleted, which literals get
//! patched and what is written afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::PathKey;
use crate::error::{Error, Result};
use crate::hooks::Hook;
use crate::ops::{PatchRule, PatchSet};
use crate::precondition::{PreconditionRule, canonical_rules};
use crate::stubs::Stub;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Api,
    Console,
}

impl Variant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Console => "console",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "api" => Ok(Self::Api),
            "console" => Ok(Self::Console),
            other => Err(Error::InvalidSettings(format!(
                "unknown variant {other:?}; expected \"api\" or \"console\""
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum FinalizeStep {
    ReplaceWithStub {
        target: PathKey,
        stub: Stub,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unless: Option<PathKey>,
    },
    CopyStub {
        target: PathKey,
        stub: Stub,
    },
    AppendText {
        target: PathKey,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPlan {
    pub variant: Variant,
    pub preconditions: Vec<PreconditionRule>,
    pub hooks: Vec<Hook>,
    pub deletions: Vec<PathKey>,
    pub patches: Vec<PatchSet>,
    pub finalize: Vec<FinalizeStep>,
}

pub const NOTIFIABLE_IMPORT: &str = "use Illuminate\\Notifications\\Notifiable;\n";
pub const HAS_API_TOKENS_IMPORT: &str = "use Laravel\\Sanctum\\HasApiTokens;\n";
pub const USER_TRAITS: &str = "use HasFactory, Notifiable;\n";
pub const USER_TRAITS_WITH_TOKENS: &str = "use HasApiTokens, HasFactory, Notifiable;\n";
pub const WEB_ROUTES_LINE: &str = "        web: __DIR__.'/../routes/web.php',\n";
pub const HEALTH_ROUTE_LINE: &str = "        health: '/up',\n";
pub const MIDDLEWARE_IMPORT: &str = "use Illuminate\\Foundation\\Configuration\\Middleware;\n";
pub const EMPTY_MIDDLEWARE_BLOCK: &str =
    "    ->withMiddleware(function (Middleware $middleware) {\n        //\n    })\n";
pub const REQUIRE_AUTH_ROUTES: &str = "\nrequire __DIR__.'/auth.php';\n";

pub fn plan_for(variant: Variant) -> VariantPlan {
    match variant {
        Variant::Api => api_plan(),
        Variant::Console => console_plan(),
    }
}

fn api_plan() -> VariantPlan {
    VariantPlan {
        variant: Variant::Api,
        preconditions: canonical_rules(),
        hooks: vec![Hook::InstallApi, Hook::Migrate],
        deletions: vec![
            PathKey::ResourcesDir,
            PathKey::NodeModules,
            PathKey::WebRoutes,
            PathKey::PackageJson,
            PathKey::PackageLock,
            PathKey::ViteConfig,
        ],
        patches: vec![
            PatchSet {
                target: PathKey::UserModel,
                rules: vec![
                    PatchRule::new(
                        NOTIFIABLE_IMPORT,
                        format!("{NOTIFIABLE_IMPORT}{HAS_API_TOKENS_IMPORT}"),
                    ),
                    PatchRule::new(USER_TRAITS, USER_TRAITS_WITH_TOKENS),
                ],
            },
            PatchSet::delete_all(PathKey::BootstrapApp, &[WEB_ROUTES_LINE]),
        ],
        finalize: vec![
            FinalizeStep::ReplaceWithStub {
                target: PathKey::ExampleTest,
                stub: Stub::ApiExampleTest,
                unless: Some(PathKey::PestConfig),
            },
            FinalizeStep::CopyStub {
                target: PathKey::AuthRoutes,
                stub: Stub::AuthRoutes,
            },
            FinalizeStep::AppendText {
                target: PathKey::ApiRoutes,
                text: REQUIRE_AUTH_ROUTES.to_string(),
            },
        ],
    }
}

fn console_plan() -> VariantPlan {
    VariantPlan {
        variant: Variant::Console,
        preconditions: canonical_rules(),
        hooks: Vec::new(),
        deletions: vec![
            PathKey::HttpDir,
            PathKey::ModelsDir,
            PathKey::DatabaseDir,
            PathKey::PublicDir,
            PathKey::ResourcesDir,
            PathKey::NodeModules,
            PathKey::AuthConfig,
            PathKey::DatabaseConfig,
            PathKey::MailConfig,
            PathKey::QueueConfig,
            PathKey::SessionConfig,
            PathKey::WebRoutes,
            PathKey::PackageJson,
            PathKey::ViteConfig,
        ],
        patches: vec![
            PatchSet::delete_all(
                PathKey::BootstrapApp,
                &[
                    MIDDLEWARE_IMPORT,
                    WEB_ROUTES_LINE,
                    HEALTH_ROUTE_LINE,
                    EMPTY_MIDDLEWARE_BLOCK,
                ],
            ),
            PatchSet {
                target: PathKey::ExampleTest,
                rules: vec![
                    PatchRule::new("get('/')", "artisan('inspire')"),
                    PatchRule::new("assertStatus(200)", "assertOk()"),
                ],
            },
        ],
        finalize: Vec::new(),
    }
}
