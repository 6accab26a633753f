use serde::{Deserialize, Serialize};

/// Files shipped inside the binary and written into the converted project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stub {
    /// Token based register / login / logout routes for the API variant.
    AuthRoutes,
    /// Feature test exercising `api/user` with an authenticated user.
    ApiExampleTest,
}

impl Stub {
    pub const fn name(self) -> &'static str {
        match self {
            Self::AuthRoutes => "api/auth.php",
            Self::ApiExampleTest => "api/ExampleTest.php",
        }
    }

    pub const fn contents(self) -> &'static str {
        match self {
            Self::AuthRoutes => include_str!("../stubs/api/auth.php"),
            Self::ApiExampleTest => include_str!("../stubs/api/ExampleTest.php"),
        }
    }
}
